use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use vcxkit::Conventions;

/// Load project conventions, falling back to the defaults when no file is given.
///
/// Keys missing from the file keep their default values.
pub fn load(path: Option<&Path>) -> Result<Conventions> {
    let Some(path) = path else {
        log::debug!("No conventions file, using defaults");
        return Ok(Conventions::default());
    };

    let content = fs::read_to_string(path)
        .with_context(|| format!("Could not read conventions file: {}", path.display()))?;

    let conventions: Conventions = toml::from_str(&content)
        .with_context(|| format!("Invalid TOML in conventions file: {}", path.display()))?;

    log::debug!("Loaded conventions from {}", path.display());
    Ok(conventions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_without_file() {
        assert_eq!(load(None).unwrap(), Conventions::default());
    }

    #[test]
    fn test_partial_override() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("vcxsync.toml");
        fs::write(
            &path,
            r#"
filter_name = "Reflection"
header_extensions = ["h", "hpp"]
"#,
        )
        .unwrap();

        let conventions = load(Some(&path)).unwrap();
        assert_eq!(conventions.filter_name, "Reflection");
        assert_eq!(conventions.header_extensions, vec!["h", "hpp"]);
        assert_eq!(conventions.include_placeholder, "%(AdditionalIncludeDirectories)");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let err = load(Some(&tmp.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("Could not read conventions file"));
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.toml");
        fs::write(&path, "filter_name = [").unwrap();
        assert!(load(Some(&path)).is_err());
    }
}
