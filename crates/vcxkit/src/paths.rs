//! Path normalization shared by the reconcilers.
//!
//! Project documents store paths with backslashes relative to the project
//! directory. Comparisons always happen on the forward-slash form.

use std::path::{Component, Path, PathBuf};

/// Normalize an `Include` value for comparison.
pub fn normalize(include: &str) -> String {
    let forward = include.trim().replace('\\', "/");
    let mut rest = forward.as_str();
    while let Some(stripped) = rest.strip_prefix("./") {
        rest = stripped;
    }
    rest.to_string()
}

/// Convert a forward-slash path to the separator MSBuild writes.
pub fn to_native(path: &str) -> String {
    path.replace('/', "\\")
}

/// Render a path with forward slashes regardless of platform.
pub fn to_forward(path: &Path) -> String {
    let mut out = String::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::Prefix(prefix) => out.push_str(&prefix.as_os_str().to_string_lossy()),
            Component::RootDir => out.push('/'),
            other => {
                if !out.is_empty() && !out.ends_with('/') {
                    out.push('/');
                }
                out.push_str(&other.as_os_str().to_string_lossy());
            }
        }
    }
    out.replace('\\', "/")
}

/// Express `path` relative to `base`, or `None` when it lies elsewhere.
///
/// Paths of the same kind (both relative or both absolute) are compared as
/// given. Otherwise both are made absolute against the working directory,
/// so an absolute file still resolves against a bare project directory.
pub fn relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    if path.is_absolute() == base.is_absolute() {
        let path_clean = without_cur_dir(path);
        let base_clean = without_cur_dir(base);
        if let Ok(rel) = path_clean.strip_prefix(&base_clean) {
            return Some(rel.to_path_buf());
        }
    }

    let path_abs = without_cur_dir(&absolute(path)?);
    let base_abs = without_cur_dir(&absolute(base)?);
    path_abs.strip_prefix(&base_abs).ok().map(Path::to_path_buf)
}

/// Best-effort project-relative form of a file, with forward slashes.
///
/// Falls back to the path unmodified when it does not lie under `base`.
pub fn project_relative(path: &Path, base: &Path) -> String {
    match relative_to(path, base) {
        Some(rel) => to_forward(&rel),
        None => to_forward(path),
    }
}

/// Absolute form of a path; the empty path is the working directory.
fn absolute(path: &Path) -> Option<PathBuf> {
    if path.as_os_str().is_empty() {
        return std::env::current_dir().ok();
    }
    std::path::absolute(path).ok()
}

fn without_cur_dir(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(r"Gen\Foo.generated.cpp"), "Gen/Foo.generated.cpp");
        assert_eq!(normalize("./Gen/Foo.h"), "Gen/Foo.h");
        assert_eq!(normalize(r".\Gen\Foo.h"), "Gen/Foo.h");
        assert_eq!(normalize("  Foo.h "), "Foo.h");
    }

    #[test]
    fn test_to_native() {
        assert_eq!(to_native("Source/Runtime/Core"), r"Source\Runtime\Core");
    }

    #[test]
    fn test_relative_to_plain_prefix() {
        let rel = relative_to(Path::new("Engine/Gen/Foo.cpp"), Path::new("Engine")).unwrap();
        assert_eq!(to_forward(&rel), "Gen/Foo.cpp");
    }

    #[test]
    fn test_relative_to_empty_base() {
        // Parent of a bare file name is the empty path
        let rel = relative_to(Path::new("Gen/Foo.cpp"), Path::new("")).unwrap();
        assert_eq!(to_forward(&rel), "Gen/Foo.cpp");
    }

    #[test]
    fn test_relative_to_cur_dir_base() {
        let rel = relative_to(Path::new("./Gen/Foo.cpp"), Path::new(".")).unwrap();
        assert_eq!(to_forward(&rel), "Gen/Foo.cpp");
    }

    #[test]
    fn test_relative_to_mixed_absolute() {
        let cwd = std::env::current_dir().unwrap();
        let rel = relative_to(Path::new("Gen/Foo.cpp"), &cwd).unwrap();
        assert_eq!(to_forward(&rel), "Gen/Foo.cpp");
    }

    #[test]
    fn test_absolute_path_against_bare_base() {
        let cwd = std::env::current_dir().unwrap();
        let file = cwd.join("Gen/Foo.generated.cpp");

        assert_eq!(project_relative(&file, Path::new("")), "Gen/Foo.generated.cpp");
        assert_eq!(project_relative(&file, Path::new(".")), "Gen/Foo.generated.cpp");
    }

    #[test]
    fn test_absolute_path_outside_bare_base() {
        let cwd = std::env::current_dir().unwrap();
        let outside = cwd.parent().unwrap_or(&cwd).join("Elsewhere/Foo.cpp");
        if outside.starts_with(&cwd) {
            return;
        }
        assert!(relative_to(&outside, Path::new("")).is_none());
    }

    #[test]
    fn test_project_relative_falls_back() {
        assert_eq!(
            project_relative(Path::new("/elsewhere/Foo.cpp"), Path::new("/project")),
            "/elsewhere/Foo.cpp"
        );
    }
}
