//! Discovery of header-bearing directories.

use crate::error::{Error, Result};
use crate::paths;
use crate::types::Conventions;
use std::collections::BTreeSet;
use std::path::Path;
use walkdir::WalkDir;

/// Directories under `root` that directly contain at least one header.
///
/// Each directory is returned relative to `project_dir` with forward
/// slashes, sorted lexicographically. Directories outside the project
/// directory (or equal to it) are skipped. Unreadable entries are ignored.
pub fn header_dirs(root: &Path, project_dir: &Path, conventions: &Conventions) -> Result<BTreeSet<String>> {
    if !root.is_dir() {
        return Err(Error::NotFound(root.to_path_buf()));
    }

    let mut dirs = BTreeSet::new();
    for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() || !conventions.is_header(entry.path()) {
            continue;
        }
        let Some(folder) = entry.path().parent() else {
            continue;
        };

        match paths::relative_to(folder, project_dir) {
            Some(rel) if !rel.as_os_str().is_empty() && !rel.is_absolute() => {
                dirs.insert(paths::to_forward(&rel));
            }
            _ => log::debug!(
                "Skipping {}: not below {}",
                folder.display(),
                project_dir.display()
            ),
        }
    }

    Ok(dirs)
}
