//! Entry reconciliation: add missing `ClCompile`/`ClInclude` items.
//!
//! Existing items are never touched. Missing ones are appended, in caller
//! order, to the first group already holding that role (or a new group).

use crate::document::{Document, Element};
use crate::paths;
use crate::project::INCLUDE;
use crate::types::Role;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Outcome of comparing desired files against a document for one role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPlan {
    /// `Include` values (native separators) to append, in caller order
    pub missing: Vec<String>,
    /// Normalized paths that are already present
    pub present: Vec<String>,
}

impl EntryPlan {
    /// Whether applying the plan would change the document.
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Compare desired files of one role against the document.
///
/// `project_dir` is the directory the document's paths are relative to.
/// Files requested twice are only planned once.
pub fn plan(document: &Document, role: Role, desired: &[PathBuf], project_dir: &Path) -> EntryPlan {
    let mut known: HashSet<String> = document.entries(role).iter().map(|e| e.key()).collect();
    let mut plan = EntryPlan::default();

    for file in desired {
        let key = paths::normalize(&paths::project_relative(file, project_dir));
        if known.contains(&key) {
            log::debug!("{role} already present: {key}");
            plan.present.push(key);
            continue;
        }
        plan.missing.push(paths::to_native(&key));
        known.insert(key);
    }

    plan
}

/// Append the planned entries. Returns the `Include` values added.
pub fn apply(document: &mut Document, role: Role, plan: &EntryPlan) -> Vec<String> {
    if plan.is_empty() {
        return Vec::new();
    }

    let items = plan
        .missing
        .iter()
        .map(|include| Element::new(role.item_name()).with_attr(INCLUDE, include.as_str()))
        .collect();

    if document.append_items(role.item_name(), items) {
        log::debug!("Created new ItemGroup for {role} entries");
    }

    plan.missing.clone()
}

/// Plan and apply in one step.
pub fn reconcile(
    document: &mut Document,
    role: Role,
    desired: &[PathBuf],
    project_dir: &Path,
) -> Vec<String> {
    let plan = plan(document, role, desired, project_dir);
    apply(document, role, &plan)
}
