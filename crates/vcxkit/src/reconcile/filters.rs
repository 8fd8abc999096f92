//! Filter reconciliation for `.vcxproj.filters` documents.
//!
//! Makes sure the generated-files folder exists and that every desired file
//! is filed under it, unless someone already filed it elsewhere by hand.

use crate::document::{Document, Element};
use crate::paths;
use crate::project::{FILTER, INCLUDE, UNIQUE_IDENTIFIER, classification_of};
use crate::types::{Conventions, DesiredFiles, Role};
use std::path::Path;

/// What the filter reconciler did to a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOutcome {
    /// The generated-files folder was created
    pub filter_created: bool,
    /// Existing entries that received the label (role, normalized path)
    pub tagged: Vec<(Role, String)>,
    /// Entries created in the filters document (role, `Include` value)
    pub added: Vec<(Role, String)>,
    /// Entries left under a different folder (normalized path, folder)
    pub kept: Vec<(String, String)>,
}

impl FilterOutcome {
    /// Whether the document was modified.
    pub fn changed(&self) -> bool {
        self.filter_created || !self.tagged.is_empty() || !self.added.is_empty()
    }
}

/// Ensure the filter exists and desired files are classified under it.
pub fn reconcile(
    document: &mut Document,
    desired: &DesiredFiles,
    project_dir: &Path,
    conventions: &Conventions,
) -> FilterOutcome {
    let mut outcome = FilterOutcome {
        filter_created: ensure_filter(document, conventions),
        ..Default::default()
    };

    for role in Role::ALL {
        for file in desired.of_role(role) {
            let key = paths::normalize(&paths::project_relative(file, project_dir));
            classify(document, role, &key, conventions, &mut outcome);
        }
    }

    outcome
}

/// Create the generated-files folder if no filter with that name exists.
///
/// Returns whether it was created. Existing filters are never modified.
pub fn ensure_filter(document: &mut Document, conventions: &Conventions) -> bool {
    if document.has_filter(&conventions.filter_name) {
        return false;
    }

    let filter = Element::new(FILTER)
        .with_attr(INCLUDE, conventions.filter_name.as_str())
        .with_child(Element::new(UNIQUE_IDENTIFIER).with_text(conventions.filter_identifier.as_str()));
    document.append_items(FILTER, vec![filter]);
    log::debug!("Created filter {}", conventions.filter_name);
    true
}

fn classify(
    document: &mut Document,
    role: Role,
    key: &str,
    conventions: &Conventions,
    outcome: &mut FilterOutcome,
) {
    let label = conventions.filter_name.as_str();

    let Some(entry) = document.entry_mut(role, key) else {
        let include = paths::to_native(key);
        let item = Element::new(role.item_name())
            .with_attr(INCLUDE, include.as_str())
            .with_child(Element::new(FILTER).with_text(label));
        document.append_items(role.item_name(), vec![item]);
        outcome.added.push((role, include));
        return;
    };

    match classification_of(entry) {
        None => {
            match entry.child_mut(FILTER) {
                Some(filter) => filter.set_text(label),
                None => {
                    let name = entry.qualify(FILTER);
                    entry.push(Element::new(name).with_text(label));
                }
            }
            outcome.tagged.push((role, key.to_string()));
        }
        Some(existing) if existing == label => {}
        Some(existing) => {
            log::debug!("{key} stays in filter {existing}");
            outcome.kept.push((key.to_string(), existing));
        }
    }
}
