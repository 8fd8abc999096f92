//! MSBuild view over a [`Document`].
//!
//! Items live as direct children of `ItemGroup` elements, which may be
//! nested (e.g. inside `Choose`/`When`). Groups are searched depth-first in
//! document order.

use crate::document::{Document, Element, Node};
use crate::paths;
use crate::types::{Entry, Role};

/// MSBuild container for items.
pub const ITEM_GROUP: &str = "ItemGroup";
/// Item naming a logical folder in a filters document, and the metadata
/// element filing an entry under one.
pub const FILTER: &str = "Filter";
/// Metadata holding a filter's identifier.
pub const UNIQUE_IDENTIFIER: &str = "UniqueIdentifier";
/// Attribute holding an item's path or name.
pub const INCLUDE: &str = "Include";

fn is_group(el: &Element) -> bool {
    el.local_name() == ITEM_GROUP
}

fn holds(group: &Element, item: &str) -> bool {
    group.elements().any(|el| el.local_name() == item)
}

impl Document {
    /// All item groups in document order.
    pub fn groups(&self) -> Vec<&Element> {
        self.root
            .descendants()
            .into_iter()
            .filter(|el| is_group(el))
            .collect()
    }

    /// Item groups holding at least one item of the given kind.
    pub fn groups_containing(&self, item: &str) -> Vec<&Element> {
        self.groups()
            .into_iter()
            .filter(|group| holds(group, item))
            .collect()
    }

    /// First group holding items of the given kind.
    pub fn first_group_containing_mut(&mut self, item: &str) -> Option<&mut Element> {
        self.root.find_mut(&|el| is_group(el) && holds(el, item))
    }

    /// Append a new, empty item group to the root element.
    pub fn create_group(&mut self) -> &mut Element {
        let name = self.root.qualify(ITEM_GROUP);
        self.root.push(Element::new(name))
    }

    /// Append items to the first group already holding that kind of item,
    /// or to a new group when there is none.
    ///
    /// Items may be built with local names; they take on the namespace
    /// prefix of the document root. Returns whether a group was created.
    pub fn append_items(&mut self, item: &str, items: Vec<Element>) -> bool {
        let prefix = self.root.prefix().map(str::to_string);
        let mut items = items;
        for el in &mut items {
            adopt_prefix(el, prefix.as_deref());
        }

        if let Some(group) = self.first_group_containing_mut(item) {
            group.children.extend(items.into_iter().map(Node::Element));
            return false;
        }

        let group = self.create_group();
        group.children.extend(items.into_iter().map(Node::Element));
        true
    }

    /// Every entry of a role across all groups, in document order.
    pub fn entries(&self, role: Role) -> Vec<Entry> {
        let item = role.item_name();
        self.groups()
            .into_iter()
            .flat_map(|group| group.elements())
            .filter(|el| el.local_name() == item)
            .filter_map(|el| {
                el.attr(INCLUDE).map(|include| Entry {
                    role,
                    include: include.to_string(),
                    classification: classification_of(el),
                })
            })
            .collect()
    }

    /// Entry element of a role whose normalized path equals `key`.
    pub fn entry_mut(&mut self, role: Role, key: &str) -> Option<&mut Element> {
        let item = role.item_name();
        let matches = |el: &Element| {
            el.local_name() == item && el.attr(INCLUDE).is_some_and(|i| paths::normalize(i) == key)
        };
        let group = self
            .root
            .find_mut(&|el| is_group(el) && el.elements().any(|c| matches(c)))?;
        group.elements_mut().find(|el| matches(el))
    }

    /// Whether a filter (logical folder) with this name exists.
    pub fn has_filter(&self, name: &str) -> bool {
        self.groups()
            .into_iter()
            .flat_map(|group| group.elements())
            .any(|el| el.local_name() == FILTER && el.attr(INCLUDE) == Some(name))
    }
}

fn adopt_prefix(el: &mut Element, prefix: Option<&str>) {
    if let Some(prefix) = prefix
        && el.prefix().is_none()
    {
        el.name = format!("{prefix}:{}", el.name);
    }
    for child in el.elements_mut() {
        adopt_prefix(child, prefix);
    }
}

/// Classification label of an entry element (its `Filter` metadata).
///
/// An empty or whitespace-only label counts as no classification.
pub fn classification_of(entry: &Element) -> Option<String> {
    let label = entry.child(FILTER)?.text();
    let label = label.trim();
    (!label.is_empty()).then(|| label.to_string())
}
