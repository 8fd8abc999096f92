//! Include-path reconciliation.
//!
//! Works on the raw document text rather than the tree: the first
//! `<AdditionalIncludeDirectories>` field is located with a regex, its
//! `;`-separated tokens are compared against the discovered header
//! directories, and new tokens are spliced in before the trailing
//! placeholder. Everything outside the field is left byte-for-byte intact.

use crate::error::Result;
use crate::paths;
use crate::types::Conventions;
use regex::Regex;
use std::collections::{BTreeSet, HashSet};

/// Result of reconciling the include-path field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncludeDirOutcome {
    /// The document has no include-path field; nothing was done
    FieldMissing,
    /// Every directory is already listed
    Unchanged,
    /// Directories were inserted
    Updated {
        /// Full document text with the field rewritten
        content: String,
        /// Inserted directories (project-relative, forward slashes)
        added: Vec<String>,
    },
}

/// Split an include-path field into trimmed, non-empty tokens.
pub fn split_tokens(field: &str) -> Vec<String> {
    field
        .split(';')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Comparison form of a token: macro prefix removed, forward slashes, no
/// leading or trailing separators.
pub fn normalize_token(token: &str, conventions: &Conventions) -> String {
    token
        .replace(&conventions.project_dir_macro, "")
        .replace('\\', "/")
        .trim_matches('/')
        .to_string()
}

/// Insert missing directories into a token list.
///
/// New tokens go immediately before the placeholder when it is the last
/// token; when the list has no trailing placeholder they are appended.
/// Returns the directories that were inserted.
pub fn merge_tokens(
    tokens: &mut Vec<String>,
    dirs: &BTreeSet<String>,
    conventions: &Conventions,
) -> Vec<String> {
    let mut existing: HashSet<String> = tokens
        .iter()
        .map(|t| normalize_token(t, conventions))
        .collect();
    let has_placeholder = tokens
        .last()
        .is_some_and(|last| *last == conventions.include_placeholder);
    if !has_placeholder && !tokens.is_empty() {
        log::warn!(
            "{} does not end with {}; appending new directories",
            conventions.include_field,
            conventions.include_placeholder
        );
    }

    let mut added = Vec::new();
    for dir in dirs {
        let normalized = dir.replace('\\', "/").trim_matches('/').to_string();
        if normalized.is_empty() || existing.contains(&normalized) {
            continue;
        }

        let token = format!(
            "{}{}",
            conventions.project_dir_macro,
            paths::to_native(&normalized)
        );
        if has_placeholder {
            let at = tokens.len() - 1;
            tokens.insert(at, token);
        } else {
            tokens.push(token);
        }
        existing.insert(normalized.clone());
        added.push(normalized);
    }

    added
}

/// Reconcile the first include-path field in `content` with `dirs`.
pub fn reconcile(
    content: &str,
    dirs: &BTreeSet<String>,
    conventions: &Conventions,
) -> Result<IncludeDirOutcome> {
    let field = regex::escape(&conventions.include_field);
    let pattern = Regex::new(&format!("(<{field}>)([^<]+)(</{field}>)"))?;

    let Some(captures) = pattern.captures(content) else {
        log::info!("No {} field found", conventions.include_field);
        return Ok(IncludeDirOutcome::FieldMissing);
    };
    let Some(value) = captures.get(2) else {
        return Ok(IncludeDirOutcome::FieldMissing);
    };

    let mut tokens = split_tokens(value.as_str());
    let added = merge_tokens(&mut tokens, dirs, conventions);
    if added.is_empty() {
        return Ok(IncludeDirOutcome::Unchanged);
    }

    let mut updated = String::with_capacity(content.len() + added.len() * 32);
    updated.push_str(&content[..value.start()]);
    updated.push_str(&tokens.join(";"));
    updated.push_str(&content[value.end()..]);

    Ok(IncludeDirOutcome::Updated {
        content: updated,
        added,
    })
}
