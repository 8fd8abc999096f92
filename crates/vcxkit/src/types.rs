//! Core types for project synchronization.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Role of a file reference inside an MSBuild project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    /// Compiled translation unit (`ClCompile`)
    Source,
    /// Header (`ClInclude`)
    Header,
}

impl Role {
    /// All roles, in reconciliation order.
    pub const ALL: [Role; 2] = [Role::Source, Role::Header];

    /// MSBuild item element name for this role.
    pub fn item_name(&self) -> &'static str {
        match self {
            Role::Source => "ClCompile",
            Role::Header => "ClInclude",
        }
    }

    /// Short label used in progress output.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Source => "CPP",
            Role::Header => "Header",
        }
    }

    /// Parse a role from an MSBuild item element name.
    pub fn from_item_name(name: &str) -> Option<Self> {
        match name {
            "ClCompile" => Some(Role::Source),
            "ClInclude" => Some(Role::Header),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.item_name())
    }
}

/// A file reference read from a project or filters document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Role of the referenced file
    pub role: Role,
    /// `Include` attribute exactly as written (native separators)
    pub include: String,
    /// Logical folder the entry is filed under, if any
    pub classification: Option<String>,
}

impl Entry {
    /// Identity of the entry for comparisons (forward slashes).
    pub fn key(&self) -> String {
        crate::paths::normalize(&self.include)
    }
}

/// Generated files the caller wants present in the project, split by role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DesiredFiles {
    /// Generated translation units
    pub sources: Vec<PathBuf>,
    /// Generated headers
    pub headers: Vec<PathBuf>,
}

impl DesiredFiles {
    /// Partition paths by extension. Paths matching neither role are dropped.
    pub fn partition<I, P>(paths: I, conventions: &Conventions) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut files = Self::default();
        for path in paths {
            let path = path.into();
            match conventions.role_of(&path) {
                Some(Role::Source) => files.sources.push(path),
                Some(Role::Header) => files.headers.push(path),
                None => log::debug!("Ignoring {}: not a source or header", path.display()),
            }
        }
        files
    }

    /// Files of a single role, in caller order.
    pub fn of_role(&self, role: Role) -> &[PathBuf] {
        match role {
            Role::Source => &self.sources,
            Role::Header => &self.headers,
        }
    }

    /// Whether no files were requested.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty() && self.headers.is_empty()
    }
}

/// Fixed naming and formatting rules for the project format.
///
/// Every reconciler receives these explicitly so alternative labels and
/// identifiers can be exercised without touching global state.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Conventions {
    /// Name of the logical folder generated files are filed under
    pub filter_name: String,
    /// Identifier given to that folder when it is created
    pub filter_identifier: String,
    /// Extensions (without dot) treated as compiled sources
    pub source_extensions: Vec<String>,
    /// Extensions (without dot) treated as headers
    pub header_extensions: Vec<String>,
    /// Configuration field holding the include-path list
    pub include_field: String,
    /// Token that must stay last in the include-path list
    pub include_placeholder: String,
    /// Macro prefixed to project-relative include directories
    pub project_dir_macro: String,
    /// Suffix appended to the project path to locate the filters document
    pub filters_suffix: String,
    /// Indentation step applied when a document is rewritten
    pub indent: String,
}

impl Default for Conventions {
    fn default() -> Self {
        Self {
            filter_name: "Generated".to_string(),
            filter_identifier: "{93995380-89BD-4b04-88EB-625FBE52EBFB}".to_string(),
            source_extensions: vec!["cpp".to_string()],
            header_extensions: vec!["h".to_string()],
            include_field: "AdditionalIncludeDirectories".to_string(),
            include_placeholder: "%(AdditionalIncludeDirectories)".to_string(),
            project_dir_macro: "$(ProjectDir)".to_string(),
            filters_suffix: ".filters".to_string(),
            indent: "  ".to_string(),
        }
    }
}

impl Conventions {
    /// Role of a path according to its extension.
    ///
    /// Matching is case-sensitive: `Foo.CPP` is not a source.
    pub fn role_of(&self, path: &Path) -> Option<Role> {
        let ext = path.extension()?.to_str()?;
        if self.source_extensions.iter().any(|e| e == ext) {
            Some(Role::Source)
        } else if self.header_extensions.iter().any(|e| e == ext) {
            Some(Role::Header)
        } else {
            None
        }
    }

    /// Whether a path is a header according to its extension.
    pub fn is_header(&self, path: &Path) -> bool {
        self.role_of(path) == Some(Role::Header)
    }

    /// Companion filters document for a project file.
    pub fn filters_path(&self, project: &Path) -> PathBuf {
        let mut name = project.as_os_str().to_os_string();
        name.push(&self.filters_suffix);
        PathBuf::from(name)
    }
}
