//! # vcxkit
//!
//! Keeps Visual Studio C++ project files in step with generated sources.
//!
//! This crate provides functionality for:
//! - Parsing and re-serializing `.vcxproj` and `.vcxproj.filters` documents
//! - Adding missing `ClCompile`/`ClInclude` entries for generated files
//! - Registering header directories in `AdditionalIncludeDirectories`
//! - Filing generated files under a dedicated filter folder
//!
//! Every pass is idempotent: running it again with the same inputs leaves
//! the documents byte-for-byte unchanged, and unchanged documents are
//! never rewritten.
//!
//! ## Example
//!
//! ```no_run
//! use vcxkit::{Conventions, DesiredFiles, Synchronizer};
//! use std::path::Path;
//!
//! let conventions = Conventions::default();
//! let project = Path::new("Mundi/Mundi.vcxproj");
//! let desired = DesiredFiles::partition(
//!     ["Mundi/Gen/Actor.generated.cpp", "Mundi/Gen/Actor.generated.h"],
//!     &conventions,
//! );
//!
//! let sync = Synchronizer::new(conventions);
//! let report = sync
//!     .sync_project(project, &desired, Some(Path::new("Mundi/Source/Runtime")))
//!     .expect("Failed to sync project");
//! for (role, include) in &report.added {
//!     println!("Added {role}: {include}");
//! }
//!
//! let filters = sync.conventions().filters_path(project);
//! sync.sync_filters(&filters, &desired).expect("Failed to sync filters");
//! ```
//!
//! ## Dry runs
//!
//! Use [`WriteMode::DryRun`] to compute changes without touching disk. Each
//! changed document is reported as a [`DocumentChange`] holding the content
//! before and after.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod error;
pub mod paths;
pub mod project;
pub mod reconcile;
pub mod scan;
pub mod sync;
pub mod types;

pub use document::Document;
pub use error::{Error, ErrorCategory, Result};
pub use sync::{
    DocumentChange, FiltersReport, IncludeDirStatus, ProjectReport, Synchronizer, WriteMode,
};
pub use types::{Conventions, DesiredFiles, Entry, Role};
