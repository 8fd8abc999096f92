//! Reconcilers computing and applying the additions a document needs.
//!
//! - [`entries`]: `ClCompile`/`ClInclude` items in the project file
//! - [`include_dirs`]: the `AdditionalIncludeDirectories` field (text pass)
//! - [`filters`]: logical folders in the `.vcxproj.filters` companion

pub mod entries;
pub mod filters;
pub mod include_dirs;

pub use entries::EntryPlan;
pub use filters::FilterOutcome;
pub use include_dirs::IncludeDirOutcome;
