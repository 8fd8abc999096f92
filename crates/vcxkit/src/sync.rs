//! Per-document synchronization pipelines and change-gated writing.
//!
//! A project file goes through two passes: the tree pass adds missing
//! entries, then the text pass patches the include-path field on the
//! resulting text. A filters file only gets the tree pass. Either document
//! is written at most once, and only when a pass reported a mutation.

use crate::document::{self, Document};
use crate::error::{Error, Result};
use crate::reconcile::{FilterOutcome, IncludeDirOutcome, entries, filters, include_dirs};
use crate::scan;
use crate::types::{Conventions, DesiredFiles, Role};
use std::path::{Path, PathBuf};

/// Whether reconciled documents are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Write changed documents to disk
    #[default]
    Write,
    /// Compute changes only
    DryRun,
}

/// A document whose content changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentChange {
    /// Document location
    pub path: PathBuf,
    /// Content before reconciliation
    pub before: String,
    /// Content after reconciliation
    pub after: String,
    /// Whether `after` was written to `path`
    pub written: bool,
}

/// What happened to the include-path field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IncludeDirStatus {
    /// No scan root was given
    #[default]
    Skipped,
    /// The scan root does not exist
    RootMissing(PathBuf),
    /// The scan found no header directories
    NoHeaders,
    /// The project has no include-path field
    FieldMissing,
    /// Every directory is already listed
    Unchanged,
    /// Directories were inserted
    Added(Vec<String>),
}

/// Result of synchronizing a project file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectReport {
    /// Entries added (role, `Include` value)
    pub added: Vec<(Role, String)>,
    /// Include-path field outcome
    pub include_dirs: IncludeDirStatus,
    /// Present when the document changed
    pub change: Option<DocumentChange>,
}

impl ProjectReport {
    /// Added entries of one role.
    pub fn added_of(&self, role: Role) -> impl Iterator<Item = &str> {
        self.added
            .iter()
            .filter(move |(r, _)| *r == role)
            .map(|(_, include)| include.as_str())
    }
}

/// Result of synchronizing a filters file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FiltersReport {
    /// Reconciler outcome
    pub outcome: FilterOutcome,
    /// Present when the document changed
    pub change: Option<DocumentChange>,
}

/// Runs the reconcilers against documents on disk.
#[derive(Debug, Clone, Default)]
pub struct Synchronizer {
    conventions: Conventions,
    mode: WriteMode,
}

impl Synchronizer {
    /// Create a synchronizer that writes changed documents.
    pub fn new(conventions: Conventions) -> Self {
        Self {
            conventions,
            mode: WriteMode::Write,
        }
    }

    /// Set the write mode.
    pub fn with_mode(mut self, mode: WriteMode) -> Self {
        self.mode = mode;
        self
    }

    /// Conventions in use.
    pub fn conventions(&self) -> &Conventions {
        &self.conventions
    }

    /// Synchronize a project file with the desired files and, when
    /// `include_root` is given, with the header directories found under it.
    ///
    /// A missing project file is [`Error::NotFound`]; a malformed one is
    /// [`Error::Parse`] and nothing is written.
    pub fn sync_project(
        &self,
        project: &Path,
        desired: &DesiredFiles,
        include_root: Option<&Path>,
    ) -> Result<ProjectReport> {
        let original = document::read(project)?;
        let mut doc = Document::parse(&original).map_err(|e| e.at_path(project))?;
        let dir = parent_dir(project);

        let mut report = ProjectReport::default();
        for role in Role::ALL {
            let added = entries::reconcile(&mut doc, role, desired.of_role(role), &dir);
            report.added.extend(added.into_iter().map(|include| (role, include)));
        }

        let tree_changed = !report.added.is_empty();
        let mut content = if tree_changed {
            doc.render(&self.conventions.indent)
        } else {
            original.clone()
        };

        if let Some(root) = include_root {
            report.include_dirs = self.reconcile_include_dirs(&mut content, root, &dir)?;
        }
        let text_changed = matches!(report.include_dirs, IncludeDirStatus::Added(_));

        if tree_changed || text_changed {
            report.change = self.commit(project, original, content)?;
        } else {
            log::info!("No changes for {}", project.display());
        }
        Ok(report)
    }

    /// Synchronize a filters file with the desired files.
    ///
    /// Paths are resolved against the filters file's own directory.
    pub fn sync_filters(&self, filters_path: &Path, desired: &DesiredFiles) -> Result<FiltersReport> {
        let original = document::read(filters_path)?;
        let mut doc = Document::parse(&original).map_err(|e| e.at_path(filters_path))?;
        let dir = parent_dir(filters_path);

        let outcome = filters::reconcile(&mut doc, desired, &dir, &self.conventions);
        let change = if outcome.changed() {
            let content = doc.render(&self.conventions.indent);
            self.commit(filters_path, original, content)?
        } else {
            log::info!("No changes for {}", filters_path.display());
            None
        };

        Ok(FiltersReport { outcome, change })
    }

    fn reconcile_include_dirs(
        &self,
        content: &mut String,
        root: &Path,
        project_dir: &Path,
    ) -> Result<IncludeDirStatus> {
        let dirs = match scan::header_dirs(root, project_dir, &self.conventions) {
            Ok(dirs) => dirs,
            Err(Error::NotFound(path)) => return Ok(IncludeDirStatus::RootMissing(path)),
            Err(e) => return Err(e),
        };
        if dirs.is_empty() {
            log::info!("No header directories found in {}", root.display());
            return Ok(IncludeDirStatus::NoHeaders);
        }

        let status = match include_dirs::reconcile(content, &dirs, &self.conventions)? {
            IncludeDirOutcome::FieldMissing => IncludeDirStatus::FieldMissing,
            IncludeDirOutcome::Unchanged => IncludeDirStatus::Unchanged,
            IncludeDirOutcome::Updated {
                content: updated,
                added,
            } => {
                *content = updated;
                IncludeDirStatus::Added(added)
            }
        };
        Ok(status)
    }

    fn commit(&self, path: &Path, before: String, after: String) -> Result<Option<DocumentChange>> {
        if before == after {
            return Ok(None);
        }

        let written = match self.mode {
            WriteMode::Write => {
                std::fs::write(path, &after)?;
                log::info!("Wrote {}", path.display());
                true
            }
            WriteMode::DryRun => false,
        };

        Ok(Some(DocumentChange {
            path: path.to_path_buf(),
            before,
            after,
            written,
        }))
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const PROJECT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Project DefaultTargets="Build" ToolsVersion="17.0" xmlns="http://schemas.microsoft.com/developer/msbuild/2003">
  <ItemGroup Label="ProjectConfigurations">
    <ProjectConfiguration Include="Debug|x64">
      <Configuration>Debug</Configuration>
      <Platform>x64</Platform>
    </ProjectConfiguration>
  </ItemGroup>
  <ItemDefinitionGroup Condition="'$(Configuration)|$(Platform)'=='Debug|x64'">
    <ClCompile>
      <AdditionalIncludeDirectories>$(ProjectDir)Source;%(AdditionalIncludeDirectories)</AdditionalIncludeDirectories>
    </ClCompile>
  </ItemDefinitionGroup>
  <ItemGroup>
    <ClCompile Include="Source\Main.cpp" />
  </ItemGroup>
</Project>
"#;

    const FILTERS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Project ToolsVersion="4.0" xmlns="http://schemas.microsoft.com/developer/msbuild/2003">
  <ItemGroup>
    <Filter Include="Source Files">
      <UniqueIdentifier>{4FC737F1-C7A5-4376-A066-2A32D752A2FF}</UniqueIdentifier>
    </Filter>
  </ItemGroup>
  <ItemGroup>
    <ClCompile Include="Source\Main.cpp">
      <Filter>Source Files</Filter>
    </ClCompile>
  </ItemGroup>
</Project>
"#;

    struct Fixture {
        _tmp: TempDir,
        dir: PathBuf,
        project: PathBuf,
        filters: PathBuf,
    }

    fn fixture(project: &str, filters: Option<&str>) -> Fixture {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().to_path_buf();
        let project_path = dir.join("Mundi.vcxproj");
        let filters_path = dir.join("Mundi.vcxproj.filters");
        fs::write(&project_path, project).unwrap();
        if let Some(filters) = filters {
            fs::write(&filters_path, filters).unwrap();
        }
        Fixture {
            _tmp: tmp,
            dir,
            project: project_path,
            filters: filters_path,
        }
    }

    fn touch(dir: &Path, rel: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn desired(fx: &Fixture, files: &[&str]) -> DesiredFiles {
        DesiredFiles::partition(files.iter().map(|f| fx.dir.join(f)), &Conventions::default())
    }

    #[test]
    fn test_empty_project_gains_group() {
        let fx = fixture(
            "<Project xmlns=\"http://schemas.microsoft.com/developer/msbuild/2003\">\n</Project>\n",
            None,
        );
        let sync = Synchronizer::new(Conventions::default());

        let report = sync
            .sync_project(&fx.project, &desired(&fx, &["Gen/Foo.generated.cpp"]), None)
            .unwrap();

        assert_eq!(report.added, vec![(Role::Source, r"Gen\Foo.generated.cpp".to_string())]);
        let saved = fs::read_to_string(&fx.project).unwrap();
        assert_eq!(
            saved,
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
             <Project xmlns=\"http://schemas.microsoft.com/developer/msbuild/2003\">\n  \
             <ItemGroup>\n    <ClCompile Include=\"Gen\\Foo.generated.cpp\" />\n  </ItemGroup>\n\
             </Project>\n"
        );
    }

    #[test]
    fn test_present_entry_leaves_file_untouched() {
        let project = PROJECT.replace(
            r#"<ClCompile Include="Source\Main.cpp" />"#,
            r#"<ClCompile Include="Source\Main.cpp" />
    <ClCompile Include="Gen\Foo.generated.cpp" />"#,
        );
        let fx = fixture(&project, None);
        let sync = Synchronizer::new(Conventions::default());

        let report = sync
            .sync_project(&fx.project, &desired(&fx, &["Gen/Foo.generated.cpp"]), None)
            .unwrap();

        assert!(report.added.is_empty());
        assert!(report.change.is_none());
        assert_eq!(fs::read_to_string(&fx.project).unwrap(), project);
    }

    #[test]
    fn test_include_dirs_added_to_field() {
        let fx = fixture(PROJECT, None);
        touch(&fx.dir, "Source/Runtime/Core/Object.h");
        let sync = Synchronizer::new(Conventions::default());

        let report = sync
            .sync_project(&fx.project, &DesiredFiles::default(), Some(&fx.dir.join("Source/Runtime")))
            .unwrap();

        assert_eq!(
            report.include_dirs,
            IncludeDirStatus::Added(vec!["Source/Runtime/Core".to_string()])
        );
        let saved = fs::read_to_string(&fx.project).unwrap();
        assert_eq!(
            saved,
            PROJECT.replace(
                "$(ProjectDir)Source;%(AdditionalIncludeDirectories)",
                r"$(ProjectDir)Source;$(ProjectDir)Source\Runtime\Core;%(AdditionalIncludeDirectories)"
            )
        );
    }

    #[test]
    fn test_full_run_is_idempotent() {
        let fx = fixture(PROJECT, Some(FILTERS));
        touch(&fx.dir, "Source/Runtime/Core/Object.h");
        let sync = Synchronizer::new(Conventions::default());
        let wanted = desired(&fx, &["Gen/Foo.generated.cpp", "Gen/Foo.generated.h"]);
        let root = fx.dir.join("Source/Runtime");

        let first = sync.sync_project(&fx.project, &wanted, Some(&root)).unwrap();
        let first_filters = sync.sync_filters(&fx.filters, &wanted).unwrap();
        assert!(first.change.is_some());
        assert!(first_filters.change.is_some());

        let project_after = fs::read_to_string(&fx.project).unwrap();
        let filters_after = fs::read_to_string(&fx.filters).unwrap();

        let second = sync.sync_project(&fx.project, &wanted, Some(&root)).unwrap();
        let second_filters = sync.sync_filters(&fx.filters, &wanted).unwrap();
        assert!(second.added.is_empty());
        assert_eq!(second.include_dirs, IncludeDirStatus::Unchanged);
        assert!(second.change.is_none());
        assert!(second_filters.change.is_none());

        assert_eq!(fs::read_to_string(&fx.project).unwrap(), project_after);
        assert_eq!(fs::read_to_string(&fx.filters).unwrap(), filters_after);
    }

    #[test]
    fn test_no_loss_and_no_duplicates() {
        let fx = fixture(PROJECT, None);
        let sync = Synchronizer::new(Conventions::default());
        let wanted = desired(&fx, &["Source/Main.cpp", "Gen/A.generated.cpp", "Gen/A.generated.cpp"]);

        sync.sync_project(&fx.project, &wanted, None).unwrap();

        let doc = Document::load(&fx.project).unwrap();
        let keys: Vec<_> = doc.entries(Role::Source).iter().map(|e| e.key()).collect();
        assert_eq!(keys, vec!["Source/Main.cpp", "Gen/A.generated.cpp"]);
        // Unrelated content survives the rewrite
        assert!(doc.groups().iter().any(|g| g.attr("Label") == Some("ProjectConfigurations")));
    }

    #[test]
    fn test_filters_scenario() {
        let fx = fixture(PROJECT, Some(FILTERS));
        let sync = Synchronizer::new(Conventions::default());

        let report = sync
            .sync_filters(&fx.filters, &desired(&fx, &["Gen/Foo.generated.h"]))
            .unwrap();

        assert!(report.outcome.filter_created);
        let doc = Document::load(&fx.filters).unwrap();
        assert!(doc.has_filter("Generated"));
        let headers = doc.entries(Role::Header);
        assert_eq!(headers.len(), 1);
        assert_eq!(headers[0].classification.as_deref(), Some("Generated"));
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let fx = fixture(PROJECT, Some(FILTERS));
        let sync = Synchronizer::new(Conventions::default()).with_mode(WriteMode::DryRun);
        let wanted = desired(&fx, &["Gen/Foo.generated.cpp"]);

        let report = sync.sync_project(&fx.project, &wanted, None).unwrap();
        let filters = sync.sync_filters(&fx.filters, &wanted).unwrap();

        let change = report.change.unwrap();
        assert!(!change.written);
        assert!(change.after.contains(r"Gen\Foo.generated.cpp"));
        assert!(!filters.change.unwrap().written);
        assert_eq!(fs::read_to_string(&fx.project).unwrap(), PROJECT);
        assert_eq!(fs::read_to_string(&fx.filters).unwrap(), FILTERS);
    }

    #[test]
    fn test_missing_project() {
        let tmp = TempDir::new().unwrap();
        let sync = Synchronizer::new(Conventions::default());
        let err = sync
            .sync_project(&tmp.path().join("None.vcxproj"), &DesiredFiles::default(), None)
            .unwrap_err();
        assert!(err.is_skippable());
    }

    #[test]
    fn test_malformed_project_not_written() {
        let broken = "<Project><ItemGroup></Project>";
        let fx = fixture(broken, None);
        let sync = Synchronizer::new(Conventions::default());

        let err = sync
            .sync_project(&fx.project, &desired(&fx, &["Gen/Foo.generated.cpp"]), None)
            .unwrap_err();

        assert!(matches!(err, Error::Parse { .. }));
        assert_eq!(fs::read_to_string(&fx.project).unwrap(), broken);
    }

    #[test]
    fn test_absolute_inputs_with_bare_project_path() {
        let cwd = std::env::current_dir().unwrap();
        // Project file sits in the working directory and is named without one
        let project = tempfile::Builder::new()
            .suffix(".vcxproj")
            .tempfile_in(".")
            .unwrap();
        fs::write(project.path(), PROJECT).unwrap();
        let bare = PathBuf::from(project.path().file_name().unwrap());
        let sources = tempfile::Builder::new().tempdir_in(&cwd).unwrap();
        touch(sources.path(), "Source/Runtime/Core/Object.h");
        let dir_name = sources.path().file_name().unwrap().to_string_lossy().into_owned();

        let desired = DesiredFiles::partition(
            [cwd.join("Gen/Foo.generated.cpp")],
            &Conventions::default(),
        );
        let root = sources.path().join("Source/Runtime");
        let sync = Synchronizer::new(Conventions::default());

        let report = sync.sync_project(&bare, &desired, Some(&root)).unwrap();

        assert_eq!(report.added, vec![(Role::Source, r"Gen\Foo.generated.cpp".to_string())]);
        assert_eq!(
            report.include_dirs,
            IncludeDirStatus::Added(vec![format!("{dir_name}/Source/Runtime/Core")])
        );
        let saved = fs::read_to_string(project.path()).unwrap();
        assert!(saved.contains(&format!(
            r"$(ProjectDir)Source;$(ProjectDir){dir_name}\Source\Runtime\Core;%(AdditionalIncludeDirectories)"
        )));

        // The same file given relatively is recognized as present
        let relative = DesiredFiles::partition(["Gen/Foo.generated.cpp"], &Conventions::default());
        let again = sync.sync_project(&bare, &relative, None).unwrap();
        assert!(again.added.is_empty());
        assert!(again.change.is_none());
    }

    #[test]
    fn test_missing_include_root_is_reported() {
        let fx = fixture(PROJECT, None);
        let sync = Synchronizer::new(Conventions::default());
        let root = fx.dir.join("Source/Runtime");

        let report = sync
            .sync_project(&fx.project, &DesiredFiles::default(), Some(&root))
            .unwrap();

        assert_eq!(report.include_dirs, IncludeDirStatus::RootMissing(root));
        assert!(report.change.is_none());
    }
}
