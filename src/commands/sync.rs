//! Project synchronization command.
//!
//! Runs the project pass (entries, then include directories) and the
//! filters pass, reporting each step. A failure in one document never
//! stops the other.

use anyhow::Result;
use std::path::{Path, PathBuf};
use vcxkit::reconcile::FilterOutcome;
use vcxkit::{
    DesiredFiles, DocumentChange, Error, ErrorCategory, FiltersReport, IncludeDirStatus,
    ProjectReport, Role, Synchronizer, WriteMode, paths,
};

use crate::Context;
use crate::cli::Cli;
use crate::config;
use crate::ui;

/// Scan root used when none is given, relative to the project directory
const DEFAULT_INCLUDE_ROOT: &str = "Source/Runtime";

/// Outcome of a full run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub project_changed: bool,
    pub filters_changed: bool,
    /// Steps that reported an error
    pub failures: usize,
}

impl RunSummary {
    pub fn changed(&self) -> bool {
        self.project_changed || self.filters_changed
    }
}

pub fn run(ctx: &Context, cli: &Cli) -> Result<RunSummary> {
    let conventions = config::load(cli.config.as_deref())?;
    let desired = DesiredFiles::partition(cli.files.iter().cloned(), &conventions);
    let filters_path = conventions.filters_path(&cli.project);
    let include_root = include_root(cli);

    let mode = if cli.dry_run {
        WriteMode::DryRun
    } else {
        WriteMode::Write
    };
    let sync = Synchronizer::new(conventions).with_mode(mode);

    if !ctx.quiet {
        banner(&cli.project, &desired);
    }

    let mut summary = RunSummary::default();

    match sync.sync_project(&cli.project, &desired, include_root.as_deref()) {
        Ok(report) => {
            summary.project_changed = report.change.is_some();
            summary.failures += report_project(ctx, &sync, &report, cli.include_root.is_some());
        }
        Err(e) => {
            report_failure(&e);
            summary.failures += 1;
        }
    }

    if filters_path.is_file() {
        match sync.sync_filters(&filters_path, &desired) {
            Ok(report) => {
                summary.filters_changed = report.change.is_some();
                report_filters(ctx, &sync, &report, &filters_path);
            }
            Err(e) => {
                report_failure(&e);
                summary.failures += 1;
            }
        }
    } else {
        ui::warn(&format!("Filters file not found: {}", filters_path.display()));
    }

    if !ctx.quiet {
        finish(&summary, cli.dry_run);
    }

    Ok(summary)
}

/// Resolve the header scan root, `None` when the step is disabled.
fn include_root(cli: &Cli) -> Option<PathBuf> {
    if cli.no_include_dirs {
        return None;
    }
    if let Some(root) = &cli.include_root {
        return Some(root.clone());
    }

    let dir = cli.project.parent().unwrap_or(Path::new(""));
    Some(dir.join(DEFAULT_INCLUDE_ROOT))
}

fn banner(project: &Path, desired: &DesiredFiles) {
    ui::header("Updating Visual Studio Project Files");
    ui::kv("Project", &project.display().to_string());
    ui::kv("CPP Files", &desired.sources.len().to_string());
    ui::kv("Header Files", &desired.headers.len().to_string());
    println!();
}

/// Report the project pass. Returns the number of failed steps.
fn report_project(
    ctx: &Context,
    sync: &Synchronizer,
    report: &ProjectReport,
    explicit_root: bool,
) -> usize {
    let mut failures = 0;

    if !ctx.quiet {
        for role in Role::ALL {
            for include in report.added_of(role) {
                ui::added(&format!("Added {}", role.label()), include);
            }
        }
    }

    match &report.include_dirs {
        IncludeDirStatus::Skipped => log::debug!("Include directory step skipped"),
        IncludeDirStatus::RootMissing(root) if explicit_root => {
            ui::error(&format!("Source directory not found: {}", root.display()));
            failures += 1;
        }
        IncludeDirStatus::RootMissing(root) => {
            ui::warn(&format!(
                "Source directory not found: {}; include directories not updated",
                root.display()
            ));
        }
        IncludeDirStatus::NoHeaders => {
            if !ctx.quiet {
                ui::info("No header directories found");
            }
        }
        IncludeDirStatus::FieldMissing => {
            if !ctx.quiet {
                ui::info(&format!(
                    "No {} field found",
                    sync.conventions().include_field
                ));
            }
        }
        IncludeDirStatus::Unchanged => {
            if !ctx.quiet {
                ui::info("All include directories already present");
            }
        }
        IncludeDirStatus::Added(dirs) => {
            if !ctx.quiet {
                for dir in dirs {
                    ui::added("Added include dir", dir);
                }
            }
        }
    }

    if !ctx.quiet {
        report_change(report.change.as_ref());
    }

    failures
}

fn report_filters(ctx: &Context, sync: &Synchronizer, report: &FiltersReport, path: &Path) {
    if ctx.quiet {
        return;
    }

    let outcome = &report.outcome;
    for (what, value) in filter_progress(outcome, &sync.conventions().filter_name) {
        ui::added(&what, &value);
    }
    if ctx.verbose > 0 {
        for (key, filter) in &outcome.kept {
            ui::dim(&format!("{key} stays in filter {filter}"));
        }
    }

    match &report.change {
        Some(change) => report_change(Some(change)),
        None => ui::info(&format!("No changes to {}", file_name(path))),
    }
}

/// Progress lines for the filters pass. Paths use the `Include` form.
fn filter_progress(outcome: &FilterOutcome, filter_name: &str) -> Vec<(String, String)> {
    let mut lines = Vec::new();
    if outcome.filter_created {
        lines.push(("Created filter".to_string(), filter_name.to_string()));
    }
    for (role, include) in &outcome.added {
        lines.push((format!("Added {} to filter", role.label()), include.clone()));
    }
    for (role, key) in &outcome.tagged {
        lines.push((format!("Tagged {}", role.label()), paths::to_native(key)));
    }
    lines
}

fn report_change(change: Option<&DocumentChange>) {
    let Some(change) = change else {
        return;
    };

    let name = file_name(&change.path);
    if change.written {
        ui::success(&format!("Updated: {name}"));
    } else {
        ui::info(&format!("Would update: {name}"));
        ui::diff(&change.before, &change.after);
    }
}

fn report_failure(error: &Error) {
    let category = error.category();
    match category {
        ErrorCategory::Parse => {
            ui::error(&format!("{error}; document left unchanged"));
        }
        _ => ui::error(&format!("{}: {error}", category.description())),
    }
}

fn finish(summary: &RunSummary, dry_run: bool) {
    println!();
    if !summary.changed() {
        ui::info("No changes needed");
    } else if dry_run {
        ui::info("Dry run: no files written");
    } else {
        ui::success("Project files updated!");
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
