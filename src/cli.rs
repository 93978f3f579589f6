//! Command-line orchestration: argument parsing, default target
//! resolution, and the per-directory organize flow (report start, skip
//! missing directories, prepare folders, sort, report success).

use crate::category::CategoryMap;
use crate::config::{CompiledFilters, OrganizerConfig};
use crate::organizer::{self, SortEvent};
use crate::output::OutputFormatter;
use clap::Parser;
use indicatif::ProgressBar;
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

/// Tidy directories by moving files into category subfolders.
#[derive(Debug, Parser)]
#[command(
    name = "desksweep",
    version,
    about = "Tidy directories by moving files into category subfolders based on extension"
)]
pub struct Cli {
    /// Directories to organize; defaults to Downloads and Desktop
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub paths: Vec<PathBuf>,

    /// Show what would be moved without touching any files
    #[arg(long)]
    pub dry_run: bool,

    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// A directory to organize plus the name used for it in console output.
#[derive(Debug, Clone)]
pub struct Target {
    pub path: PathBuf,
    pub label: String,
}

impl Target {
    /// Creates a target labeled after the path's final component.
    pub fn new(path: PathBuf) -> Self {
        let label = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, label }
    }
}

/// The conventional targets: Downloads and Desktop under the user's
/// home directory.
///
/// # Errors
///
/// Returns an error when `HOME` is not set; explicit paths on the
/// command line never need it.
pub fn default_targets() -> Result<Vec<Target>, String> {
    let home = env::var("HOME")
        .map_err(|_| "HOME is not set; pass the directories to organize explicitly".to_string())?;
    let home = PathBuf::from(home);
    Ok(vec![
        Target::new(home.join("Downloads")),
        Target::new(home.join("Desktop")),
    ])
}

/// Entry point called from `main` after argument parsing.
///
/// Loads configuration, resolves targets, and processes them
/// sequentially; the first error aborts the remaining targets.
pub fn run(cli: &Cli) -> Result<(), String> {
    let config = OrganizerConfig::load(cli.config.as_deref())
        .map_err(|e| format!("Error loading configuration: {}", e))?;
    let map = config
        .category_map()
        .map_err(|e| format!("Error in category configuration: {}", e))?;
    let filters = config
        .filters
        .compile()
        .map_err(|e| format!("Error compiling filters: {}", e))?;

    let targets: Vec<Target> = if cli.paths.is_empty() {
        default_targets()?
    } else {
        cli.paths.iter().cloned().map(Target::new).collect()
    };

    for target in &targets {
        organize_target(target, &map, &filters, cli.dry_run)?;
    }

    Ok(())
}

/// Organizes one target directory.
///
/// A missing directory is reported and skipped; that is a normal
/// outcome, not an error. Otherwise the category folders are prepared
/// and the entries sorted, with per-file progress and a summary table
/// on the console.
pub fn organize_target(
    target: &Target,
    map: &CategoryMap,
    filters: &CompiledFilters,
    dry_run: bool,
) -> Result<(), String> {
    OutputFormatter::header(&format!(
        "Organizing {} at: {}",
        target.label,
        target.path.display()
    ));

    if !target.path.exists() {
        OutputFormatter::warning(&format!("{} folder not found, skipping.", target.label));
        return Ok(());
    }

    if dry_run {
        return preview_target(target, map, filters);
    }

    organizer::ensure_category_folders(&target.path, map).map_err(|e| format!("Error: {}", e))?;

    let mut bar: Option<ProgressBar> = None;
    let report = organizer::sort_entries(&target.path, map, filters, |event| match event {
        SortEvent::Begin { total } => {
            if total > 0 {
                bar = Some(OutputFormatter::create_progress_bar(total as u64));
            }
        }
        SortEvent::Moved { operation } => {
            if let Some(bar) = &bar {
                let name = operation
                    .original_path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                bar.println(format!(" - {} → {}/", name, operation.category));
                bar.inc(1);
            }
        }
    })
    .map_err(|e| format!("Error: {}", e))?;

    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    if report.operations.is_empty() {
        OutputFormatter::plain("No files to organize.");
    } else {
        OutputFormatter::summary_table(&report.category_counts(), report.operations.len());
    }
    if report.skipped > 0 {
        OutputFormatter::info(&format!(
            "{} file(s) left in place by filter rules.",
            report.skipped
        ));
    }

    OutputFormatter::success(&format!("{} organized successfully!", target.label));
    Ok(())
}

/// Prints what organizing `target` would do, without moving anything.
fn preview_target(
    target: &Target,
    map: &CategoryMap,
    filters: &CompiledFilters,
) -> Result<(), String> {
    let planned =
        organizer::plan_entries(&target.path, map, filters).map_err(|e| format!("Error: {}", e))?;

    if planned.is_empty() {
        OutputFormatter::plain("No files to organize.");
        return Ok(());
    }

    let mut counts: HashMap<String, usize> = HashMap::new();
    for plan in &planned {
        OutputFormatter::plain(&format!(" - {} → {}/", plan.file_name, plan.category));
        *counts.entry(plan.category.clone()).or_insert(0) += 1;
    }

    OutputFormatter::summary_table(&counts, planned.len());
    OutputFormatter::dry_run_notice("No files were modified.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_label_from_path() {
        let target = Target::new(PathBuf::from("/home/user/Downloads"));
        assert_eq!(target.label, "Downloads");
        assert_eq!(target.path, PathBuf::from("/home/user/Downloads"));
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::parse_from(["desksweep", "/tmp/inbox", "--dry-run"]);
        assert_eq!(cli.paths, vec![PathBuf::from("/tmp/inbox")]);
        assert!(cli.dry_run);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_defaults_to_no_paths() {
        let cli = Cli::parse_from(["desksweep"]);
        assert!(cli.paths.is_empty());
        assert!(!cli.dry_run);
    }
}
