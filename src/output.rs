//! Console presentation: colored status lines, the progress bar, and
//! the end-of-run summary table. Presentation only; nothing in here is
//! part of the organizing contract.

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;

/// Central place for every line desksweep prints, so styling stays
/// consistent across the CLI.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Green checkmark line.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Red cross line, on stderr.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Yellow warning line.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Cyan informational line.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Unstyled line.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Bold section header preceded by a blank line.
    pub fn header(message: &str) {
        println!("\n{}", message.bold());
    }

    /// Yellow `[DRY RUN]` prefixed line.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Progress bar sized for `total` file moves.
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.green/white}] {pos}/{len} {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("█▓░"),
        );
        bar
    }

    /// Moved-files-per-folder table, categories sorted by name.
    pub fn summary_table(category_counts: &HashMap<String, usize>, total_files: usize) {
        Self::header("SUMMARY");

        let mut categories: Vec<_> = category_counts.iter().collect();
        categories.sort_by_key(|&(name, _)| name);

        let label_width = categories
            .iter()
            .map(|(name, _)| name.len())
            .max()
            .unwrap_or(0)
            .max("Category".len());

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = label_width
        );
        println!("{}", "-".repeat(label_width + 10));

        for (category, count) in &categories {
            println!(
                "{:<width$} | {} {}",
                category,
                count.to_string().green(),
                if **count == 1 { "file" } else { "files" },
                width = label_width
            );
        }

        println!("{}", "-".repeat(label_width + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            if total_files == 1 { "file" } else { "files" },
            width = label_width
        );
    }
}
