//! Output formatting and styling module.
//!
//! All user-facing output of the command line goes through here: colored
//! status lines, the progress spinner, and the rendering of reports and plans.

use crate::file_category::Category;
use crate::sorter::{SortPlan, SortReport};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::collections::BTreeSet;
use std::time::Duration;

/// Manages all CLI output with consistent styling and formatting.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use clean_folder::output::OutputFormatter;
    /// OutputFormatter::success("Folder sorted");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Creates a spinner for a sort run, whose length is not known up front.
    ///
    /// Returns a hidden spinner when `visible` is false.
    pub fn create_spinner(visible: bool) -> ProgressBar {
        if !visible {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {pos} processed {msg}")
                .expect("Invalid spinner template"),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    /// Prints `value` as pretty JSON on stdout.
    pub fn json<T: Serialize>(value: &T) -> Result<(), String> {
        let text = serde_json::to_string_pretty(value)
            .map_err(|e| format!("Failed to serialize output: {}", e))?;
        println!("{}", text);
        Ok(())
    }

    /// Prints where every file went, followed by the summary table.
    pub fn report(report: &SortReport) {
        for category in Category::ALL {
            let files = report.files_in(category);
            if files.is_empty() {
                continue;
            }
            Self::header(&format!(
                "{} ({})",
                category.dir_name(),
                category.description()
            ));
            for name in files {
                println!("  {}", name);
            }
        }

        Self::extensions("Known extensions", &report.known_file_extensions);
        Self::extensions("Unknown extensions", &report.unknown_file_extensions);
        Self::summary_table(report);
    }

    fn extensions(label: &str, extensions: &BTreeSet<String>) {
        let list = if extensions.is_empty() {
            "-".dimmed().to_string()
        } else {
            extensions.iter().cloned().collect::<Vec<_>>().join(", ")
        };
        println!("{}: {}", label.bold(), list);
    }

    /// Prints a summary table with file counts by category.
    pub fn summary_table(report: &SortReport) {
        Self::header("SUMMARY");

        let rows: Vec<(&str, usize)> = Category::ALL
            .iter()
            .map(|category| (category.dir_name(), report.files_in(*category).len()))
            .filter(|(_, count)| *count > 0)
            .collect();
        let total: usize = rows.iter().map(|(_, count)| count).sum();

        let width = rows
            .iter()
            .map(|(name, _)| name.len())
            .max()
            .unwrap_or(0)
            .max(8); // At least "Category" width

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = width
        );
        println!("{}", "-".repeat(width + 10));
        for (category, count) in &rows {
            println!(
                "{:<width$} | {} {}",
                category,
                count.to_string().green(),
                plural(*count),
                width = width
            );
        }
        println!("{}", "-".repeat(width + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total.to_string().green().bold(),
            plural(total),
            width = width
        );
    }

    /// Prints the moves and extractions a dry run found.
    pub fn plan(plan: &SortPlan) {
        if plan.moves.is_empty() && plan.extractions.is_empty() {
            Self::dry_run_notice("No files found to sort.");
            return;
        }

        Self::dry_run_notice("Files would be sorted as follows:");
        for planned in &plan.moves {
            println!(" - {}", planned.source.display());
            println!("   → {}", planned.destination.display());
        }
        for planned in &plan.extractions {
            println!(" - {}", planned.archive.display());
            println!("   → unpack into {}/", planned.target.display());
        }

        Self::extensions("Known extensions", &plan.known_file_extensions);
        Self::extensions("Unknown extensions", &plan.unknown_file_extensions);
        println!();
        Self::success("Dry run complete. No files were modified.");
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}
