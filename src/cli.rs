//! Command-line interface module for clean-folder.
//!
//! Parses arguments, loads configuration, runs the sorter and hands the
//! result to [`OutputFormatter`].

use crate::config::Config;
use crate::output::OutputFormatter;
use crate::sorter::{SortEvent, Sorter};
use clap::{ArgAction, Parser};
use std::path::{Path, PathBuf};

/// Sort a folder by file type.
#[derive(Debug, Parser)]
#[command(name = "clean-folder", version, about)]
pub struct Cli {
    /// The folder to sort
    pub folder: PathBuf,

    /// Directory that receives the category folders (default: the folder's parent)
    #[arg(long, value_name = "DIR")]
    pub dest: Option<PathBuf>,

    /// Configuration file (default: .clean-folder.toml, then ~/.config/clean-folder/config.toml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Show what would happen without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// What to do with the folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortCommand {
    /// Sort the folder.
    Sort,
    /// Report what sorting would do.
    DryRun,
}

/// Settings shared by both commands.
#[derive(Debug, Clone, Default)]
pub struct CliOptions {
    pub destination: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
    pub json: bool,
}

impl Cli {
    /// Splits parsed arguments into a command and its options.
    pub fn command(&self) -> (SortCommand, CliOptions) {
        let command = if self.dry_run {
            SortCommand::DryRun
        } else {
            SortCommand::Sort
        };
        let options = CliOptions {
            destination: self.dest.clone(),
            config_path: self.config.clone(),
            json: self.json,
        };
        (command, options)
    }
}

/// Runs a command against `dir_path` with default options.
///
/// # Examples
///
/// ```no_run
/// use clean_folder::cli::{run_cli, SortCommand};
/// use std::path::Path;
///
/// match run_cli(SortCommand::DryRun, Path::new("/path/to/folder")) {
///     Ok(()) => println!("Done"),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(command: SortCommand, dir_path: &Path) -> Result<(), String> {
    run_cli_with_options(command, dir_path, &CliOptions::default())
}

/// Runs a command against `dir_path`.
pub fn run_cli_with_options(
    command: SortCommand,
    dir_path: &Path,
    options: &CliOptions,
) -> Result<(), String> {
    let config = Config::load(options.config_path.as_deref())
        .map_err(|e| format!("Error loading configuration: {}", e))?;
    let mut sorter = Sorter::from_config(&config).map_err(|e| e.to_string())?;
    if let Some(dest) = &options.destination {
        sorter = sorter.with_destination(dest);
    }

    match command {
        SortCommand::Sort => sort_directory(&sorter, dir_path, options.json),
        SortCommand::DryRun => plan_directory(&sorter, dir_path, options.json),
    }
}

fn sort_directory(sorter: &Sorter, dir_path: &Path, json: bool) -> Result<(), String> {
    if !json {
        OutputFormatter::info(&format!("Sorting contents of: {}", dir_path.display()));
    }

    let spinner = OutputFormatter::create_spinner(!json);
    let result = sorter.sort_with_progress(dir_path, |event| match event {
        SortEvent::Relocated { to, .. } => {
            spinner.inc(1);
            spinner.set_message(format!("→ {}", to.display()));
        }
        SortEvent::Extracted { archive, files } => {
            spinner.inc(1);
            spinner.set_message(format!(
                "unpacked {} ({} files)",
                archive.display(),
                files.len()
            ));
        }
        SortEvent::Pruned { dir } => {
            spinner.set_message(format!("removed {}", dir.display()));
        }
    });
    spinner.finish_and_clear();

    let report = result.map_err(|e| e.to_string())?;
    if json {
        return OutputFormatter::json(&report);
    }

    OutputFormatter::report(&report);
    if !report.unknown_file_extensions.is_empty() {
        OutputFormatter::warning("Files with unknown extensions were moved to others/");
    }
    println!();
    OutputFormatter::success("Sorting complete!");
    Ok(())
}

fn plan_directory(sorter: &Sorter, dir_path: &Path, json: bool) -> Result<(), String> {
    let plan = sorter.plan(dir_path).map_err(|e| e.to_string())?;
    if json {
        return OutputFormatter::json(&plan);
    }

    OutputFormatter::plan(&plan);
    println!(
        "Run 'clean-folder {}' (without --dry-run) to sort the folder.",
        dir_path.display()
    );
    Ok(())
}
