//! clean-folder - sort a folder by file type
//!
//! This library classifies files by extension, transliterates and sanitizes
//! their names, moves them into category folders, unpacks archives into
//! their own subfolders and removes the directories left empty.

pub mod archive;
pub mod cli;
pub mod config;
pub mod error;
pub mod file_category;
pub mod file_organizer;
pub mod normalize;
pub mod output;
pub mod pruner;
pub mod sorter;
pub mod walker;

pub use config::{CompiledFilters, Config, ConfigError};
pub use error::{ExtractionReason, SortError, SortResult};
pub use file_category::{Category, ExtensionClassifier, ExtensionRegistry};
pub use file_organizer::FileOrganizer;
pub use sorter::{SortEvent, SortPlan, SortReport, Sorter, sort_folder};
pub use walker::FileEntry;

pub use cli::{SortCommand, run_cli};
