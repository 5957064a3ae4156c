//! Error types shared by every stage of a sort run.
//!
//! A run either completes and returns a full report or fails with one of
//! these errors. Nothing is swallowed inside the library.

use crate::config::ConfigError;
use std::path::PathBuf;

/// Why an archive could not be unpacked.
#[derive(Debug)]
pub enum ExtractionReason {
    /// The extension is not an archive format we can unpack, or the file
    /// content does not match the format its extension claims.
    UnsupportedFormat(String),
    /// The zip container could not be read.
    Corrupt(zip::result::ZipError),
    /// The archive opened fine but held nothing to unpack.
    Empty,
    /// Reading the archive or writing its contents failed.
    Io(std::io::Error),
}

impl std::fmt::Display for ExtractionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedFormat(format) => write!(f, "unrecognized archive format '{}'", format),
            Self::Corrupt(e) => write!(f, "corrupt archive: {}", e),
            Self::Empty => write!(f, "archive holds no entries"),
            Self::Io(e) => write!(f, "{}", e),
        }
    }
}

impl From<std::io::Error> for ExtractionReason {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<zip::result::ZipError> for ExtractionReason {
    fn from(e: zip::result::ZipError) -> Self {
        Self::Corrupt(e)
    }
}

/// Errors that can occur while sorting a folder.
#[derive(Debug)]
pub enum SortError {
    /// The root path is missing or is not a directory.
    InvalidRoot {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The destination for category folders is unusable (missing, or inside the root).
    InvalidDestination { path: PathBuf, reason: String },
    /// The directory walk hit an unreadable entry.
    WalkFailure { source: walkdir::Error },
    /// An archive could not be unpacked. The archive is left in place.
    ExtractionFailure {
        archive: PathBuf,
        reason: ExtractionReason,
    },
    /// A category directory could not be created.
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A file could not be moved into its category directory.
    FileMoveFailure {
        source: PathBuf,
        destination: PathBuf,
        source_error: std::io::Error,
    },
    /// An empty directory could not be removed.
    PruneFailure {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The configuration could not be loaded or compiled.
    Config(ConfigError),
}

impl std::fmt::Display for SortError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRoot { path, source } => {
                write!(f, "Invalid root folder {}: {}", path.display(), source)
            }
            Self::InvalidDestination { path, reason } => {
                write!(f, "Invalid destination {}: {}", path.display(), reason)
            }
            Self::WalkFailure { source } => write!(f, "Failed to walk directory: {}", source),
            Self::ExtractionFailure { archive, reason } => {
                write!(f, "Failed to extract {}: {}", archive.display(), reason)
            }
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::FileMoveFailure {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
            Self::PruneFailure { path, source } => {
                write!(f, "Failed to remove directory {}: {}", path.display(), source)
            }
            Self::Config(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SortError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidRoot { source, .. }
            | Self::DirectoryCreationFailed { source, .. }
            | Self::PruneFailure { source, .. } => Some(source),
            Self::FileMoveFailure { source_error, .. } => Some(source_error),
            Self::WalkFailure { source } => Some(source),
            Self::ExtractionFailure { reason, .. } => match reason {
                ExtractionReason::Corrupt(e) => Some(e),
                ExtractionReason::Io(e) => Some(e),
                ExtractionReason::UnsupportedFormat(_) | ExtractionReason::Empty => None,
            },
            Self::InvalidDestination { .. } => None,
            Self::Config(e) => Some(e),
        }
    }
}

impl From<ConfigError> for SortError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Result type for sort operations.
pub type SortResult<T> = Result<T, SortError>;
