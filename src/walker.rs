//! Recursive enumeration of the files under a folder.

use crate::config::CompiledFilters;
use crate::error::{SortError, SortResult};
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// A file discovered by the walker, with its name split at the final dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    /// Everything before the final dot, or the whole name if there is none.
    pub base_name: String,
    /// Text after the final dot, empty if there is none.
    pub extension: String,
}

impl FileEntry {
    /// Builds an entry from a path. Non UTF-8 names are converted lossily.
    ///
    /// # Examples
    ///
    /// ```
    /// use clean_folder::walker::FileEntry;
    ///
    /// let entry = FileEntry::from_path("/tmp/backup.tar.gz");
    /// assert_eq!(entry.base_name, "backup.tar");
    /// assert_eq!(entry.extension, "gz");
    /// ```
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let (base_name, extension) = split_name(&name);
        Self {
            base_name: base_name.to_string(),
            extension: extension.to_string(),
            path,
        }
    }

    /// The file name as found on disk.
    pub fn file_name(&self) -> String {
        if self.extension.is_empty() {
            self.base_name.clone()
        } else {
            format!("{}.{}", self.base_name, self.extension)
        }
    }
}

/// Splits a file name at its final dot.
///
/// A trailing dot yields an empty extension and drops the dot, matching
/// how the name is rebuilt after normalization.
pub fn split_name(name: &str) -> (&str, &str) {
    match name.rsplit_once('.') {
        Some((base, ext)) => (base, ext),
        None => (name, ""),
    }
}

/// Lazily walks every file below `root`.
///
/// Directories and symbolic links are not yielded. Files rejected by
/// `filters` (matched on their path relative to `root`) are skipped, and
/// directories the filters refuse are not entered at all.
pub fn walk<'a>(
    root: &'a Path,
    filters: &'a CompiledFilters,
) -> impl Iterator<Item = SortResult<FileEntry>> + 'a {
    WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_entry(move |entry| enters(root, filters, entry))
        .filter_map(move |entry| {
            let entry = match entry {
                Ok(entry) => entry,
                Err(source) => return Some(Err(SortError::WalkFailure { source })),
            };
            if !entry.file_type().is_file() {
                return None;
            }
            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            if !filters.should_include(relative) {
                tracing::debug!("Skipping excluded file {}", entry.path().display());
                return None;
            }
            Some(Ok(FileEntry::from_path(entry.into_path())))
        })
}

/// Walk predicate shared with the pruner: files always pass, directories
/// only when `filters` lets the walk descend into them.
pub(crate) fn enters(root: &Path, filters: &CompiledFilters, entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return true;
    }
    let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
    filters.should_descend(relative)
}
