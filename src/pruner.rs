//! Removal of directories left empty after sorting.

use crate::config::CompiledFilters;
use crate::error::{SortError, SortResult};
use crate::walker;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Removes every empty directory under `root`, `root` included.
///
/// All directories are collected first and then visited deepest first, so a
/// parent is inspected only after its children had their chance to go.
/// Directories that still hold anything are skipped, as are directories
/// `filters` keeps the walk out of.
///
/// Returns the removed directories in removal order.
pub fn prune(root: &Path, filters: &CompiledFilters) -> SortResult<Vec<PathBuf>> {
    let mut dirs: Vec<(usize, PathBuf)> = Vec::new();
    let entries = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| walker::enters(root, filters, entry));
    for entry in entries {
        let entry = entry.map_err(|source| SortError::WalkFailure { source })?;
        if entry.file_type().is_dir() {
            dirs.push((entry.depth(), entry.into_path()));
        }
    }
    dirs.sort_by(|a, b| b.cmp(a));

    let mut removed = Vec::new();
    for (_, dir) in dirs {
        if remove_if_empty(&dir)? {
            tracing::debug!("Removed empty directory {}", dir.display());
            removed.push(dir);
        }
    }
    Ok(removed)
}

fn remove_if_empty(dir: &Path) -> SortResult<bool> {
    let fail = |source| SortError::PruneFailure {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = fs::read_dir(dir).map_err(fail)?;
    if entries.next().is_some() {
        return Ok(false);
    }

    match fs::remove_dir(dir) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::DirectoryNotEmpty => {
            tracing::warn!("{} filled up while pruning, keeping it", dir.display());
            Ok(false)
        }
        Err(e) => Err(fail(e)),
    }
}
