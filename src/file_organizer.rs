/// Moving files into category directories.
///
/// Files are moved into `<destination>/<category>/` under their normalized
/// name. The category directory is created on first use.
use crate::error::{SortError, SortResult};
use crate::file_category::Category;
use crate::normalize::normalized_file_name;
use crate::walker::FileEntry;
use std::fs;
use std::path::{Path, PathBuf};

/// Moves classified files into category subdirectories.
pub struct FileOrganizer;

impl FileOrganizer {
    /// The path `entry` ends up at when relocated into `category`.
    ///
    /// # Examples
    ///
    /// ```
    /// use clean_folder::file_category::Category;
    /// use clean_folder::file_organizer::FileOrganizer;
    /// use clean_folder::walker::FileEntry;
    /// use std::path::Path;
    ///
    /// let entry = FileEntry::from_path("/inbox/відпустка 2024.JPG");
    /// let target = FileOrganizer::target_path(&entry, Category::Images, Path::new("/sorted"));
    /// assert_eq!(target, Path::new("/sorted/images/vidpustka_2024.JPG"));
    /// ```
    pub fn target_path(entry: &FileEntry, category: Category, destination: &Path) -> PathBuf {
        destination
            .join(category.dir_name())
            .join(normalized_file_name(&entry.base_name, &entry.extension))
    }

    /// Moves a file into its category directory under its normalized name.
    ///
    /// If the category directory doesn't exist, it is created. A file already
    /// present under the target name is replaced.
    ///
    /// # Arguments
    ///
    /// * `entry` - The file to move
    /// * `category` - The category it was classified into
    /// * `destination` - The directory holding the category directories
    ///
    /// # Returns
    ///
    /// The new path of the file.
    pub fn relocate(
        entry: &FileEntry,
        category: Category,
        destination: &Path,
    ) -> SortResult<PathBuf> {
        let category_path = destination.join(category.dir_name());

        if !category_path.is_dir() {
            fs::create_dir_all(&category_path).map_err(|e| SortError::DirectoryCreationFailed {
                path: category_path.clone(),
                source: e,
            })?;
        }

        let destination_path = Self::target_path(entry, category, destination);

        fs::rename(&entry.path, &destination_path).map_err(|e| SortError::FileMoveFailure {
            source: entry.path.clone(),
            destination: destination_path.clone(),
            source_error: e,
        })?;

        tracing::debug!(
            "Moved {} to {}",
            entry.path.display(),
            destination_path.display()
        );
        Ok(destination_path)
    }
}
