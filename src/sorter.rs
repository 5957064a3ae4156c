//! One sort run over a folder.
//!
//! The [`Sorter`] walks the folder, classifies each file by extension,
//! moves it into its category directory (or unpacks it, for archives),
//! prunes the directories left empty and returns a [`SortReport`].
//!
//! Category directories are created in the destination directory, which
//! defaults to the parent of the sorted folder.

use crate::archive;
use crate::config::{CompiledFilters, Config};
use crate::error::{SortError, SortResult};
use crate::file_category::{Category, ExtensionClassifier, ExtensionRegistry};
use crate::file_organizer::FileOrganizer;
use crate::normalize::normalized_file_name;
use crate::pruner;
use crate::walker::walk;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Where every file ended up after one run.
///
/// Serializes to a flat JSON object: one key per category that received
/// files, plus `archives`, `known_file_extensions` and
/// `unknown_file_extensions`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SortReport {
    /// Normalized file names per category, in discovery order. Never holds
    /// [`Category::Archives`]; see `archives`.
    #[serde(flatten)]
    pub categories: BTreeMap<Category, Vec<String>>,
    /// Every file name found under the archives folder after the run.
    pub archives: Vec<String>,
    pub known_file_extensions: BTreeSet<String>,
    pub unknown_file_extensions: BTreeSet<String>,
}

impl SortReport {
    /// File names placed in `category`.
    pub fn files_in(&self, category: Category) -> &[String] {
        if category == Category::Archives {
            return &self.archives;
        }
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of files moved into non-archive categories.
    pub fn moved_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }
}

/// Progress notifications emitted while a run is in flight.
#[derive(Debug, Clone, Copy)]
pub enum SortEvent<'a> {
    Relocated {
        from: &'a Path,
        to: &'a Path,
        category: Category,
    },
    Extracted {
        archive: &'a Path,
        files: &'a [String],
    },
    Pruned {
        dir: &'a Path,
    },
}

/// A file move the sorter would perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedMove {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub category: Category,
}

/// An archive the sorter would unpack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedExtraction {
    pub archive: PathBuf,
    pub target: PathBuf,
}

/// The outcome of a run computed without touching the filesystem.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SortPlan {
    pub moves: Vec<PlannedMove>,
    pub extractions: Vec<PlannedExtraction>,
    pub known_file_extensions: BTreeSet<String>,
    pub unknown_file_extensions: BTreeSet<String>,
}

/// Sorts folders. Holds the classification table and file filters; every
/// call to [`Sorter::sort`] starts from a fresh extension registry.
#[derive(Debug, Clone, Default)]
pub struct Sorter {
    classifier: ExtensionClassifier,
    filters: CompiledFilters,
    destination: Option<PathBuf>,
}

impl Sorter {
    /// A sorter with the standard extension table and no filters.
    pub fn new() -> Self {
        Self::default()
    }

    /// A sorter using the extension mappings and filters from `config`.
    pub fn from_config(config: &Config) -> SortResult<Self> {
        Ok(Self {
            classifier: config.classifier()?,
            filters: config.compile_filters()?,
            destination: None,
        })
    }

    /// Creates the category directories in `destination` instead of next to
    /// the sorted folder.
    pub fn with_destination(mut self, destination: impl Into<PathBuf>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    /// Sorts `root`.
    pub fn sort(&self, root: &Path) -> SortResult<SortReport> {
        self.sort_with_progress(root, |_| {})
    }

    /// Sorts `root`, reporting each step to `on_event`.
    pub fn sort_with_progress<F>(&self, root: &Path, mut on_event: F) -> SortResult<SortReport>
    where
        F: FnMut(&SortEvent<'_>),
    {
        let (root, destination) = self.resolve_paths(root)?;
        let archives_dir = destination.join(Category::Archives.dir_name());
        tracing::info!(
            "Sorting {} into {}",
            root.display(),
            destination.display()
        );

        let mut registry = ExtensionRegistry::new();
        let mut categories: BTreeMap<Category, Vec<String>> = BTreeMap::new();

        for entry in walk(&root, &self.filters) {
            let entry = entry?;
            let category = self.classifier.classify(&entry.extension);
            registry.record(&entry.extension, category);

            if category == Category::Archives {
                let files = archive::extract(&entry, &archives_dir)?;
                on_event(&SortEvent::Extracted {
                    archive: &entry.path,
                    files: &files,
                });
            } else {
                let new_path = FileOrganizer::relocate(&entry, category, &destination)?;
                categories
                    .entry(category)
                    .or_default()
                    .push(normalized_file_name(&entry.base_name, &entry.extension));
                on_event(&SortEvent::Relocated {
                    from: &entry.path,
                    to: &new_path,
                    category,
                });
            }
        }

        let pruned = pruner::prune(&root, &self.filters)?;
        tracing::info!("Removed {} empty directories", pruned.len());
        for dir in &pruned {
            on_event(&SortEvent::Pruned { dir });
        }

        let archives = archive::collect_archived_files(&archives_dir)?;
        let (known_file_extensions, unknown_file_extensions) = registry.into_sets();

        Ok(SortReport {
            categories,
            archives,
            known_file_extensions,
            unknown_file_extensions,
        })
    }

    /// Computes what [`Sorter::sort`] would do, without changing anything.
    pub fn plan(&self, root: &Path) -> SortResult<SortPlan> {
        let (root, destination) = self.resolve_paths(root)?;
        let archives_dir = destination.join(Category::Archives.dir_name());

        let mut registry = ExtensionRegistry::new();
        let mut plan = SortPlan::default();

        for entry in walk(&root, &self.filters) {
            let entry = entry?;
            let category = self.classifier.classify(&entry.extension);
            registry.record(&entry.extension, category);

            if category == Category::Archives {
                plan.extractions.push(PlannedExtraction {
                    target: archive::extraction_target(&entry, &archives_dir),
                    archive: entry.path,
                });
            } else {
                plan.moves.push(PlannedMove {
                    destination: FileOrganizer::target_path(&entry, category, &destination),
                    source: entry.path,
                    category,
                });
            }
        }

        let (known, unknown) = registry.into_sets();
        plan.known_file_extensions = known;
        plan.unknown_file_extensions = unknown;
        Ok(plan)
    }

    /// Validates the folder to sort and works out the destination.
    ///
    /// Both paths come back canonicalized.
    fn resolve_paths(&self, root: &Path) -> SortResult<(PathBuf, PathBuf)> {
        let invalid_root = |source| SortError::InvalidRoot {
            path: root.to_path_buf(),
            source,
        };

        let metadata = fs::metadata(root).map_err(invalid_root)?;
        if !metadata.is_dir() {
            return Err(invalid_root(std::io::Error::new(
                ErrorKind::NotADirectory,
                "not a directory",
            )));
        }
        let root = root.canonicalize().map_err(invalid_root)?;

        let destination = match &self.destination {
            Some(dest) => {
                if !dest.is_dir() {
                    return Err(SortError::InvalidDestination {
                        path: dest.clone(),
                        reason: "not an existing directory".to_string(),
                    });
                }
                dest.canonicalize()
                    .map_err(|e| SortError::InvalidDestination {
                        path: dest.clone(),
                        reason: e.to_string(),
                    })?
            }
            None => root
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| SortError::InvalidDestination {
                    path: root.clone(),
                    reason: "the folder has no parent to hold category folders".to_string(),
                })?,
        };

        if destination.starts_with(&root) {
            return Err(SortError::InvalidDestination {
                path: destination,
                reason: "category folders cannot live inside the folder being sorted".to_string(),
            });
        }
        if Category::ALL
            .iter()
            .any(|category| root.starts_with(destination.join(category.dir_name())))
        {
            return Err(SortError::InvalidDestination {
                path: destination,
                reason: format!(
                    "{} lies within a category folder of this destination",
                    root.display()
                ),
            });
        }

        Ok((root, destination))
    }
}

/// Sorts `root` with the standard table, placing category folders next to it.
///
/// # Examples
///
/// ```no_run
/// use clean_folder::sort_folder;
/// use std::path::Path;
///
/// let report = sort_folder(Path::new("/home/user/Downloads/inbox")).unwrap();
/// println!("{} files moved", report.moved_count());
/// ```
pub fn sort_folder(root: &Path) -> SortResult<SortReport> {
    Sorter::new().sort(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::test_support::write_zip;
    use tempfile::TempDir;

    /// A temp directory holding an `inbox` folder to sort.
    fn setup() -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path().join("inbox");
        fs::create_dir(&root).expect("Failed to create inbox");
        (temp_dir, root)
    }

    #[test]
    fn test_sort_report_lists_files_per_category() {
        let (temp_dir, root) = setup();
        fs::write(root.join("photo.JPG"), "img").unwrap();
        fs::write(root.join("пісня.mp3"), "mp3").unwrap();
        fs::write(root.join("notes"), "no extension").unwrap();

        let report = sort_folder(&root).expect("Sort failed");

        assert_eq!(report.files_in(Category::Images), ["photo.JPG"]);
        assert_eq!(report.files_in(Category::Audio), ["pisnya.mp3"]);
        assert_eq!(report.files_in(Category::Others), ["notes"]);
        assert!(report.files_in(Category::Video).is_empty());
        assert!(temp_dir.path().join("audio/pisnya.mp3").is_file());
        assert_eq!(
            report.known_file_extensions,
            BTreeSet::from(["JPG".to_string(), "mp3".to_string()])
        );
        assert!(report.unknown_file_extensions.is_empty());
    }

    #[test]
    fn test_archives_are_reported_from_the_archives_folder() {
        let (temp_dir, root) = setup();
        write_zip(&root.join("bundle.zip"), &[("a.txt", "a"), ("b/c.txt", "c")]);

        let report = sort_folder(&root).expect("Sort failed");

        assert!(!report.categories.contains_key(&Category::Archives));
        assert_eq!(report.archives, ["a.txt", "c.txt"]);
        assert!(temp_dir.path().join("archives/bundle/b/c.txt").is_file());
        assert!(report.known_file_extensions.contains("zip"));
    }

    #[test]
    fn test_registry_does_not_leak_between_runs() {
        let (_temp_dir, root) = setup();
        fs::write(root.join("a.xyz"), "").unwrap();
        let sorter = Sorter::new();

        let first = sorter.sort(&root).expect("First sort failed");
        assert!(first.unknown_file_extensions.contains("xyz"));

        fs::create_dir(&root).unwrap();
        fs::write(root.join("b.txt"), "").unwrap();
        let second = sorter.sort(&root).expect("Second sort failed");

        assert!(second.unknown_file_extensions.is_empty());
        assert_eq!(
            second.known_file_extensions,
            BTreeSet::from(["txt".to_string()])
        );
    }

    #[test]
    fn test_progress_events() {
        let (_temp_dir, root) = setup();
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::write(root.join("sub/clip.mp4"), "").unwrap();
        write_zip(&root.join("pack.zip"), &[("x.txt", "")]);

        let mut relocated = 0;
        let mut extracted = Vec::new();
        let mut pruned = 0;
        Sorter::new()
            .sort_with_progress(&root, |event| match event {
                SortEvent::Relocated { category, .. } => {
                    assert_eq!(*category, Category::Video);
                    relocated += 1;
                }
                SortEvent::Extracted { files, .. } => extracted.extend(files.iter().cloned()),
                SortEvent::Pruned { .. } => pruned += 1,
            })
            .expect("Sort failed");

        assert_eq!(relocated, 1);
        assert_eq!(extracted, ["x.txt"]);
        // sub, then the emptied root itself
        assert_eq!(pruned, 2);
    }

    #[test]
    fn test_invalid_root_is_rejected_before_any_change() {
        let (temp_dir, root) = setup();
        let missing = temp_dir.path().join("missing");
        assert!(matches!(
            sort_folder(&missing),
            Err(SortError::InvalidRoot { .. })
        ));

        let file = root.join("file.txt");
        fs::write(&file, "").unwrap();
        assert!(matches!(
            sort_folder(&file),
            Err(SortError::InvalidRoot { .. })
        ));
        assert!(file.is_file());
    }

    #[test]
    fn test_destination_inside_root_is_rejected() {
        let (_temp_dir, root) = setup();
        fs::create_dir(root.join("out")).unwrap();
        fs::write(root.join("a.txt"), "").unwrap();

        let result = Sorter::new().with_destination(root.join("out")).sort(&root);

        assert!(matches!(result, Err(SortError::InvalidDestination { .. })));
        assert!(root.join("a.txt").is_file());
    }

    #[test]
    fn test_root_named_like_a_category_is_rejected() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path().join("images");
        fs::create_dir(&root).unwrap();

        assert!(matches!(
            sort_folder(&root),
            Err(SortError::InvalidDestination { .. })
        ));
    }

    #[test]
    fn test_root_inside_a_category_folder_is_rejected() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path().join("archives/foo");
        fs::create_dir_all(&root).unwrap();
        write_zip(&root.join("foo.zip"), &[("x.txt", "x")]);

        let result = Sorter::new()
            .with_destination(temp_dir.path())
            .sort(&root);

        assert!(matches!(result, Err(SortError::InvalidDestination { .. })));
        assert!(root.join("foo.zip").is_file());
        assert!(!root.join("x.txt").exists());
    }

    #[test]
    fn test_hidden_directories_left_intact_when_disabled() {
        let (_temp_dir, root) = setup();
        fs::create_dir_all(root.join(".git/objects")).unwrap();
        fs::create_dir_all(root.join(".git/refs/tags")).unwrap();
        fs::write(root.join(".git/HEAD"), "ref: refs/heads/main").unwrap();
        fs::write(root.join(".git/objects/pack.txt"), "x").unwrap();
        fs::write(root.join("notes.txt"), "x").unwrap();
        let config = Config::from_toml("[filters]\nenable_hidden_files = false\n").unwrap();

        let report = Sorter::from_config(&config)
            .unwrap()
            .sort(&root)
            .expect("Sort failed");

        assert_eq!(report.moved_count(), 1);
        assert_eq!(report.files_in(Category::Documents), ["notes.txt"]);
        assert!(root.join(".git/HEAD").is_file());
        assert!(root.join(".git/objects/pack.txt").is_file());
        assert!(root.join(".git/refs/tags").is_dir());
    }

    #[test]
    fn test_custom_destination() {
        let (temp_dir, root) = setup();
        let out = temp_dir.path().join("sorted");
        fs::create_dir(&out).unwrap();
        fs::write(root.join("deck.pptx"), "").unwrap();

        Sorter::new()
            .with_destination(&out)
            .sort(&root)
            .expect("Sort failed");

        assert!(out.join("documents/deck.pptx").is_file());
        assert!(!temp_dir.path().join("documents").exists());
    }

    #[test]
    fn test_plan_does_not_touch_the_filesystem() {
        let (temp_dir, root) = setup();
        fs::create_dir_all(root.join("empty")).unwrap();
        fs::write(root.join("фото.png"), "").unwrap();
        fs::write(root.join("old.tar"), "").unwrap();

        let plan = Sorter::new().plan(&root).expect("Plan failed");

        assert_eq!(plan.moves.len(), 1);
        assert_eq!(plan.moves[0].category, Category::Images);
        assert!(plan.moves[0].destination.ends_with("images/foto.png"));
        assert_eq!(plan.extractions.len(), 1);
        assert!(plan.extractions[0].target.ends_with("archives/old"));
        assert!(root.join("фото.png").is_file());
        assert!(root.join("empty").is_dir());
        assert!(!temp_dir.path().join("images").exists());
    }

    #[test]
    fn test_config_mappings_and_filters_apply() {
        let (temp_dir, root) = setup();
        fs::write(root.join("pic.webp"), "").unwrap();
        fs::write(root.join("download.part"), "").unwrap();
        let config = Config::from_toml(
            r#"
[filters.exclude]
extensions = ["part"]

[categories]
images = ["webp"]
"#,
        )
        .unwrap();

        let report = Sorter::from_config(&config)
            .unwrap()
            .sort(&root)
            .expect("Sort failed");

        assert_eq!(report.files_in(Category::Images), ["pic.webp"]);
        assert!(temp_dir.path().join("images/pic.webp").is_file());
        assert!(root.join("download.part").is_file());
    }

    #[test]
    fn test_report_serializes_flat() {
        let mut report = SortReport::default();
        report
            .categories
            .insert(Category::Images, vec!["a.png".to_string()]);
        report.archives.push("b.txt".to_string());
        report.unknown_file_extensions.insert("xyz".to_string());

        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["images"], serde_json::json!(["a.png"]));
        assert_eq!(json["archives"], serde_json::json!(["b.txt"]));
        assert_eq!(json["unknown_file_extensions"], serde_json::json!(["xyz"]));
        assert_eq!(json["known_file_extensions"], serde_json::json!([]));
    }
}
