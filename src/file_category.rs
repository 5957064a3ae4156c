/// Extension-based file categorization.
///
/// This module maps file extensions to the fixed set of destination
/// categories, and keeps the per-run record of which extensions were
/// recognized and which were not.
///
/// # Examples
///
/// ```
/// use clean_folder::file_category::{Category, ExtensionClassifier};
///
/// let classifier = ExtensionClassifier::default();
/// assert_eq!(classifier.classify("JPG"), Category::Images);
/// assert_eq!(classifier.classify("mp3"), Category::Audio);
/// assert_eq!(classifier.classify("xyz"), Category::Others);
/// ```
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::str::FromStr;

/// A destination category. Each one is a folder of the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Archive files (ZIP, TAR, GZ). These are unpacked, not moved.
    Archives,
    /// Audio files (MP3, WAV, OGG, AMR)
    Audio,
    /// Document files (PDF, DOCX, TXT, etc.)
    Documents,
    /// Image files (JPG, PNG, SVG, etc.)
    Images,
    /// Anything without a known extension
    Others,
    /// Video files (MP4, MKV, AVI, MOV)
    Video,
}

impl Category {
    /// Every category, in folder-name order.
    pub const ALL: [Category; 6] = [
        Category::Archives,
        Category::Audio,
        Category::Documents,
        Category::Images,
        Category::Others,
        Category::Video,
    ];

    /// Returns the directory name for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use clean_folder::file_category::Category;
    ///
    /// assert_eq!(Category::Images.dir_name(), "images");
    /// assert_eq!(Category::Others.dir_name(), "others");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Archives => "archives",
            Category::Audio => "audio",
            Category::Documents => "documents",
            Category::Images => "images",
            Category::Others => "others",
            Category::Video => "video",
        }
    }

    /// Returns a human-readable description of this category.
    pub fn description(&self) -> &'static str {
        match self {
            Category::Archives => "Unpacked archives",
            Category::Audio => "Audio files",
            Category::Documents => "Document files",
            Category::Images => "Image files",
            Category::Others => "Other files",
            Category::Video => "Video files",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.dir_name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown category '{}'", s))
    }
}

/// Maps file extensions to categories.
///
/// Lookups are case-insensitive. Classification is pure: recording the
/// extension is left to the caller (see [`ExtensionRegistry::record`]).
#[derive(Debug, Clone)]
pub struct ExtensionClassifier {
    extension_map: HashMap<String, Category>,
}

impl ExtensionClassifier {
    /// Creates a classifier with the standard extension table.
    pub fn new() -> Self {
        let mut classifier = Self {
            extension_map: HashMap::new(),
        };
        classifier.populate_standard_mappings();
        classifier
    }

    fn populate_standard_mappings(&mut self) {
        for ext in ["amr", "mp3", "ogg", "wav"] {
            self.add_extension_mapping(ext, Category::Audio);
        }
        for ext in ["avi", "mkv", "mov", "mp4"] {
            self.add_extension_mapping(ext, Category::Video);
        }
        for ext in ["doc", "docx", "pdf", "pptx", "txt", "xlsx"] {
            self.add_extension_mapping(ext, Category::Documents);
        }
        for ext in ["gz", "tar", "zip"] {
            self.add_extension_mapping(ext, Category::Archives);
        }
        for ext in ["jpeg", "jpg", "png", "svg"] {
            self.add_extension_mapping(ext, Category::Images);
        }
    }

    /// Adds (or replaces) a file extension to category mapping.
    pub fn add_extension_mapping(&mut self, ext: &str, category: Category) {
        self.extension_map.insert(ext.to_lowercase(), category);
    }

    /// Maps an extension to a category, falling back to [`Category::Others`].
    ///
    /// # Examples
    ///
    /// ```
    /// use clean_folder::file_category::{Category, ExtensionClassifier};
    ///
    /// let classifier = ExtensionClassifier::default();
    /// assert_eq!(classifier.classify("pdf"), Category::Documents);
    /// assert_eq!(classifier.classify(""), Category::Others);
    /// ```
    pub fn classify(&self, ext: &str) -> Category {
        self.extension_map
            .get(&ext.to_lowercase())
            .copied()
            .unwrap_or(Category::Others)
    }
}

impl Default for ExtensionClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Known and unknown extensions seen during one sort run.
///
/// A fresh registry is created for every run and moved into the report
/// when the run finishes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionRegistry {
    known: BTreeSet<String>,
    unknown: BTreeSet<String>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an extension under the set matching its category.
    ///
    /// Extensions are stored as found. A missing extension is not recorded.
    pub fn record(&mut self, ext: &str, category: Category) {
        if ext.is_empty() {
            return;
        }
        let set = if category == Category::Others {
            &mut self.unknown
        } else {
            &mut self.known
        };
        set.insert(ext.to_string());
    }

    pub fn known(&self) -> &BTreeSet<String> {
        &self.known
    }

    pub fn unknown(&self) -> &BTreeSet<String> {
        &self.unknown
    }

    /// Consumes the registry, returning `(known, unknown)`.
    pub fn into_sets(self) -> (BTreeSet<String>, BTreeSet<String>) {
        (self.known, self.unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_dir_names() {
        assert_eq!(Category::Archives.dir_name(), "archives");
        assert_eq!(Category::Audio.dir_name(), "audio");
        assert_eq!(Category::Documents.dir_name(), "documents");
        assert_eq!(Category::Images.dir_name(), "images");
        assert_eq!(Category::Others.dir_name(), "others");
        assert_eq!(Category::Video.dir_name(), "video");
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("images".parse::<Category>(), Ok(Category::Images));
        assert_eq!("VIDEO".parse::<Category>(), Ok(Category::Video));
        assert!("fonts".parse::<Category>().is_err());
    }

    #[test]
    fn test_classify_standard_table() {
        let classifier = ExtensionClassifier::default();
        assert_eq!(classifier.classify("amr"), Category::Audio);
        assert_eq!(classifier.classify("mkv"), Category::Video);
        assert_eq!(classifier.classify("pptx"), Category::Documents);
        assert_eq!(classifier.classify("gz"), Category::Archives);
        assert_eq!(classifier.classify("svg"), Category::Images);
    }

    #[test]
    fn test_classify_case_insensitive() {
        let classifier = ExtensionClassifier::default();
        for ext in ["jpg", "jpeg", "mp4", "wav", "docx", "zip", "tar"] {
            assert_eq!(
                classifier.classify(ext),
                classifier.classify(&ext.to_uppercase())
            );
        }
        assert_eq!(classifier.classify("Mp3"), Category::Audio);
    }

    #[test]
    fn test_classify_defaults_to_others() {
        let classifier = ExtensionClassifier::default();
        assert_eq!(classifier.classify(""), Category::Others);
        assert_eq!(classifier.classify("xyz"), Category::Others);
        assert_eq!(classifier.classify("rs"), Category::Others);
    }

    #[test]
    fn test_custom_mapping() {
        let mut classifier = ExtensionClassifier::default();
        classifier.add_extension_mapping("WEBP", Category::Images);
        classifier.add_extension_mapping("txt", Category::Others);

        assert_eq!(classifier.classify("webp"), Category::Images);
        assert_eq!(classifier.classify("TXT"), Category::Others);
    }

    #[test]
    fn test_registry_splits_known_and_unknown() {
        let mut registry = ExtensionRegistry::new();
        registry.record("JPG", Category::Images);
        registry.record("xyz", Category::Others);
        registry.record("xyz", Category::Others);

        assert!(registry.known().contains("JPG"));
        assert_eq!(registry.unknown().len(), 1);
        assert!(registry.unknown().contains("xyz"));
    }

    #[test]
    fn test_registry_ignores_missing_extension() {
        let mut registry = ExtensionRegistry::new();
        registry.record("", Category::Others);
        assert!(registry.unknown().is_empty());
        assert!(registry.known().is_empty());
    }
}
