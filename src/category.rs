//! Category table mapping file extensions to destination folder names.
//!
//! The table is an explicitly ordered list of (label, extension-set)
//! pairs rather than a hash map: lookup scans in declared order and the
//! first category whose set contains the extension wins, so precedence
//! between categories is deterministic.
//!
//! # Examples
//!
//! ```
//! use desksweep::category::{CategoryMap, MISC_DIR};
//! use std::path::Path;
//!
//! let map = CategoryMap::builtin();
//! assert_eq!(map.category_for(".png"), Some("Images"));
//! assert_eq!(map.classify(Path::new("report.PDF")), "Documents");
//! assert_eq!(map.classify(Path::new("mystery.xyz")), MISC_DIR);
//! ```

use std::path::Path;

/// Folder name for entries that match no category.
pub const MISC_DIR: &str = "Misc";

/// A named bucket of file extensions sharing a destination subfolder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    label: String,
    extensions: Vec<String>,
}

impl Category {
    /// Creates a category, normalizing each extension to lowercase with
    /// a leading dot.
    pub fn new(
        label: impl Into<String>,
        extensions: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Self {
        Self {
            label: label.into(),
            extensions: extensions
                .into_iter()
                .map(|ext| normalize_extension(ext.as_ref()))
                .collect(),
        }
    }

    /// The destination folder name for this category.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The normalized extensions this category recognizes.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    fn contains(&self, extension: &str) -> bool {
        self.extensions.iter().any(|ext| ext == extension)
    }
}

/// Normalizes an extension string to lowercase with a leading dot.
fn normalize_extension(ext: &str) -> String {
    let lower = ext.to_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{}", lower)
    }
}

/// Ordered mapping from category label to a set of recognized
/// extensions. First match wins; extensions listed in more than one
/// category resolve to whichever category is declared first.
#[derive(Debug, Clone)]
pub struct CategoryMap {
    categories: Vec<Category>,
}

impl CategoryMap {
    /// Creates a map from an ordered list of categories.
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// The built-in category table.
    pub fn builtin() -> Self {
        Self::new(vec![
            Category::new("Images", [".jpg", ".jpeg", ".png", ".gif", ".svg", ".webp"]),
            Category::new("Videos", [".mp4", ".mov", ".avi", ".mkv"]),
            Category::new("Audio", [".mp3", ".wav", ".aac", ".m4a"]),
            Category::new(
                "Documents",
                [".pdf", ".docx", ".doc", ".txt", ".pptx", ".xlsx", ".csv"],
            ),
            Category::new("Archives", [".zip", ".rar", ".7z", ".tar", ".gz"]),
            Category::new(
                "Code",
                [".py", ".js", ".ts", ".html", ".css", ".cpp", ".c", ".java", ".ipynb"],
            ),
        ])
    }

    /// Category labels in precedence order. Drives both folder creation
    /// and lookup precedence; `Misc` is not included.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|category| category.label())
    }

    /// The label of the first category whose extension set contains
    /// `extension`, which must already be lowercase with a leading dot.
    pub fn category_for(&self, extension: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|category| category.contains(extension))
            .map(|category| category.label())
    }

    /// Destination folder name for `path`: the matching category label,
    /// or `Misc` when no category recognizes its extension.
    pub fn classify(&self, path: &Path) -> &str {
        self.category_for(&extension_of(path)).unwrap_or(MISC_DIR)
    }
}

impl Default for CategoryMap {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Lowercased extension of `path` including the leading dot, or an
/// empty string when the name has none. Only the final dot-delimited
/// segment counts, so `archive.tar.gz` yields `.gz`.
///
/// # Examples
///
/// ```
/// use desksweep::category::extension_of;
/// use std::path::Path;
///
/// assert_eq!(extension_of(Path::new("photo.JPG")), ".jpg");
/// assert_eq!(extension_of(Path::new("archive.tar.gz")), ".gz");
/// assert_eq!(extension_of(Path::new("script")), "");
/// ```
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookups() {
        let map = CategoryMap::builtin();
        assert_eq!(map.category_for(".png"), Some("Images"));
        assert_eq!(map.category_for(".mkv"), Some("Videos"));
        assert_eq!(map.category_for(".m4a"), Some("Audio"));
        assert_eq!(map.category_for(".csv"), Some("Documents"));
        assert_eq!(map.category_for(".7z"), Some("Archives"));
        assert_eq!(map.category_for(".ipynb"), Some("Code"));
    }

    #[test]
    fn test_unknown_extension_has_no_category() {
        let map = CategoryMap::builtin();
        assert_eq!(map.category_for(".xyz"), None);
        assert_eq!(map.category_for(""), None);
    }

    #[test]
    fn test_labels_in_declared_order() {
        let map = CategoryMap::builtin();
        let labels: Vec<&str> = map.labels().collect();
        assert_eq!(
            labels,
            vec!["Images", "Videos", "Audio", "Documents", "Archives", "Code"]
        );
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        let map = CategoryMap::builtin();
        assert_eq!(map.classify(Path::new("photo.JPG")), "Images");
        assert_eq!(map.classify(Path::new("Notes.Txt")), "Documents");
    }

    #[test]
    fn test_classify_falls_back_to_misc() {
        let map = CategoryMap::builtin();
        assert_eq!(map.classify(Path::new("data.xyz")), MISC_DIR);
        assert_eq!(map.classify(Path::new("script")), MISC_DIR);
        assert_eq!(map.classify(Path::new(".bashrc")), MISC_DIR);
    }

    #[test]
    fn test_classify_matches_final_suffix_only() {
        let map = CategoryMap::builtin();
        // .tar.gz matches through its registered .gz suffix
        assert_eq!(map.classify(Path::new("archive.tar.gz")), "Archives");
    }

    #[test]
    fn test_first_match_wins_for_duplicate_extensions() {
        let map = CategoryMap::new(vec![
            Category::new("First", [".dat"]),
            Category::new("Second", [".dat", ".bin"]),
        ]);
        assert_eq!(map.category_for(".dat"), Some("First"));
        assert_eq!(map.category_for(".bin"), Some("Second"));
    }

    #[test]
    fn test_category_normalizes_extensions() {
        let category = Category::new("Notes", ["TXT", ".Md"]);
        assert_eq!(category.extensions(), &[".txt".to_string(), ".md".to_string()]);

        let map = CategoryMap::new(vec![category]);
        assert_eq!(map.classify(Path::new("todo.txt")), "Notes");
        assert_eq!(map.classify(Path::new("readme.MD")), "Notes");
    }

    #[test]
    fn test_extension_of_edge_cases() {
        assert_eq!(extension_of(Path::new("a.PNG")), ".png");
        assert_eq!(extension_of(Path::new("archive.tar.gz")), ".gz");
        assert_eq!(extension_of(Path::new("script")), "");
        assert_eq!(extension_of(Path::new(".hidden")), "");
    }
}
