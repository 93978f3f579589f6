//! The categorize-and-move engine.
//!
//! `ensure_category_folders` prepares one subdirectory per category
//! (plus `Misc`) under a base directory; `sort_entries` relocates every
//! sortable direct child into its category folder, resolving
//! destination name collisions through `resolve_conflict`. Moves are
//! independent: a failure aborts the run with completed moves left in
//! place, and re-running continues with whatever is still unsorted.

use crate::category::{CategoryMap, MISC_DIR};
use crate::config::CompiledFilters;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Record of one performed move.
#[derive(Debug, Clone)]
pub struct Operation {
    /// Where the file was before sorting.
    pub original_path: PathBuf,
    /// Where the file ended up, after any conflict renaming.
    pub new_path: PathBuf,
    /// The folder name the file was filed under.
    pub category: String,
}

/// What one `sort_entries` run did to a directory.
#[derive(Debug, Default)]
pub struct SortReport {
    /// Moves performed, in processing order.
    pub operations: Vec<Operation>,
    /// Entries left in place because a filter rule excluded them.
    pub skipped: usize,
}

impl SortReport {
    /// Number of moved files per destination folder.
    pub fn category_counts(&self) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for operation in &self.operations {
            *counts.entry(operation.category.clone()).or_insert(0) += 1;
        }
        counts
    }
}

/// Progress notifications emitted while sorting, so callers can drive
/// a progress display without the engine knowing about presentation.
#[derive(Debug)]
pub enum SortEvent<'a> {
    /// Listing finished; `total` files are about to be moved.
    Begin {
        total: usize,
    },
    /// One entry was relocated.
    Moved {
        operation: &'a Operation,
    },
}

/// A classification computed without touching the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMove {
    /// Name of the file that would move.
    pub file_name: String,
    /// The folder it would be filed under.
    pub category: String,
}

/// Errors that can occur during file organization operations.
#[derive(Debug)]
pub enum OrganizeError {
    /// Failed to create a category directory.
    DirectoryCreationFailed {
        path: PathBuf,
        source: io::Error,
    },
    /// Failed to list the base directory.
    DirectoryReadFailed {
        path: PathBuf,
        source: io::Error,
    },
    /// Failed to move a file to its category directory.
    FileMoveFailure {
        source: PathBuf,
        destination: PathBuf,
        source_error: io::Error,
    },
    /// The base directory path is invalid or doesn't exist.
    InvalidBasePath {
        path: PathBuf,
        source: io::Error,
    },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::DirectoryReadFailed { path, source } => {
                write!(f, "Failed to read directory {}: {}", path.display(), source)
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
            Self::InvalidBasePath { path, source } => {
                write!(f, "Invalid base path {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for OrganizeError {}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Creates one subdirectory per category label, plus `Misc`, directly
/// under `base_path`.
///
/// Idempotent: folders that already exist are left alone, so re-running
/// on a prepared directory is not an error. Any other creation failure
/// propagates.
///
/// # Examples
///
/// ```no_run
/// use desksweep::category::CategoryMap;
/// use desksweep::organizer::ensure_category_folders;
/// use std::path::Path;
///
/// let map = CategoryMap::builtin();
/// ensure_category_folders(Path::new("/home/user/Downloads"), &map)?;
/// # Ok::<(), desksweep::organizer::OrganizeError>(())
/// ```
pub fn ensure_category_folders(base_path: &Path, map: &CategoryMap) -> OrganizeResult<()> {
    if !base_path.exists() {
        return Err(OrganizeError::InvalidBasePath {
            path: base_path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::NotFound, "base path does not exist"),
        });
    }

    for label in map.labels().chain(std::iter::once(MISC_DIR)) {
        let folder = base_path.join(label);
        if !folder.exists() {
            fs::create_dir(&folder).map_err(|e| OrganizeError::DirectoryCreationFailed {
                path: folder.clone(),
                source: e,
            })?;
        }
    }

    Ok(())
}

/// Moves every sortable direct child of `base_path` into its category
/// folder (or `Misc`), resolving destination collisions as it goes.
///
/// Subdirectories are skipped entirely, which is how category folders
/// avoid being reclassified. Entries excluded by `filters` stay put and
/// are counted in the report. Category folders must already exist
/// (run [`ensure_category_folders`] first).
///
/// The `observer` receives a [`SortEvent::Begin`] once the listing is
/// known and a [`SortEvent::Moved`] after each relocation. Each
/// destination is checked immediately before its own move, so the
/// uniqueness guarantee holds regardless of listing order.
///
/// A move failure propagates immediately; files moved before the
/// failure remain in their new locations.
pub fn sort_entries(
    base_path: &Path,
    map: &CategoryMap,
    filters: &CompiledFilters,
    mut observer: impl FnMut(SortEvent),
) -> OrganizeResult<SortReport> {
    let (files, skipped) = list_sortable(base_path, filters)?;

    observer(SortEvent::Begin { total: files.len() });

    let mut operations = Vec::with_capacity(files.len());
    for path in files {
        let folder_name = map.classify(&path);
        let operation = move_entry(base_path, &path, folder_name)?;
        observer(SortEvent::Moved {
            operation: &operation,
        });
        operations.push(operation);
    }

    Ok(SortReport {
        operations,
        skipped,
    })
}

/// Computes what [`sort_entries`] would do, without moving anything.
///
/// Conflict renaming is not simulated; the plan reports original names
/// and destination folders only.
pub fn plan_entries(
    base_path: &Path,
    map: &CategoryMap,
    filters: &CompiledFilters,
) -> OrganizeResult<Vec<PlannedMove>> {
    let (files, _skipped) = list_sortable(base_path, filters)?;

    Ok(files
        .iter()
        .map(|path| PlannedMove {
            file_name: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            category: map.classify(path).to_string(),
        })
        .collect())
}

/// Lists the direct children of `base_path` that are subject to
/// sorting: directories are skipped entirely, filtered-out entries are
/// counted. Listing order is whatever the filesystem yields.
fn list_sortable(
    base_path: &Path,
    filters: &CompiledFilters,
) -> OrganizeResult<(Vec<PathBuf>, usize)> {
    let read_error = |e: io::Error| OrganizeError::DirectoryReadFailed {
        path: base_path.to_path_buf(),
        source: e,
    };

    let entries = fs::read_dir(base_path).map_err(read_error)?;

    let mut files = Vec::new();
    let mut skipped = 0;
    for entry in entries {
        let entry = entry.map_err(read_error)?;
        let file_type = entry.file_type().map_err(read_error)?;
        if file_type.is_dir() {
            continue;
        }
        let path = entry.path();
        if !filters.should_include(&path) {
            skipped += 1;
            continue;
        }
        files.push(path);
    }

    Ok((files, skipped))
}

/// Relocates a single file into `base_path/<folder_name>`, renaming it
/// through [`resolve_conflict`] if the destination is taken.
///
/// The destination folder is expected to exist already; a missing
/// folder surfaces as a move failure.
pub fn move_entry(
    base_path: &Path,
    file_path: &Path,
    folder_name: &str,
) -> OrganizeResult<Operation> {
    let folder = base_path.join(folder_name);

    let file_name = file_path
        .file_name()
        .ok_or_else(|| OrganizeError::FileMoveFailure {
            source: file_path.to_path_buf(),
            destination: folder.clone(),
            source_error: io::Error::new(io::ErrorKind::InvalidInput, "file has no name component"),
        })?;

    let mut destination = folder.join(file_name);
    if destination.exists() {
        destination = resolve_conflict(&folder, &file_name.to_string_lossy());
    }

    fs::rename(file_path, &destination).map_err(|e| OrganizeError::FileMoveFailure {
        source: file_path.to_path_buf(),
        destination: destination.clone(),
        source_error: e,
    })?;

    Ok(Operation {
        original_path: file_path.to_path_buf(),
        new_path: destination,
        category: folder_name.to_string(),
    })
}

/// Picks a destination name that is free in `folder` by appending a
/// counter to the stem of `filename`: `"report.pdf"` becomes
/// `"report (1).pdf"`, then `"report (2).pdf"`, and so on.
///
/// The counter is unbounded. The returned path is only guaranteed free
/// at the instant of the check; this tool assumes it is the sole actor
/// on the directory.
pub fn resolve_conflict(folder: &Path, filename: &str) -> PathBuf {
    let (stem, extension) = split_stem(filename);

    let mut counter: u64 = 1;
    loop {
        let candidate = folder.join(format!("{} ({}){}", stem, counter, extension));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Splits a file name on its final dot. The extension part keeps its
/// leading dot and original case; dotfiles and extensionless names get
/// an empty extension part.
fn split_stem(filename: &str) -> (String, String) {
    let path = Path::new(filename);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string());
    let extension = path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    (stem, extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn builtin_map() -> CategoryMap {
        CategoryMap::builtin()
    }

    #[test]
    fn test_ensure_category_folders_creates_all() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();

        ensure_category_folders(base_path, &builtin_map()).expect("Failed to prepare folders");

        for label in ["Images", "Videos", "Audio", "Documents", "Archives", "Code", "Misc"] {
            let folder = base_path.join(label);
            assert!(folder.is_dir(), "missing folder: {}", label);
        }
    }

    #[test]
    fn test_ensure_category_folders_is_idempotent() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();

        ensure_category_folders(base_path, &builtin_map()).expect("First run failed");
        ensure_category_folders(base_path, &builtin_map()).expect("Second run should not error");
    }

    #[test]
    fn test_ensure_category_folders_invalid_base_path() {
        let result = ensure_category_folders(Path::new("/non/existent/path"), &builtin_map());
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_conflict_starts_at_one() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let folder = temp_dir.path();

        fs::write(folder.join("report.pdf"), "taken").expect("Failed to write file");

        let resolved = resolve_conflict(folder, "report.pdf");
        assert_eq!(resolved, folder.join("report (1).pdf"));
    }

    #[test]
    fn test_resolve_conflict_counts_past_taken_names() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let folder = temp_dir.path();

        fs::write(folder.join("report.pdf"), "a").expect("Failed to write file");
        fs::write(folder.join("report (1).pdf"), "b").expect("Failed to write file");
        fs::write(folder.join("report (2).pdf"), "c").expect("Failed to write file");

        let resolved = resolve_conflict(folder, "report.pdf");
        assert_eq!(resolved, folder.join("report (3).pdf"));
    }

    #[test]
    fn test_resolve_conflict_splits_on_final_dot() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let folder = temp_dir.path();

        let resolved = resolve_conflict(folder, "archive.tar.gz");
        assert_eq!(resolved, folder.join("archive.tar (1).gz"));
    }

    #[test]
    fn test_resolve_conflict_extensionless_name() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let folder = temp_dir.path();

        let resolved = resolve_conflict(folder, "script");
        assert_eq!(resolved, folder.join("script (1)"));
    }

    #[test]
    fn test_move_entry_files_under_folder() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        fs::create_dir(base_path.join("Documents")).expect("Failed to create folder");

        let file_path = base_path.join("notes.txt");
        fs::write(&file_path, "contents").expect("Failed to write file");

        let operation =
            move_entry(base_path, &file_path, "Documents").expect("Failed to move file");

        assert!(!file_path.exists());
        assert_eq!(operation.new_path, base_path.join("Documents").join("notes.txt"));
        assert!(operation.new_path.exists());
        assert_eq!(operation.category, "Documents");
    }

    #[test]
    fn test_move_entry_renames_on_collision() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let folder = base_path.join("Images");
        fs::create_dir(&folder).expect("Failed to create folder");
        fs::write(folder.join("a.png"), "first").expect("Failed to write file");

        let file_path = base_path.join("a.png");
        fs::write(&file_path, "second").expect("Failed to write file");

        let operation = move_entry(base_path, &file_path, "Images").expect("Failed to move file");

        assert_eq!(operation.new_path, folder.join("a (1).png"));
        assert_eq!(
            fs::read_to_string(folder.join("a.png")).unwrap(),
            "first",
            "the original file must never be overwritten"
        );
        assert_eq!(fs::read_to_string(folder.join("a (1).png")).unwrap(), "second");
    }

    #[test]
    fn test_sort_entries_dispatches_by_extension() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let map = builtin_map();
        ensure_category_folders(base_path, &map).expect("Failed to prepare folders");

        fs::write(base_path.join("photo.JPG"), "img").expect("write failed");
        fs::write(base_path.join("notes.txt"), "txt").expect("write failed");
        fs::write(base_path.join("script"), "sh").expect("write failed");

        let report = sort_entries(base_path, &map, &CompiledFilters::default(), |_| {})
            .expect("Sorting failed");

        assert_eq!(report.operations.len(), 3);
        assert_eq!(report.skipped, 0);
        assert!(base_path.join("Images").join("photo.JPG").exists());
        assert!(base_path.join("Documents").join("notes.txt").exists());
        assert!(base_path.join("Misc").join("script").exists());
    }

    #[test]
    fn test_sort_entries_leaves_directories_alone() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let map = builtin_map();
        ensure_category_folders(base_path, &map).expect("Failed to prepare folders");

        let project_dir = base_path.join("project.js");
        fs::create_dir(&project_dir).expect("Failed to create subdir");
        fs::write(project_dir.join("inner.txt"), "stay").expect("write failed");

        let report = sort_entries(base_path, &map, &CompiledFilters::default(), |_| {})
            .expect("Sorting failed");

        // Despite its .js-looking name, the directory stays put
        assert!(report.operations.is_empty());
        assert!(project_dir.is_dir());
        assert!(project_dir.join("inner.txt").exists());
    }

    #[test]
    fn test_sort_entries_emits_events_in_order() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let map = builtin_map();
        ensure_category_folders(base_path, &map).expect("Failed to prepare folders");

        fs::write(base_path.join("one.txt"), "1").expect("write failed");
        fs::write(base_path.join("two.txt"), "2").expect("write failed");

        let mut begin_total = None;
        let mut moved = 0;
        sort_entries(base_path, &map, &CompiledFilters::default(), |event| {
            match event {
                SortEvent::Begin { total } => begin_total = Some(total),
                SortEvent::Moved { .. } => moved += 1,
            }
        })
        .expect("Sorting failed");

        assert_eq!(begin_total, Some(2));
        assert_eq!(moved, 2);
    }

    #[test]
    fn test_sort_entries_counts_filtered_files() {
        use crate::config::{ExcludeRules, FilterRules};

        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let map = builtin_map();
        ensure_category_folders(base_path, &map).expect("Failed to prepare folders");

        fs::write(base_path.join("keep.tmp"), "partial").expect("write failed");
        fs::write(base_path.join("notes.txt"), "txt").expect("write failed");

        let filters = FilterRules {
            exclude: ExcludeRules {
                extensions: vec!["tmp".to_string()],
                ..Default::default()
            },
            ..Default::default()
        }
        .compile()
        .expect("Filters should compile");

        let report = sort_entries(base_path, &map, &filters, |_| {}).expect("Sorting failed");

        assert_eq!(report.operations.len(), 1);
        assert_eq!(report.skipped, 1);
        assert!(base_path.join("keep.tmp").exists());
    }

    #[test]
    fn test_plan_entries_moves_nothing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let map = builtin_map();

        fs::write(base_path.join("photo.png"), "img").expect("write failed");
        fs::write(base_path.join("mystery.xyz"), "?").expect("write failed");

        let mut planned = plan_entries(base_path, &map, &CompiledFilters::default())
            .expect("Planning failed");
        planned.sort_by(|a, b| a.file_name.cmp(&b.file_name));

        assert_eq!(planned.len(), 2);
        assert_eq!(planned[0].file_name, "mystery.xyz");
        assert_eq!(planned[0].category, "Misc");
        assert_eq!(planned[1].file_name, "photo.png");
        assert_eq!(planned[1].category, "Images");

        assert!(base_path.join("photo.png").exists());
        assert!(base_path.join("mystery.xyz").exists());
    }

    #[test]
    fn test_category_counts_aggregates_by_folder() {
        let report = SortReport {
            operations: vec![
                Operation {
                    original_path: PathBuf::from("/t/a.png"),
                    new_path: PathBuf::from("/t/Images/a.png"),
                    category: "Images".to_string(),
                },
                Operation {
                    original_path: PathBuf::from("/t/b.png"),
                    new_path: PathBuf::from("/t/Images/b.png"),
                    category: "Images".to_string(),
                },
                Operation {
                    original_path: PathBuf::from("/t/c"),
                    new_path: PathBuf::from("/t/Misc/c"),
                    category: "Misc".to_string(),
                },
            ],
            skipped: 0,
        };

        let counts = report.category_counts();
        assert_eq!(counts.get("Images"), Some(&2));
        assert_eq!(counts.get("Misc"), Some(&1));
    }
}
