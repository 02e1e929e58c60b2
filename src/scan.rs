//! Image discovery.
//!
//! Collects the JPEG and PNG files in a folder, either from the folder itself
//! or from the whole tree below it:
//!
//! ```text
//! photos/
//! ├── stamp.toml          # ignored
//! ├── portrait.PNG        # found (extension match is case-insensitive)
//! ├── 2024/
//! │   └── beach.jpg       # found only when recursive
//! └── notes.txt           # ignored
//! ```
//!
//! ## Validation
//!
//! Every stamped image lands in a single flat output directory, so two inputs
//! with the same file name in different subfolders would overwrite each
//! other. The scanner rejects that up front with [`ScanError::DuplicateFilename`].

use crate::imaging::supported_input_extensions;
use crate::naming::has_extension;
use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Image folder not found: {0}")]
    FolderNotFound(PathBuf),
    #[error(
        "Duplicate filename detected: {name}\n  - {}\n  - {}\nAn output directory from a previous run could be the cause. Either delete it or disable recursive image search.",
        .first.display(),
        .second.display()
    )]
    DuplicateFilename {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },
}

/// Find all stampable images in `folder`, sorted by path.
///
/// With `recursive`, every subfolder is searched too and file names must be
/// unique across the whole tree.
pub fn scan(folder: &Path, recursive: bool) -> Result<Vec<PathBuf>, ScanError> {
    let images = collect_sorted(folder, recursive)?;
    check_unique_names(&images)?;
    Ok(images)
}

/// The image a preview should be rendered from: the first one in sort order.
///
/// Nothing is written for a preview, so duplicate file names (such as the
/// copies in a previous run's `output/`) are not an error here.
pub fn first_image(folder: &Path, recursive: bool) -> Result<Option<PathBuf>, ScanError> {
    Ok(collect_sorted(folder, recursive)?.into_iter().next())
}

fn collect_sorted(folder: &Path, recursive: bool) -> Result<Vec<PathBuf>, ScanError> {
    if !folder.is_dir() {
        return Err(ScanError::FolderNotFound(folder.to_path_buf()));
    }

    let mut images = if recursive {
        collect_recursive(folder)?
    } else {
        collect_direct(folder)?
    };
    images.sort();
    Ok(images)
}

fn collect_direct(folder: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut images = Vec::new();
    for entry in fs::read_dir(folder)? {
        let path = entry?.path();
        if path.is_file() && is_image(&path) {
            images.push(path);
        }
    }
    Ok(images)
}

fn collect_recursive(folder: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut images = Vec::new();
    for entry in WalkDir::new(folder).min_depth(1) {
        let entry = entry?;
        // Symlinked files count, like in `collect_direct`; linked dirs are not entered.
        if entry.path().is_file() && is_image(entry.path()) {
            images.push(entry.into_path());
        }
    }
    Ok(images)
}

fn is_image(path: &Path) -> bool {
    has_extension(path, supported_input_extensions())
}

fn check_unique_names(images: &[PathBuf]) -> Result<(), ScanError> {
    let mut seen: HashMap<OsString, &PathBuf> = HashMap::new();
    for path in images {
        let Some(name) = path.file_name() else {
            continue;
        };
        if let Some(first) = seen.insert(name.to_os_string(), path) {
            return Err(ScanError::DuplicateFilename {
                name: name.to_string_lossy().into_owned(),
                first: first.clone(),
                second: path.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // Scan only checks extensions, so placeholder bytes are enough.
    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "fake image").unwrap();
    }

    fn names(images: &[PathBuf]) -> Vec<String> {
        images
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn finds_supported_extensions_only() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("a.jpg"));
        touch(&tmp.path().join("b.JPEG"));
        touch(&tmp.path().join("c.png"));
        touch(&tmp.path().join("d.gif"));
        touch(&tmp.path().join("notes.txt"));
        touch(&tmp.path().join("stamp.toml"));

        let images = scan(tmp.path(), true).unwrap();
        assert_eq!(names(&images), vec!["a.jpg", "b.JPEG", "c.png"]);
    }

    #[test]
    fn recursive_descends_into_subfolders() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("top.jpg"));
        touch(&tmp.path().join("2024/summer/beach.jpg"));

        let images = scan(tmp.path(), true).unwrap();
        assert_eq!(images.len(), 2);
        assert!(images.contains(&tmp.path().join("2024/summer/beach.jpg")));
    }

    #[test]
    fn non_recursive_ignores_subfolders() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("top.jpg"));
        touch(&tmp.path().join("2024/beach.jpg"));

        let images = scan(tmp.path(), false).unwrap();
        assert_eq!(names(&images), vec!["top.jpg"]);
    }

    #[test]
    fn results_sorted_by_path() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("c.jpg"));
        touch(&tmp.path().join("a.jpg"));
        touch(&tmp.path().join("b/z.png"));

        let images = scan(tmp.path(), true).unwrap();
        let mut sorted = images.clone();
        sorted.sort();
        assert_eq!(images, sorted);
    }

    #[test]
    fn directory_with_image_extension_is_skipped() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("album.jpg")).unwrap();
        touch(&tmp.path().join("real.jpg"));

        let images = scan(tmp.path(), false).unwrap();
        assert_eq!(names(&images), vec!["real.jpg"]);
    }

    #[test]
    fn duplicate_filename_is_error() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("beach.jpg"));
        touch(&tmp.path().join("output/beach.jpg"));

        let result = scan(tmp.path(), true);
        match result {
            Err(ScanError::DuplicateFilename {
                name,
                first,
                second,
            }) => {
                assert_eq!(name, "beach.jpg");
                assert_ne!(first, second);
            }
            other => panic!("expected DuplicateFilename, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_filename_message_has_hint() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("a/x.png"));
        touch(&tmp.path().join("b/x.png"));

        let err = scan(tmp.path(), true).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Duplicate filename detected: x.png"));
        assert!(message.contains("previous run"));
        assert!(message.contains("disable recursive image search"));
    }

    #[test]
    fn duplicates_in_subfolders_ignored_when_not_recursive() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("beach.jpg"));
        touch(&tmp.path().join("output/beach.jpg"));

        let images = scan(tmp.path(), false).unwrap();
        assert_eq!(images.len(), 1);
    }

    #[test]
    fn names_differing_in_case_are_distinct() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("a/beach.jpg"));
        touch(&tmp.path().join("b/beach.JPG"));

        assert_eq!(scan(tmp.path(), true).unwrap().len(), 2);
    }

    #[test]
    fn missing_folder_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = scan(&tmp.path().join("missing"), true);
        assert!(matches!(result, Err(ScanError::FolderNotFound(_))));
    }

    #[test]
    fn empty_folder_yields_nothing() {
        let tmp = TempDir::new().unwrap();
        assert!(scan(tmp.path(), true).unwrap().is_empty());
        assert!(first_image(tmp.path(), true).unwrap().is_none());
    }

    #[test]
    fn first_image_ignores_duplicate_names() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("beach.jpg"));
        touch(&tmp.path().join("output/beach.jpg"));

        assert!(scan(tmp.path(), true).is_err());
        let first = first_image(tmp.path(), true).unwrap();
        assert_eq!(first, Some(tmp.path().join("beach.jpg")));
    }

    #[test]
    fn first_image_missing_folder_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = first_image(&tmp.path().join("missing"), false);
        assert!(matches!(result, Err(ScanError::FolderNotFound(_))));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_file_found_in_both_modes() {
        let tmp = TempDir::new().unwrap();
        let elsewhere = tmp.path().join("elsewhere/real.jpg");
        touch(&elsewhere);
        let folder = tmp.path().join("photos");
        fs::create_dir_all(&folder).unwrap();
        std::os::unix::fs::symlink(&elsewhere, folder.join("linked.jpg")).unwrap();

        assert_eq!(names(&scan(&folder, false).unwrap()), vec!["linked.jpg"]);
        assert_eq!(names(&scan(&folder, true).unwrap()), vec!["linked.jpg"]);
    }

    #[test]
    fn first_image_is_first_in_sort_order() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("b.jpg"));
        touch(&tmp.path().join("a.png"));

        let first = first_image(tmp.path(), true).unwrap();
        assert_eq!(first, Some(tmp.path().join("a.png")));
    }
}
