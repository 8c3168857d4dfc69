//! Paired file discovery for prediction/ground-truth directories.
//!
//! The evaluator takes two ordered path lists; this module builds them
//! from a pair of directories. Files are matched positionally after
//! sorting by file name, which is how depth export pipelines lay out
//! their output (same frame order in both directories, different
//! extensions and suffixes).

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Raster extensions recognized during discovery.
const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tif", "tiff"];

/// List raster files in a pair of directories, sorted by file name.
///
/// Returns `(predictions, ground_truths)`. The lists are not required to
/// have equal length here; a mismatch surfaces as
/// [`Error::LengthMismatch`](crate::Error::LengthMismatch) when the
/// evaluator validates them.
pub fn paired_files(
    prediction_dir: &Path,
    ground_truth_dir: &Path,
) -> Result<(Vec<PathBuf>, Vec<PathBuf>)> {
    Ok((list_images(prediction_dir)?, list_images(ground_truth_dir)?))
}

/// List raster files in one directory, sorted by file name.
///
/// Subdirectories and files with unrecognized extensions are ignored.
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Err(Error::Dataset(format!(
            "Path does not exist: {}",
            dir.display()
        )));
    }
    if !dir.is_dir() {
        return Err(Error::Dataset(format!(
            "Path is not a directory: {}",
            dir.display()
        )));
    }

    let entries = fs::read_dir(dir)
        .map_err(|e| Error::Dataset(format!("Failed to read directory {}: {}", dir.display(), e)))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| {
            Error::Dataset(format!("Failed to read entry in {}: {}", dir.display(), e))
        })?;
        let path = entry.path();

        if path.is_file() && has_supported_extension(&path) {
            files.push(path);
        }
    }

    files.sort_by_key(|p| p.file_name().map(|s| s.to_os_string()));
    Ok(files)
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map_or(false, |ext| {
            let ext = ext.to_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_images_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.png", "a.png", "c.TIF", "notes.txt", "d.csv"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        let files = list_images(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.png", "b.png", "c.TIF"]);
    }

    #[test]
    fn test_paired_files() {
        let pred = tempfile::tempdir().unwrap();
        let gt = tempfile::tempdir().unwrap();
        std::fs::write(pred.path().join("frame1.png"), b"x").unwrap();
        std::fs::write(pred.path().join("frame2.png"), b"x").unwrap();
        std::fs::write(gt.path().join("frame1.tif"), b"x").unwrap();
        std::fs::write(gt.path().join("frame2.tif"), b"x").unwrap();

        let (predictions, ground_truths) = paired_files(pred.path(), gt.path()).unwrap();
        assert_eq!(predictions.len(), 2);
        assert_eq!(ground_truths.len(), 2);
        assert!(predictions[0].ends_with("frame1.png"));
        assert!(ground_truths[0].ends_with("frame1.tif"));
    }

    #[test]
    fn test_missing_directory_rejected() {
        let result = list_images(Path::new("/nonexistent/dataset"));
        assert!(matches!(result, Err(Error::Dataset(_))));
    }
}
