//! Input collection for capture processing.

use crate::constants::IMAGE_EXTENSIONS;
use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Collect image files from paths (files and directories).
///
/// Explicit files are kept in argument order; directory contents are
/// walked recursively in name order.
pub fn collect_input_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            if is_image_file(path) {
                files.push(path.clone());
            } else {
                warn!("Skipping unsupported file: {}", path.display());
            }
        } else if path.is_dir() {
            collect_image_files_recursive(path, &mut files)?;
        } else {
            warn!("Skipping non-existent path: {}", path.display());
        }
    }

    Ok(files)
}

fn collect_image_files_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            collect_image_files_recursive(&path, files)?;
        } else if is_image_file(&path) {
            files.push(path);
        }
    }

    Ok(())
}

/// Check if a file has a supported image extension.
pub fn is_image_file(path: &Path) -> bool {
    use std::ffi::OsStr;

    path.extension().is_some_and(|ext| {
        IMAGE_EXTENSIONS
            .iter()
            .any(|supported| ext.eq_ignore_ascii_case(OsStr::new(supported)))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file(Path::new("fangst.jpg")));
        assert!(is_image_file(Path::new("fangst.JPEG")));
        assert!(is_image_file(Path::new("fangst.png")));
        assert!(!is_image_file(Path::new("fangst.heic")));
        assert!(!is_image_file(Path::new("fangst")));
    }

    #[test]
    fn test_is_image_file_with_unicode() {
        assert!(is_image_file(Path::new("rødspette_ørsta.jpg")));
        assert!(is_image_file(Path::new("kveite på båten.png")));
    }

    #[test]
    fn test_collect_walks_directories_in_order() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("tur2");
        std::fs::create_dir(&nested).unwrap();
        std::fs::write(dir.path().join("b.jpg"), b"").unwrap();
        std::fs::write(dir.path().join("a.png"), b"").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"").unwrap();
        std::fs::write(nested.join("c.jpeg"), b"").unwrap();

        let files = collect_input_files(&[dir.path().to_path_buf()]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.png", "b.jpg", "c.jpeg"]);
    }

    #[test]
    fn test_collect_skips_missing_paths() {
        let files = collect_input_files(&[PathBuf::from("/nonexistent/fisk.jpg")]).unwrap();
        assert!(files.is_empty());
    }
}
