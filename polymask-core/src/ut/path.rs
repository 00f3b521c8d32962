// Copyright (c) 2025-2026, Tom Ouellette
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

use std::path::{Path, PathBuf};

use crate::constant::{OUTPUT_EXTENSION, SOURCE_IMAGE_FORMATS};
use crate::error::PolymaskError;

/// Locate the extracted source image for an image identifier
///
/// Extensions are tried in the order of `SOURCE_IMAGE_FORMATS` so that
/// a previously composited `{id}.png` is only picked when no other
/// source exists.
///
/// # Arguments
///
/// * `directory` - Extracted job directory
/// * `id` - Image identifier used as file stem
///
/// # Examples
///
/// ```
/// use polymask_core::ut::path::find_source_image;
///
/// let directory = std::env::temp_dir().join("TEST_FIND_SOURCE_IMAGE");
/// std::fs::create_dir_all(&directory).unwrap();
/// std::fs::write(directory.join("3.jpg"), b"").unwrap();
///
/// assert_eq!(find_source_image(&directory, 3).unwrap(), directory.join("3.jpg"));
/// assert!(find_source_image(&directory, 4).is_err());
///
/// std::fs::remove_dir_all(&directory).unwrap();
/// ```
pub fn find_source_image<P: AsRef<Path>>(directory: P, id: u64) -> Result<PathBuf, PolymaskError> {
    let directory = directory.as_ref();

    SOURCE_IMAGE_FORMATS
        .iter()
        .map(|ext| directory.join(format!("{}.{}", id, ext)))
        .find(|path| path.is_file())
        .ok_or_else(|| {
            PolymaskError::NoFileError(format!(
                "No source image for id {} in {}",
                id,
                directory.display()
            ))
        })
}

/// Path of the composited output written next to a source image
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use polymask_core::ut::path::composite_path;
///
/// let path = composite_path(Path::new("result/46939/7.jpeg"), 7);
/// assert_eq!(path, PathBuf::from("result/46939/7.png"));
/// ```
pub fn composite_path(source: &Path, id: u64) -> PathBuf {
    source.with_file_name(format!("{}.{}", id, OUTPUT_EXTENSION))
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_find_source_prefers_non_png() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("5.png"), b"").unwrap();
        std::fs::write(dir.path().join("5.jpeg"), b"").unwrap();

        assert_eq!(
            find_source_image(dir.path(), 5).unwrap(),
            dir.path().join("5.jpeg")
        );
    }

    #[test]
    fn test_find_source_png_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("5.png"), b"").unwrap();

        assert_eq!(
            find_source_image(dir.path(), 5).unwrap(),
            dir.path().join("5.png")
        );
    }

    #[test]
    fn test_find_source_ignores_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("5.jpeg")).unwrap();

        assert!(matches!(
            find_source_image(dir.path(), 5),
            Err(PolymaskError::NoFileError(_))
        ));
    }
}
