// Copyright (c) 2025-2026, Tom Ouellette
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

use std::fs::File;
use std::io::{BufWriter, Cursor, Write};
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use crate::error::PolymaskError;

/// Extract a zip archive held in memory into a directory
///
/// When `rename` is set, every extracted file is renamed to its numeric
/// stem without leading zeros (e.g. `000012.jpeg` becomes `12.jpeg`), the
/// naming convention expected by the mask drawing stage.
///
/// # Arguments
///
/// * `bytes` - Raw zip archive
/// * `output` - Directory the archive is extracted into
/// * `rename` - Rename files to their numeric identifier
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use polymask_core::io::extract_archive;
///
/// let bytes = std::fs::read("46939.zip").unwrap();
/// let files = extract_archive(&bytes, Path::new("result/46939"), true).unwrap();
/// ```
pub fn extract_archive(
    bytes: &[u8],
    output: &Path,
    rename: bool,
) -> Result<Vec<PathBuf>, PolymaskError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|err| PolymaskError::ArchiveError(err.to_string()))?;

    std::fs::create_dir_all(output).map_err(|err| PolymaskError::DirError(err.to_string()))?;

    let mut files = Vec::with_capacity(archive.len());

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|err| PolymaskError::ArchiveError(err.to_string()))?;

        let relative = entry.enclosed_name().ok_or_else(|| {
            PolymaskError::ArchiveError(format!("Unsafe entry path '{}'", entry.name()))
        })?;

        let target = output.join(&relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&target)
                .map_err(|err| PolymaskError::DirError(err.to_string()))?;
            continue;
        }

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|err| PolymaskError::DirError(err.to_string()))?;
        }

        let target = if rename {
            target.with_file_name(numeric_file_name(&relative)?)
        } else {
            target
        };

        let file = File::create(&target)
            .map_err(|err| PolymaskError::ArchiveError(format!("{}: {}", target.display(), err)))?;

        let mut writer = BufWriter::new(file);
        std::io::copy(&mut entry, &mut writer)
            .and_then(|_| writer.flush())
            .map_err(|err| PolymaskError::ArchiveError(format!("{}: {}", target.display(), err)))?;

        files.push(target);
    }

    Ok(files)
}

// `000012.jpeg` -> `12.jpeg`
fn numeric_file_name(path: &Path) -> Result<String, PolymaskError> {
    let invalid = || {
        PolymaskError::ArchiveError(format!(
            "Entry '{}' is not named by a numeric identifier",
            path.display()
        ))
    };

    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(invalid)?;

    let (stem, extension) = name.split_once('.').ok_or_else(invalid)?;
    let id = stem.parse::<u64>().map_err(|_| invalid())?;

    Ok(format!("{}.{}", id, extension))
}
