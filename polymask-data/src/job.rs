// Copyright (c) 2025-2026, Tom Ouellette
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use polymask_core::io::extract_archive;
use polymask_core::ut::track::{progress_log, thousands_format};

use crate::request::{ClientConfig, JobPayload, fetch_job};

/// Download and extract a job into `{output}/{job}`
///
/// Images are renamed to their numeric identifier and the annotation
/// document is extracted next to them.
///
/// # Arguments
///
/// * `config` - Service url, credentials and retry policy
/// * `job` - Job identifier
/// * `output` - Directory holding one sub-directory per job
/// * `verbose` - Print progress to console
pub fn download_job(
    config: &ClientConfig,
    job: u64,
    output: &Path,
    verbose: bool,
) -> Result<PathBuf> {
    progress_log(&format!("Fetching job {}", job), verbose);

    let payload = fetch_job(config, job)?;

    extract_job(&payload, job, output, verbose)
}

/// Extract fetched job archives into `{output}/{job}`
pub fn extract_job(
    payload: &JobPayload,
    job: u64,
    output: &Path,
    verbose: bool,
) -> Result<PathBuf> {
    let directory = output.join(job.to_string());

    std::fs::create_dir_all(&directory)
        .with_context(|| format!("Failed to create job directory {}", directory.display()))?;

    let images = extract_archive(&payload.images, &directory, true)
        .with_context(|| format!("Failed to extract images of job {}", job))?;

    extract_archive(&payload.annotations, &directory, false)
        .with_context(|| format!("Failed to extract annotations of job {}", job))?;

    progress_log(
        &format!(
            "Extracted {} images for job {}",
            thousands_format(images.len()),
            job
        ),
        verbose,
    );

    Ok(directory)
}

#[cfg(test)]
mod test {

    use super::*;
    use std::io::{Cursor, Write};
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    fn archive(name: &str, data: &str) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file(name, SimpleFileOptions::default()).unwrap();
        zip.write_all(data.as_bytes()).unwrap();
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_extract_job_layout() {
        let dir = tempfile::tempdir().unwrap();
        let payload = JobPayload {
            images: archive("000042.jpeg", "image"),
            annotations: archive("annotations.xml", "<annotations/>"),
        };

        let directory = extract_job(&payload, 46939, dir.path(), false).unwrap();

        assert_eq!(directory, dir.path().join("46939"));
        assert!(directory.join("42.jpeg").exists());
        assert!(directory.join("annotations.xml").exists());
    }

    #[test]
    fn test_extract_job_corrupt_archive() {
        let dir = tempfile::tempdir().unwrap();
        let payload = JobPayload {
            images: b"corrupt".to_vec(),
            annotations: archive("annotations.xml", "<annotations/>"),
        };

        assert!(extract_job(&payload, 1, dir.path(), false).is_err());
    }
}
