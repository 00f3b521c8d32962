// Copyright (c) 2025-2026, Tom Ouellette
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

use std::path::{Path, PathBuf};

use image::ImageFormat;
use kdam::BarExt;

use crate::constant::ANNOTATIONS_FILENAME;
use crate::error::PolymaskError;
use crate::im::MaskLayer;
use crate::io::{Annotations, ImageRecord, LabelColorTable};
use crate::ut::path::{composite_path, find_source_image};
use crate::ut::track::{progress_bar, progress_log, progress_warn, thousands_format};

/// Result of compositing the mask of a single image
#[derive(Debug, Clone)]
pub struct CompositeOutcome {
    pub id: u64,
    pub output: PathBuf,
    /// Set when the superseded source image could not be removed
    pub deletion_error: Option<PolymaskError>,
}

/// Summary of a processed job directory
#[derive(Debug, Clone, Default)]
pub struct JobReport {
    pub outputs: Vec<PathBuf>,
    pub skipped: usize,
    pub deletion_failures: Vec<u64>,
}

impl JobReport {
    /// Add the outcome of one composited image
    pub fn record(&mut self, outcome: CompositeOutcome) {
        if outcome.deletion_error.is_some() {
            self.deletion_failures.push(outcome.id);
        }
        self.outputs.push(outcome.output);
    }
}

/// Draw the mask of one annotated image over its source image
///
/// The source image `{id}.{ext}` is loaded from `directory`, every polygon
/// is painted onto a transparent layer in document order, the layer is
/// alpha composited over the source and the result is saved as `{id}.png`.
/// The source file is deleted afterwards. A failed deletion is logged and
/// returned in the outcome rather than treated as an error.
///
/// Nothing is written when a polygon is malformed or references a label
/// without a color.
///
/// # Arguments
///
/// * `record` - Annotated image and its polygons
/// * `colors` - Label colors for the current job
/// * `directory` - Extracted job directory holding the source image
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use polymask_core::im::composite_image;
/// use polymask_core::io::Annotations;
///
/// let directory = Path::new("result/46939");
/// let annotations = Annotations::open(directory.join("annotations.xml")).unwrap();
///
/// for record in &annotations.images {
///     composite_image(record, &annotations.colors, directory).unwrap();
/// }
/// ```
pub fn composite_image(
    record: &ImageRecord,
    colors: &LabelColorTable,
    directory: &Path,
) -> Result<CompositeOutcome, PolymaskError> {
    let source = find_source_image(directory, record.id)?;

    let base = image::open(&source)
        .map_err(|err| PolymaskError::ImageReadError(format!("{}: {}", source.display(), err)))?
        .to_rgba8();

    let (width, height) = base.dimensions();
    let mut mask = MaskLayer::new(width, height);
    mask.paint(&record.polygons, colors)?;

    let composited = mask.composite(&base)?;

    let output = composite_path(&source, record.id);
    composited
        .save_with_format(&output, ImageFormat::Png)
        .map_err(|err| PolymaskError::ImageWriteError(format!("{}: {}", output.display(), err)))?;

    // A png source is overwritten in place by the composite
    let deletion_error = if source == output {
        None
    } else {
        remove_source(&source, record.id)
    };

    Ok(CompositeOutcome {
        id: record.id,
        output,
        deletion_error,
    })
}

/// Delete a superseded source image
///
/// Returns the `SourceFileDeletionError`, after logging it, when the file
/// could not be removed.
pub fn remove_source(source: &Path, id: u64) -> Option<PolymaskError> {
    std::fs::remove_file(source).err().map(|err| {
        let error = PolymaskError::SourceFileDeletionError(format!(
            "Image {} ({}): {}",
            id,
            source.display(),
            err
        ));
        progress_warn(&error.to_string());
        error
    })
}

/// Draw masks for every annotated image of an extracted job directory
///
/// Reads `annotations.xml`, composites each image carrying at least one
/// polygon in document order and finally removes the annotation document.
/// The first parsing, color or image error aborts the job. Outputs written
/// before the failure are kept.
///
/// # Arguments
///
/// * `directory` - Extracted job directory
/// * `verbose` - Print progress to console
pub fn draw_masks<P: AsRef<Path>>(
    directory: P,
    verbose: bool,
) -> Result<JobReport, PolymaskError> {
    let directory = directory.as_ref();
    let annotations_path = directory.join(ANNOTATIONS_FILENAME);
    let annotations = Annotations::open(&annotations_path)?;

    progress_log(
        &format!(
            "Detected {} labels and {} annotated images ({} without polygons).",
            thousands_format(annotations.colors.len()),
            thousands_format(annotations.images.len()),
            thousands_format(annotations.skipped),
        ),
        verbose,
    );

    let mut report = JobReport {
        skipped: annotations.skipped,
        ..Default::default()
    };

    let mut pb = progress_bar(annotations.images.len(), "Drawing masks", verbose);

    for record in &annotations.images {
        let outcome = composite_image(record, &annotations.colors, directory)?;
        report.record(outcome);

        if verbose {
            if let Err(err) = pb.update(1) {
                progress_warn(&format!("Progress bar could not be updated: {}", err));
            }
        }
    }

    if verbose && !annotations.images.is_empty() {
        println!();
    }

    if let Err(err) = std::fs::remove_file(&annotations_path) {
        progress_warn(&format!(
            "Annotation document {} could not be deleted: {}",
            annotations_path.display(),
            err
        ));
    }

    Ok(report)
}
