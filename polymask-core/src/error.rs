// Copyright (c) 2025-2026, Tom Ouellette
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum PolymaskError {
    AnnotationReadError(String),
    MalformedAnnotationError(String),
    MissingLabelColorError(String),
    ImageReadError(String),
    ImageWriteError(String),
    MaskSizeError,
    SourceFileDeletionError(String),
    ArchiveError(String),
    NoFileError(String),
    DirError(String),
}

impl fmt::Display for PolymaskError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PolymaskError::AnnotationReadError(message) => {
                write!(
                    f,
                    "[polymask::AnnotationReadError] Annotations could not be read. {}.",
                    message
                )
            }
            PolymaskError::MalformedAnnotationError(message) => {
                write!(
                    f,
                    "[polymask::MalformedAnnotationError] Annotation document is malformed. {}.",
                    message
                )
            }
            PolymaskError::MissingLabelColorError(label) => {
                write!(
                    f,
                    "[polymask::MissingLabelColorError] No color is defined for label '{}'.",
                    label
                )
            }
            PolymaskError::ImageReadError(message) => {
                write!(
                    f,
                    "[polymask::ImageReadError] Failed to read image. {}.",
                    message
                )
            }
            PolymaskError::ImageWriteError(message) => {
                write!(
                    f,
                    "[polymask::ImageWriteError] Failed to write image. {}.",
                    message
                )
            }
            PolymaskError::MaskSizeError => {
                write!(
                    f,
                    "[polymask::MaskSizeError] Mask layer dimensions must match the source image."
                )
            }
            PolymaskError::SourceFileDeletionError(message) => {
                write!(
                    f,
                    "[polymask::SourceFileDeletionError] Source file could not be deleted. {}.",
                    message
                )
            }
            PolymaskError::ArchiveError(message) => {
                write!(
                    f,
                    "[polymask::ArchiveError] Archive could not be extracted. {}.",
                    message
                )
            }
            PolymaskError::NoFileError(message) => {
                write!(
                    f,
                    "[polymask::NoFileError] File could not be found. {}.",
                    message
                )
            }
            PolymaskError::DirError(message) => {
                write!(
                    f,
                    "[polymask::DirError] Directory could not be read. {}.",
                    message
                )
            }
        }
    }
}

impl std::error::Error for PolymaskError {}
