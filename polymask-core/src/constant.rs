// Copyright (c) 2025-2026, Tom Ouellette
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

// Source image formats in lookup order. PNG comes last since it is
// also the output format and a png source is overwritten in place.
pub const SOURCE_IMAGE_FORMATS: [&str; 11] = [
    "jpeg", "jpg", "bmp", "tif", "tiff", "webp", "tga", "pbm", "pgm", "ppm", "png",
];

// Extension of composited outputs
pub const OUTPUT_EXTENSION: &str = "png";

// Annotation document name inside an extracted job directory
pub const ANNOTATIONS_FILENAME: &str = "annotations.xml";

// Element path holding label definitions below the document root
pub const LABELS_PATH: [&str; 3] = ["meta", "job", "labels"];

// Annotation element and attribute names
pub const LABEL_TAG: &str = "label";
pub const LABEL_NAME_TAG: &str = "name";
pub const LABEL_COLOR_TAG: &str = "color";
pub const IMAGE_TAG: &str = "image";
pub const IMAGE_ID_ATTR: &str = "id";
pub const POLYGON_TAG: &str = "polygon";
pub const POLYGON_LABEL_ATTR: &str = "label";
pub const POLYGON_POINTS_ATTR: &str = "points";
