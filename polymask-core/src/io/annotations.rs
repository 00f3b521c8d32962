// Copyright (c) 2025-2026, Tom Ouellette
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use image::Rgb;
use roxmltree::{Document, Node};

use crate::constant::{
    IMAGE_ID_ATTR, IMAGE_TAG, LABEL_COLOR_TAG, LABEL_NAME_TAG, LABEL_TAG, LABELS_PATH,
    POLYGON_LABEL_ATTR, POLYGON_POINTS_ATTR, POLYGON_TAG,
};
use crate::cv::color::hex_to_rgb;
use crate::cv::points::parse_polygon_points;
use crate::error::PolymaskError;

/// Label name to rgb color lookup for a single job
///
/// The table is built once from the label definitions of an annotation
/// document and keeps each color as its raw hex string. When a label name
/// is defined more than once, the definition appearing last in the
/// document wins. Colors are only converted when a label is looked up, so
/// a malformed color fails the polygon that uses it rather than the table.
///
/// # Examples
///
/// ```
/// use image::Rgb;
/// use polymask_core::io::LabelColorTable;
///
/// let colors: LabelColorTable = [
///     ("cat".to_string(), "bogus".to_string()),
///     ("cat".to_string(), "#0000FF".to_string()),
///     ("dog".to_string(), "#FFF".to_string()),
/// ]
/// .into_iter()
/// .collect();
///
/// assert_eq!(colors.len(), 2);
/// assert_eq!(colors.get("cat").unwrap(), Rgb([0, 0, 255]));
/// assert!(colors.get("dog").is_err());
/// assert!(colors.get("bird").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelColorTable {
    colors: HashMap<String, String>,
}

impl LabelColorTable {
    /// Resolve the rgb color of a label
    ///
    /// Returns `MissingLabelColorError` for an undefined label and
    /// `MalformedAnnotationError` when its color is not a 6-digit hex color.
    pub fn get(&self, label: &str) -> Result<Rgb<u8>, PolymaskError> {
        let hex = self
            .colors
            .get(label)
            .ok_or_else(|| PolymaskError::MissingLabelColorError(label.to_string()))?;

        hex_to_rgb(hex)
    }

    /// Check if a label has a color
    pub fn contains(&self, label: &str) -> bool {
        self.colors.contains_key(label)
    }

    /// Return the number of distinct labels
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Check if no labels are defined
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl FromIterator<(String, String)> for LabelColorTable {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            colors: iter.into_iter().collect(),
        }
    }
}

/// A labeled polygon with its raw `x1,y1;x2,y2;...` coordinate string
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonRecord {
    pub label: String,
    pub points: String,
}

impl PolygonRecord {
    /// Parse the raw coordinates into (x, y) pixel coordinates
    pub fn points(&self) -> Result<Vec<[f32; 2]>, PolymaskError> {
        parse_polygon_points(&self.points)
    }
}

/// An annotated image and its polygons in document order
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRecord {
    pub id: u64,
    pub polygons: Vec<PolygonRecord>,
}

/// Parsed annotations of a single job
#[derive(Debug, Clone)]
pub struct Annotations {
    pub colors: LabelColorTable,
    pub images: Vec<ImageRecord>,
    /// Images dropped because they carried no polygons
    pub skipped: usize,
}

impl Annotations {
    /// Open and parse an annotation document from the provided path
    ///
    /// # Arguments
    ///
    /// * `path` - Path to an `annotations.xml` document
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use polymask_core::io::Annotations;
    /// let annotations = Annotations::open("result/46939/annotations.xml");
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Annotations, PolymaskError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|err| {
            PolymaskError::NoFileError(format!("{}: {}", path.as_ref().display(), err))
        })?;

        Self::parse(&contents)
    }

    /// Parse an annotation document
    ///
    /// # Arguments
    ///
    /// * `text` - Annotation document contents
    ///
    /// # Examples
    ///
    /// ```
    /// use polymask_core::io::Annotations;
    ///
    /// let text = r##"
    /// <annotations>
    ///   <meta><job><labels>
    ///     <label><name>cat</name><color>#FF0000</color></label>
    ///   </labels></job></meta>
    ///   <image id="7"><polygon label="cat" points="0,0;10,0;0,10"/></image>
    ///   <image id="8"/>
    /// </annotations>
    /// "##;
    ///
    /// let annotations = Annotations::parse(text).unwrap();
    /// assert_eq!(annotations.colors.len(), 1);
    /// assert_eq!(annotations.images.len(), 1);
    /// assert_eq!(annotations.images[0].id, 7);
    /// assert_eq!(annotations.skipped, 1);
    /// ```
    pub fn parse(text: &str) -> Result<Annotations, PolymaskError> {
        let document = Document::parse(text)
            .map_err(|err| PolymaskError::AnnotationReadError(err.to_string()))?;

        let colors = extract_colors(&document)?;
        let images = extract_images(&document)?;
        let total = images.len();
        let images = filter_images_with_polygons(images);

        Ok(Annotations {
            colors,
            skipped: total - images.len(),
            images,
        })
    }
}

/// Build the label color table from `meta/job/labels` definitions
pub fn extract_colors(document: &Document) -> Result<LabelColorTable, PolymaskError> {
    let mut containers = vec![document.root_element()];
    for tag in LABELS_PATH {
        containers = containers
            .into_iter()
            .flat_map(|node| child_elements(node, tag).collect::<Vec<_>>())
            .collect();
    }

    let mut entries = Vec::new();
    for labels in containers {
        for label in labels
            .descendants()
            .skip(1)
            .filter(|node| node.has_tag_name(LABEL_TAG))
        {
            let name = child_text(label, LABEL_NAME_TAG)?;
            let color = child_text(label, LABEL_COLOR_TAG)?;
            entries.push((name.to_string(), color.to_string()));
        }
    }

    Ok(entries.into_iter().collect())
}

/// Collect every `image` element in the document with its direct polygons
pub fn extract_images(document: &Document) -> Result<Vec<ImageRecord>, PolymaskError> {
    let mut seen = HashSet::new();

    document
        .root_element()
        .descendants()
        .skip(1)
        .filter(|node| node.has_tag_name(IMAGE_TAG))
        .map(|image| -> Result<ImageRecord, PolymaskError> {
            let id = required_attribute(image, IMAGE_ID_ATTR)?;
            let id = id.trim().parse::<u64>().map_err(|_| {
                PolymaskError::MalformedAnnotationError(format!(
                    "Image id '{}' is not a non-negative integer",
                    id
                ))
            })?;

            if !seen.insert(id) {
                return Err(PolymaskError::MalformedAnnotationError(format!(
                    "Image id {} appears more than once",
                    id
                )));
            }

            let polygons = child_elements(image, POLYGON_TAG)
                .map(|polygon| -> Result<PolygonRecord, PolymaskError> {
                    Ok(PolygonRecord {
                        label: required_attribute(polygon, POLYGON_LABEL_ATTR)?.to_string(),
                        points: required_attribute(polygon, POLYGON_POINTS_ATTR)?.to_string(),
                    })
                })
                .collect::<Result<Vec<PolygonRecord>, PolymaskError>>()?;

            Ok(ImageRecord { id, polygons })
        })
        .collect()
}

/// Keep only images with at least one polygon, preserving order
pub fn filter_images_with_polygons(images: Vec<ImageRecord>) -> Vec<ImageRecord> {
    images
        .into_iter()
        .filter(|image| !image.polygons.is_empty())
        .collect()
}

fn child_elements<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    tag: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(move |child| child.has_tag_name(tag))
}

fn child_text<'a>(node: Node<'a, '_>, tag: &'static str) -> Result<&'a str, PolymaskError> {
    child_elements(node, tag)
        .next()
        .and_then(|child| child.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| {
            PolymaskError::MalformedAnnotationError(format!(
                "Label definition is missing a '{}' value",
                tag
            ))
        })
}

fn required_attribute<'a>(node: Node<'a, '_>, name: &str) -> Result<&'a str, PolymaskError> {
    node.attribute(name).ok_or_else(|| {
        PolymaskError::MalformedAnnotationError(format!(
            "<{}> element is missing the '{}' attribute",
            node.tag_name().name(),
            name
        ))
    })
}
