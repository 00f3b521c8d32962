// Copyright (c) 2025-2026, Tom Ouellette
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

use image::{Rgb, Rgba, RgbaImage};

use crate::cv::composite::alpha_composite;
use crate::cv::points::fill_polygon_mut;
use crate::error::PolymaskError;
use crate::io::{LabelColorTable, PolygonRecord};

/// A transparent rgba layer that polygons are painted onto
///
/// Each polygon is filled as a fully opaque shape in its label color.
/// Polygons are painted in the order they are drawn, so later polygons
/// overwrite earlier ones where they overlap.
///
/// # Examples
///
/// ```
/// use image::{Rgb, Rgba, RgbaImage};
/// use polymask_core::im::MaskLayer;
///
/// let mut mask = MaskLayer::new(4, 4);
/// mask.draw_polygon(&[[0., 0.], [3., 0.], [3., 3.], [0., 3.]], Rgb([0, 0, 255]));
///
/// let base = RgbaImage::new(4, 4);
/// let output = mask.composite(&base).unwrap();
/// assert_eq!(output.get_pixel(1, 1), &Rgba([0, 0, 255, 255]));
/// ```
#[derive(Debug, Clone)]
pub struct MaskLayer {
    layer: RgbaImage,
}

impl MaskLayer {
    /// Initialize a fully transparent mask layer
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            layer: RgbaImage::new(width, height),
        }
    }

    /// Width and height of the layer
    pub fn dimensions(&self) -> (u32, u32) {
        self.layer.dimensions()
    }

    /// Return a reference to the underlying rgba layer
    pub fn as_image(&self) -> &RgbaImage {
        &self.layer
    }

    /// Fill a polygon with an opaque color
    pub fn draw_polygon(&mut self, points: &[[f32; 2]], color: Rgb<u8>) {
        let [r, g, b] = color.0;
        fill_polygon_mut(&mut self.layer, points, Rgba([r, g, b, 255]));
    }

    /// Paint labeled polygons in order using the label color table
    ///
    /// # Arguments
    ///
    /// * `polygons` - Polygons in paint order
    /// * `colors` - Label colors for the current job
    pub fn paint(
        &mut self,
        polygons: &[PolygonRecord],
        colors: &LabelColorTable,
    ) -> Result<(), PolymaskError> {
        for polygon in polygons {
            let color = colors.get(&polygon.label)?;
            let points = polygon.points()?;
            self.draw_polygon(&points, color);
        }

        Ok(())
    }

    /// Alpha composite the layer over a base image of the same size
    pub fn composite(&self, base: &RgbaImage) -> Result<RgbaImage, PolymaskError> {
        alpha_composite(base, &self.layer)
    }
}

#[cfg(test)]
mod test {

    use super::*;

    fn polygon(label: &str, points: &str) -> PolygonRecord {
        PolygonRecord {
            label: label.to_string(),
            points: points.to_string(),
        }
    }

    fn colors() -> LabelColorTable {
        [
            ("red".to_string(), "#FF0000".to_string()),
            ("blue".to_string(), "#0000FF".to_string()),
            ("broken".to_string(), "#00FF".to_string()),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_paint_order_later_wins() {
        let mut mask = MaskLayer::new(10, 10);
        mask.paint(
            &[
                polygon("red", "0,0;6,0;6,6;0,6"),
                polygon("blue", "3,3;9,3;9,9;3,9"),
            ],
            &colors(),
        )
        .unwrap();

        let layer = mask.as_image();
        assert_eq!(layer.get_pixel(1, 1), &Rgba([255, 0, 0, 255]));
        assert_eq!(layer.get_pixel(4, 4), &Rgba([0, 0, 255, 255]));
        assert_eq!(layer.get_pixel(5, 5), &Rgba([0, 0, 255, 255]));
        assert_eq!(layer.get_pixel(8, 8), &Rgba([0, 0, 255, 255]));
        assert_eq!(layer.get_pixel(8, 1), &Rgba([0, 0, 0, 0]));

        let mut mask = MaskLayer::new(10, 10);
        mask.paint(
            &[
                polygon("blue", "3,3;9,3;9,9;3,9"),
                polygon("red", "0,0;6,0;6,6;0,6"),
            ],
            &colors(),
        )
        .unwrap();

        assert_eq!(mask.as_image().get_pixel(5, 5), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_paint_missing_label() {
        let mut mask = MaskLayer::new(10, 10);
        let result = mask.paint(&[polygon("unknown", "0,0;6,0;6,6")], &colors());

        assert_eq!(
            result,
            Err(PolymaskError::MissingLabelColorError("unknown".to_string()))
        );
    }

    #[test]
    fn test_paint_malformed_color() {
        let mut mask = MaskLayer::new(10, 10);
        let result = mask.paint(&[polygon("broken", "0,0;6,0;6,6")], &colors());

        assert!(matches!(
            result,
            Err(PolymaskError::MalformedAnnotationError(_))
        ));
    }

    #[test]
    fn test_paint_malformed_points() {
        let mut mask = MaskLayer::new(10, 10);
        let result = mask.paint(&[polygon("red", "0,0;6;6,6")], &colors());

        assert!(matches!(
            result,
            Err(PolymaskError::MalformedAnnotationError(_))
        ));
    }

    #[test]
    fn test_empty_mask_composite_is_identity() {
        let base = RgbaImage::from_fn(6, 4, |x, y| Rgba([x as u8, y as u8, 100, 255]));
        let mask = MaskLayer::new(6, 4);

        assert_eq!(mask.dimensions(), base.dimensions());
        assert_eq!(mask.composite(&base).unwrap(), base);
    }
}
