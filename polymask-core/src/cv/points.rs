// Copyright (c) 2025-2026, Tom Ouellette
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

use image::{Rgba, RgbaImage};

use crate::error::PolymaskError;

/// Parse a `x1,y1;x2,y2;...` coordinate string into (x, y) points
///
/// Points are returned in input order. Polygons with fewer than three
/// points are accepted and are later drawn as a point or a line.
///
/// # Arguments
///
/// * `raw` - Semicolon separated vertices with comma separated components
///
/// # Examples
///
/// ```
/// use polymask_core::cv::points::parse_polygon_points;
///
/// let points = parse_polygon_points("0,0;10.5,0;0,10").unwrap();
/// assert_eq!(points, vec![[0., 0.], [10.5, 0.], [0., 10.]]);
///
/// assert!(parse_polygon_points("0,0;10").is_err());
/// assert!(parse_polygon_points("").is_err());
/// ```
pub fn parse_polygon_points(raw: &str) -> Result<Vec<[f32; 2]>, PolymaskError> {
    fn to_f32(value: &str, vertex: &str) -> Result<f32, PolymaskError> {
        value.trim().parse::<f32>().map_err(|_| {
            PolymaskError::MalformedAnnotationError(format!(
                "Invalid coordinate '{}' in polygon vertex '{}'",
                value, vertex
            ))
        })
    }

    raw.split(';')
        .map(|vertex| {
            let components: Vec<&str> = vertex.split(',').collect();

            if components.len() != 2 {
                return Err(PolymaskError::MalformedAnnotationError(format!(
                    "Polygon vertex '{}' must have exactly two comma separated values",
                    vertex
                )));
            }

            Ok([
                to_f32(components[0], vertex)?,
                to_f32(components[1], vertex)?,
            ])
        })
        .collect()
}

/// Mutably fill a polygon with an opaque color on an rgba canvas
///
/// Pixels covered by the polygon interior and its outline are replaced
/// with `color`. Points outside the canvas are clipped.
///
/// # Arguments
///
/// * `canvas` - An rgba canvas for drawing points onto
/// * `points` - A set of (x, y) points in pixel coordinates
/// * `color` - Color written to every covered pixel
///
/// # References
///
/// Adapted/modified from: https://github.com/image-rs/imageproc
///
/// # Examples
///
/// ```
/// use image::{Rgba, RgbaImage};
/// use polymask_core::cv::points::fill_polygon_mut;
///
/// let mut canvas = RgbaImage::new(3, 3);
/// let points = [[1., 1.], [0., 1.], [1., 0.], [0., 0.]];
///
/// fill_polygon_mut(&mut canvas, &points, Rgba([255, 0, 0, 255]));
///
/// assert_eq!(canvas.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
/// assert_eq!(canvas.get_pixel(1, 1), &Rgba([255, 0, 0, 255]));
/// assert_eq!(canvas.get_pixel(2, 2), &Rgba([0, 0, 0, 0]));
/// ```
pub fn fill_polygon_mut(canvas: &mut RgbaImage, points: &[[f32; 2]], color: Rgba<u8>) {
    let (width, height) = canvas.dimensions();

    if points.is_empty() || width == 0 || height == 0 {
        return;
    }

    let (width, height) = (width as i32, height as i32);

    let mut put = |x: i32, y: i32| {
        if x >= 0 && x < width && y >= 0 && y < height {
            canvas.put_pixel(x as u32, y as u32, color);
        }
    };

    let mut y_min = i32::MAX;
    let mut y_max = i32::MIN;
    for p in points {
        y_min = y_min.min(p[1] as i32);
        y_max = y_max.max(p[1] as i32);
    }

    y_min = y_min.clamp(0, height - 1);
    y_max = y_max.clamp(0, height - 1);

    // Close the polygon by connecting the last point to the first
    let mut closed: Vec<[f32; 2]> = points.to_vec();
    closed.push(points[0]);

    let edges: Vec<&[[f32; 2]]> = closed.windows(2).collect();
    let mut intersections = Vec::new();

    for y in y_min..=y_max {
        let yf = y as f32;

        for edge in &edges {
            let p0 = edge[0];
            let p1 = edge[1];

            if (p0[1] <= yf && p1[1] >= yf) || (p1[1] <= yf && p0[1] >= yf) {
                if p0[1] == p1[1] {
                    intersections.push(p0[0] as i32);
                    intersections.push(p1[0] as i32);
                } else if p0[1] == yf || p1[1] == yf {
                    if p1[1] > yf {
                        intersections.push(p0[0] as i32);
                    }
                    if p0[1] > yf {
                        intersections.push(p1[0] as i32);
                    }
                } else {
                    let fraction = (yf - p0[1]) / (p1[1] - p0[1]);
                    let inter = p0[0] + fraction * (p1[0] - p0[0]);
                    intersections.push(inter.round() as i32);
                }
            }
        }

        intersections.sort_unstable();
        intersections.chunks_exact(2).for_each(|range| {
            let from = range[0].max(0);
            let to = range[1].min(width - 1);

            for x in from..=to {
                put(x, y);
            }
        });

        intersections.clear();
    }

    for edge in &edges {
        if let Some((start, end)) = clip_segment(edge[0], edge[1], width, height) {
            draw_line(start, end, &mut put);
        }
    }
}

// Liang-Barsky clip against the canvas grown by one pixel on every side
fn clip_segment(
    start: [f32; 2],
    end: [f32; 2],
    width: i32,
    height: i32,
) -> Option<([f32; 2], [f32; 2])> {
    let dx = end[0] - start[0];
    let dy = end[1] - start[1];

    let bounds = [
        (-dx, start[0] + 1.),
        (dx, width as f32 - start[0]),
        (-dy, start[1] + 1.),
        (dy, height as f32 - start[1]),
    ];

    let mut t0 = 0f32;
    let mut t1 = 1f32;

    for (p, q) in bounds {
        if p == 0. {
            if q < 0. {
                return None;
            }
            continue;
        }

        let r = q / p;
        if p < 0. {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    Some((
        [start[0] + t0 * dx, start[1] + t0 * dy],
        [start[0] + t1 * dx, start[1] + t1 * dy],
    ))
}

// Bresenham line between two points
fn draw_line<F: FnMut(i32, i32)>(start: [f32; 2], end: [f32; 2], put: &mut F) {
    let (x0, y0) = (start[0] as i32, start[1] as i32);
    let (x1, y1) = (end[0] as i32, end[1] as i32);

    let dx = (x1 as i64 - x0 as i64).abs();
    let dy = (y1 as i64 - y0 as i64).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx - dy;

    let mut x = x0;
    let mut y = y0;

    loop {
        put(x, y);

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }
}
