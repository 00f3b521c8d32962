// Copyright (c) 2025-2026, Tom Ouellette
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

use image::{Rgba, RgbaImage};

use crate::error::PolymaskError;

/// Alpha composite a layer over a base image using the "over" operator
///
/// # Arguments
///
/// * `base` - Bottom rgba image
/// * `layer` - Top rgba image with the same dimensions as `base`
///
/// # Examples
///
/// ```
/// use image::{Rgba, RgbaImage};
/// use polymask_core::cv::composite::alpha_composite;
///
/// let base = RgbaImage::from_pixel(2, 1, Rgba([10, 20, 30, 255]));
/// let mut layer = RgbaImage::new(2, 1);
/// layer.put_pixel(1, 0, Rgba([255, 0, 0, 255]));
///
/// let output = alpha_composite(&base, &layer).unwrap();
/// assert_eq!(output.get_pixel(0, 0), &Rgba([10, 20, 30, 255]));
/// assert_eq!(output.get_pixel(1, 0), &Rgba([255, 0, 0, 255]));
/// ```
pub fn alpha_composite(base: &RgbaImage, layer: &RgbaImage) -> Result<RgbaImage, PolymaskError> {
    if base.dimensions() != layer.dimensions() {
        return Err(PolymaskError::MaskSizeError);
    }

    let mut output = base.clone();

    output
        .pixels_mut()
        .zip(layer.pixels())
        .for_each(|(dst, src)| *dst = over(dst, src));

    Ok(output)
}

// Porter-Duff "over" for straight (non-premultiplied) alpha
fn over(dst: &Rgba<u8>, src: &Rgba<u8>) -> Rgba<u8> {
    match src[3] {
        0 => *dst,
        255 => *src,
        _ => {
            let src_a = src[3] as f32 / 255.0;
            let dst_a = dst[3] as f32 / 255.0;
            let out_a = src_a + dst_a * (1.0 - src_a);

            let mut out = [0u8; 4];
            for c in 0..3 {
                let value =
                    (src[c] as f32 * src_a + dst[c] as f32 * dst_a * (1.0 - src_a)) / out_a;
                out[c] = value.round().clamp(0.0, 255.0) as u8;
            }
            out[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;

            Rgba(out)
        }
    }
}
