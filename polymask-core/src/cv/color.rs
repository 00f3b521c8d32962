// Copyright (c) 2025-2026, Tom Ouellette
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

use image::Rgb;

use crate::error::PolymaskError;

/// Convert a `#RRGGBB` (or `RRGGBB`) hex string into an rgb color
///
/// # Arguments
///
/// * `hex` - Six hexadecimal digits with an optional leading `#`
///
/// # Examples
///
/// ```
/// use image::Rgb;
/// use polymask_core::cv::color::hex_to_rgb;
///
/// assert_eq!(hex_to_rgb("#FF8000").unwrap(), Rgb([255, 128, 0]));
/// assert_eq!(hex_to_rgb("0a0B0c").unwrap(), Rgb([10, 11, 12]));
/// assert!(hex_to_rgb("#FFF").is_err());
/// ```
pub fn hex_to_rgb(hex: &str) -> Result<Rgb<u8>, PolymaskError> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);

    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(PolymaskError::MalformedAnnotationError(format!(
            "Color '{}' is not a 6-digit hex color",
            hex
        )));
    }

    let mut rgb = [0u8; 3];
    for (channel, i) in rgb.iter_mut().zip((0..6).step_by(2)) {
        *channel = u8::from_str_radix(&digits[i..i + 2], 16)
            .map_err(|err| PolymaskError::MalformedAnnotationError(err.to_string()))?;
    }

    Ok(Rgb(rgb))
}
