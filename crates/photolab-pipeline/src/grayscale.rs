//! Luminance conversion.
//!
//! [`luminance`] produces a single-channel image with the standard
//! perceptual weighting `0.299*R + 0.587*G + 0.114*B`. [`grayscale`]
//! replicates that channel back into three so callers always see the
//! RGB image model.

use crate::raster::to_u8;
use crate::types::{GrayImage, RgbImage};

const LUMA_R: f32 = 0.299;
const LUMA_G: f32 = 0.587;
const LUMA_B: f32 = 0.114;

/// Perceptual luminance of one RGB pixel, rounded to 8 bits.
#[must_use]
pub fn luma(pixel: image::Rgb<u8>) -> u8 {
    let [r, g, b] = pixel.0;
    to_u8(LUMA_B.mul_add(
        f32::from(b),
        LUMA_R.mul_add(f32::from(r), LUMA_G * f32::from(g)),
    ))
}

/// Convert an RGB image to a single-channel luminance image.
#[must_use = "returns the luminance image"]
pub fn luminance(image: &RgbImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        image::Luma([luma(*image.get_pixel(x, y))])
    })
}

/// Replicate a single-channel image into three equal RGB channels.
#[must_use = "returns the widened image"]
pub fn widen(gray: &GrayImage) -> RgbImage {
    RgbImage::from_fn(gray.width(), gray.height(), |x, y| {
        let v = gray.get_pixel(x, y).0[0];
        image::Rgb([v, v, v])
    })
}

/// Convert to grayscale while keeping three channels.
///
/// Not reversible. Applying it twice yields the same result as once.
#[must_use = "returns the grayscale image"]
pub fn grayscale(image: &RgbImage) -> RgbImage {
    widen(&luminance(image))
}
