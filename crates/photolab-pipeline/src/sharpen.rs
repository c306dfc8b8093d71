//! Unsharp-mask sharpening with a 3x3 convolution kernel.
//!
//! Correlation runs through [`imageproc::filter::filter`], which pads by
//! repeating the edge pixels; results are rounded to 8 bits.

use imageproc::filter::filter;
use imageproc::kernel::Kernel;

use crate::grayscale::widen;
use crate::raster::to_u8;
use crate::types::{FilterParameters, GrayImage, RgbImage};

/// Map a strength in `[0, 20]` to the kernel gain `alpha` in `[2, 10]`.
#[must_use]
pub fn sharpen_gain(strength: f32) -> f32 {
    let range = FilterParameters::SHARPEN_STRENGTH;
    (range.clamp(strength) / range.max).mul_add(8.0, 2.0)
}

/// The 3x3 unsharp-mask kernel for a given strength, row-major.
///
/// The centre weight is `1 + alpha`, the four edge-adjacent weights are
/// `-alpha / 4` and the corners are zero, so the weights sum to one and
/// flat regions pass through unchanged.
#[must_use]
pub fn sharpen_kernel(strength: f32) -> [f32; 9] {
    let alpha = sharpen_gain(strength);
    let edge = -alpha / 4.0;
    [0.0, edge, 0.0, edge, 1.0 + alpha, edge, 0.0, edge, 0.0]
}

/// Sharpen an RGB image.
///
/// Even a strength of zero sharpens (gain 2); the render pipeline skips
/// this stage entirely when the slider is at zero.
#[must_use = "returns the sharpened image"]
pub fn sharpen(image: &RgbImage, strength: f32) -> RgbImage {
    let weights = sharpen_kernel(strength);
    filter(image, Kernel::new(&weights, 3, 3), to_u8)
}

/// Sharpen a single-channel image and widen the result to RGB.
#[must_use = "returns the sharpened RGB image"]
pub fn sharpen_gray(image: &GrayImage, strength: f32) -> RgbImage {
    let weights = sharpen_kernel(strength);
    let sharpened: GrayImage = filter(image, Kernel::new(&weights, 3, 3), to_u8);
    widen(&sharpened)
}
