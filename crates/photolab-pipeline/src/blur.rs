//! Gaussian blur with an explicit kernel size.
//!
//! The blur slider is a radius; the orchestrator turns it into an odd
//! kernel size `2 * radius + 1` and sigma follows from the size, so a
//! larger radius both widens the kernel and spreads its weight.
//!
//! [`gaussian_blur`] filters each RGB channel independently with
//! [`imageproc::filter::separable_filter_equal`] over an `f32` copy, so
//! the horizontal pass is not quantized before the vertical one. Borders
//! repeat the edge pixel. [`gaussian_blur_gray`] does the same for a
//! single-channel image and widens the result back to RGB.

use imageproc::filter::separable_filter_equal;

use crate::raster::{gray_to_f32, rgb_from_f32, rgb_from_gray_f32, rgb_to_f32};
use crate::types::{GrayImage, RgbImage};

/// Sigma derived from an odd kernel size: `0.3 * ((k - 1) / 2 - 1) + 0.8`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn sigma_for_kernel(kernel_size: u32) -> f32 {
    let k = kernel_size as f32;
    0.3_f32.mul_add((k - 1.0).mul_add(0.5, -1.0), 0.8)
}

/// Force a kernel size to be odd and at least 1.
#[must_use]
pub const fn odd_kernel_size(kernel_size: u32) -> u32 {
    if kernel_size == 0 {
        1
    } else if kernel_size % 2 == 0 {
        kernel_size + 1
    } else {
        kernel_size
    }
}

/// Normalized 1D Gaussian weights for `kernel_size` taps.
///
/// Sizes up to 7 use fixed binomial-like tables, which is what a
/// derived sigma approximates for small kernels anyway; larger sizes
/// sample the Gaussian at [`sigma_for_kernel`].
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn gaussian_kernel(kernel_size: u32) -> Vec<f32> {
    let k = odd_kernel_size(kernel_size);
    match k {
        1 => return vec![1.0],
        3 => return vec![0.25, 0.5, 0.25],
        5 => return vec![0.0625, 0.25, 0.375, 0.25, 0.0625],
        7 => {
            return vec![
                0.031_25, 0.109_375, 0.218_75, 0.281_25, 0.218_75, 0.109_375, 0.031_25,
            ];
        }
        _ => {}
    }

    let sigma = sigma_for_kernel(k);
    let center = (k / 2) as f32;
    let mut weights: Vec<f32> = (0..k)
        .map(|i| {
            let d = i as f32 - center;
            (-(d * d) / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f32 = weights.iter().sum();
    for w in &mut weights {
        *w /= sum;
    }
    weights
}

/// Blur an RGB image with a `kernel_size x kernel_size` Gaussian.
///
/// Even sizes are bumped to the next odd size. A size of 1 (or 0)
/// returns an unchanged copy.
#[must_use = "returns the blurred image"]
pub fn gaussian_blur(image: &RgbImage, kernel_size: u32) -> RgbImage {
    if odd_kernel_size(kernel_size) == 1 {
        return image.clone();
    }
    let blurred = separable_filter_equal(&rgb_to_f32(image), &gaussian_kernel(kernel_size));
    rgb_from_f32(&blurred)
}

/// Blur a single-channel image and widen the result to RGB.
#[must_use = "returns the blurred RGB image"]
pub fn gaussian_blur_gray(image: &GrayImage, kernel_size: u32) -> RgbImage {
    let blurred = separable_filter_equal(&gray_to_f32(image), &gaussian_kernel(kernel_size));
    rgb_from_gray_f32(&blurred)
}
