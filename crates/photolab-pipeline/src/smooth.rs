//! Edge-preserving skin smoothing (bilateral filter).
//!
//! Each output pixel is a weighted mean of its circular neighbourhood,
//! where a neighbour's weight falls off with both spatial distance and
//! color difference. Small blemishes and texture average out while
//! strong silhouette edges, whose two sides differ a lot in color,
//! contribute almost nothing to each other.

use crate::raster::{reflect_101, to_u8};
use crate::types::{FilterParameters, RgbImage};

/// Bilateral filter parameters derived from a smoothing strength.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BilateralParams {
    /// Neighbourhood diameter in pixels.
    pub diameter: u32,
    /// Color tolerance: larger values let more different colors mix.
    pub sigma_color: f32,
    /// Spatial tolerance in pixels.
    pub sigma_space: f32,
}

impl BilateralParams {
    /// Interpolate the filter parameters for `strength` in `[0, 100]`:
    /// diameter `3..=15`, both sigmas `10..=150`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn for_strength(strength: f32) -> Self {
        let range = FilterParameters::SKIN_SMOOTH_STRENGTH;
        let t = range.clamp(strength) / range.max;
        let sigma = t.mul_add(140.0, 10.0);
        Self {
            diameter: t.mul_add(12.0, 3.0) as u32,
            sigma_color: sigma,
            sigma_space: sigma,
        }
    }
}

/// Smooth skin-like texture while keeping strong edges.
///
/// Non-positive strength returns an unchanged copy.
#[must_use = "returns the smoothed image"]
pub fn skin_smoothing(image: &RgbImage, strength: f32) -> RgbImage {
    if strength.is_nan() || strength <= 0.0 {
        return image.clone();
    }
    bilateral_filter(image, BilateralParams::for_strength(strength))
}

/// Apply a bilateral filter with explicit parameters.
///
/// The neighbourhood is the disc of radius `diameter / 2`; the color
/// distance between two pixels is the sum of their absolute channel
/// differences.
#[must_use = "returns the filtered image"]
#[allow(clippy::cast_possible_wrap, clippy::cast_precision_loss)]
pub fn bilateral_filter(image: &RgbImage, params: BilateralParams) -> RgbImage {
    let radius = i64::from((params.diameter / 2).max(1));
    let space_coeff = -0.5 / (params.sigma_space * params.sigma_space);
    let color_coeff = -0.5 / (params.sigma_color * params.sigma_color);

    // Disc offsets with their spatial weights.
    let mut taps = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let r2 = (dx * dx + dy * dy) as f32;
            if r2.sqrt() <= radius as f32 {
                taps.push((dx, dy, (r2 * space_coeff).exp()));
            }
        }
    }

    // Color weight for every possible L1 distance between 8-bit pixels.
    let color_weights: Vec<f32> = (0..=3 * 255_u16)
        .map(|d| {
            let d = f32::from(d);
            (d * d * color_coeff).exp()
        })
        .collect();

    let (width, height) = image.dimensions();
    RgbImage::from_fn(width, height, |x, y| {
        let center = image.get_pixel(x, y).0;
        let mut sum = [0.0_f32; 3];
        let mut norm = 0.0_f32;
        for &(dx, dy, space_weight) in &taps {
            let sx = reflect_101(i64::from(x) + dx, width);
            let sy = reflect_101(i64::from(y) + dy, height);
            let neighbour = image.get_pixel(sx, sy).0;
            let distance: u16 = center
                .iter()
                .zip(neighbour)
                .map(|(&a, b)| u16::from(a.abs_diff(b)))
                .sum();
            let weight = space_weight * color_weights[usize::from(distance)];
            for (acc, v) in sum.iter_mut().zip(neighbour) {
                *acc += weight * f32::from(v);
            }
            norm += weight;
        }
        image::Rgb(sum.map(|s| to_u8(s / norm)))
    })
}
