//! Preview sizing: shrink an image to fit a display area.
//!
//! Only ever downscales and always preserves the aspect ratio. The
//! stored original and base images are never resized; the result is a
//! throwaway copy for on-screen display.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::RgbImage;

/// Default preview area width in pixels.
pub const DEFAULT_MAX_WIDTH: u32 = 800;

/// Default preview area height in pixels.
pub const DEFAULT_MAX_HEIGHT: u32 = 600;

/// Resampling filter used when shrinking a preview.
///
/// Ordered from fastest/lowest-quality to slowest/highest-quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResampleFilter {
    /// Nearest-neighbor: fastest, blocky artifacts.
    Nearest,
    /// Bilinear interpolation: fast, decent quality.
    #[default]
    Triangle,
    /// Bicubic (Catmull-Rom): moderate speed, good quality.
    CatmullRom,
    /// Gaussian: moderate speed, smooth output.
    Gaussian,
    /// Lanczos with 3 lobes: slowest, sharpest/best for photos.
    Lanczos3,
}

impl ResampleFilter {
    /// Convert to the `image` crate's `FilterType`.
    const fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            Self::Nearest => image::imageops::FilterType::Nearest,
            Self::Triangle => image::imageops::FilterType::Triangle,
            Self::CatmullRom => image::imageops::FilterType::CatmullRom,
            Self::Gaussian => image::imageops::FilterType::Gaussian,
            Self::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

impl fmt::Display for ResampleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nearest => f.write_str("Nearest"),
            Self::Triangle => f.write_str("Triangle"),
            Self::CatmullRom => f.write_str("CatmullRom"),
            Self::Gaussian => f.write_str("Gaussian"),
            Self::Lanczos3 => f.write_str("Lanczos3"),
        }
    }
}

/// Size an image of `width x height` takes after fitting into
/// `max_width x max_height` without upscaling.
///
/// Each axis that exceeds its bound gets its own shrink ratio and the
/// smaller ratio applies to both. Fractional sizes truncate, but never
/// below one pixel.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::similar_names
)]
pub fn fitted_size(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    let ratio_w = if width > max_width {
        f64::from(max_width) / f64::from(width)
    } else {
        1.0
    };
    let ratio_h = if height > max_height {
        f64::from(max_height) / f64::from(height)
    } else {
        1.0
    };
    let ratio = ratio_w.min(ratio_h);
    if ratio >= 1.0 {
        return (width, height);
    }

    let new_w = (f64::from(width) * ratio) as u32;
    let new_h = (f64::from(height) * ratio) as u32;
    (new_w.max(1), new_h.max(1))
}

/// Shrink `image` to fit `max_width x max_height` with bilinear
/// resampling. Returns an unchanged copy if it already fits.
#[must_use = "returns the preview image"]
pub fn fit_to_bounds(image: &RgbImage, max_width: u32, max_height: u32) -> RgbImage {
    fit_to_bounds_with(image, max_width, max_height, ResampleFilter::default())
}

/// [`fit_to_bounds`] with an explicit resampling filter.
#[must_use = "returns the preview image"]
pub fn fit_to_bounds_with(
    image: &RgbImage,
    max_width: u32,
    max_height: u32,
    filter: ResampleFilter,
) -> RgbImage {
    let (w, h) = image.dimensions();
    let (new_w, new_h) = fitted_size(w, h, max_width, max_height);
    if (new_w, new_h) == (w, h) {
        return image.clone();
    }
    image::imageops::resize(image, new_w, new_h, filter.to_image_filter())
}
