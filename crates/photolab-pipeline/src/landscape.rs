//! One-click outdoor scene enhancement.
//!
//! A fixed composite: boost color, sharpen, then add back a high-pass
//! emphasis of the luminance to bring out texture in foliage, rock and
//! cloud detail.

use image::GrayImage;
use serde::{Deserialize, Serialize};

use crate::color::vibrance_saturation;
use crate::grayscale::luminance;
use crate::raster::to_u8;
use crate::sharpen::sharpen;
use crate::types::{FilterParameters, RgbImage};

/// Sigma of the blur that separates low and high frequencies in the
/// detail pass.
pub const DETAIL_BLUR_SIGMA: f32 = 3.0;

/// Weight of the detail residual when it is added onto the image.
pub const DETAIL_WEIGHT: f32 = 0.25;

/// Knobs of the landscape preset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandscapeSettings {
    /// Vibrance passed to [`vibrance_saturation`].
    pub vibrance: f32,
    /// Saturation passed to [`vibrance_saturation`].
    pub saturation: f32,
    /// Sharpen strength; the sharpen pass is skipped when not positive.
    pub sharpen_strength: f32,
    /// Gates the detail pass: any positive value runs it at the fixed
    /// [`DETAIL_WEIGHT`]. The magnitude is not used.
    pub detail_strength: f32,
}

impl Default for LandscapeSettings {
    fn default() -> Self {
        Self {
            vibrance: 60.0,
            saturation: 30.0,
            sharpen_strength: 8.0,
            detail_strength: 10.0,
        }
    }
}

impl LandscapeSettings {
    /// Clamp vibrance, saturation and sharpen strength into the ranges of
    /// the matching sliders. `detail_strength` is only a gate and is kept.
    #[must_use]
    pub fn clamped(&self) -> Self {
        Self {
            vibrance: FilterParameters::VIBRANCE.clamp(self.vibrance),
            saturation: FilterParameters::SATURATION.clamp(self.saturation),
            sharpen_strength: FilterParameters::SHARPEN_STRENGTH.clamp(self.sharpen_strength),
            detail_strength: self.detail_strength,
        }
    }
}

/// High-pass emphasis of the luminance: `1.5 * L - 0.5 * blur(L)`,
/// saturated to 8 bits.
#[must_use]
pub fn detail_residual(luma: &GrayImage) -> GrayImage {
    let blurred = imageproc::filter::gaussian_blur_f32(luma, DETAIL_BLUR_SIGMA);
    GrayImage::from_fn(luma.width(), luma.height(), |x, y| {
        let l = f32::from(luma.get_pixel(x, y).0[0]);
        let b = f32::from(blurred.get_pixel(x, y).0[0]);
        image::Luma([to_u8(l.mul_add(1.5, -0.5 * b))])
    })
}

/// Apply the landscape preset.
///
/// Order: vibrance/saturation, then sharpen (if `sharpen_strength > 0`),
/// then the detail pass (if `detail_strength > 0`), which adds
/// `DETAIL_WEIGHT * residual` to every channel.
#[must_use = "returns the enhanced image"]
pub fn landscape_enhance(image: &RgbImage, settings: &LandscapeSettings) -> RgbImage {
    let mut result = vibrance_saturation(image, settings.vibrance, settings.saturation);

    if settings.sharpen_strength > 0.0 {
        result = sharpen(&result, settings.sharpen_strength);
    }

    if settings.detail_strength > 0.0 {
        let residual = detail_residual(&luminance(&result));
        for (x, y, pixel) in result.enumerate_pixels_mut() {
            let r = f32::from(residual.get_pixel(x, y).0[0]);
            for sample in &mut pixel.0 {
                *sample = to_u8(r.mul_add(DETAIL_WEIGHT, f32::from(*sample)));
            }
        }
    }

    result
}
