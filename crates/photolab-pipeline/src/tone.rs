//! Per-sample tone adjustments: brightness/contrast and warmth.
//!
//! Both filters are point operations: every output sample depends only
//! on the matching input sample, computed in `f32` and clamped back to
//! 8 bits.

use crate::raster::to_u8;
use crate::types::RgbImage;

/// Mid-gray pivot for the contrast gain.
const CONTRAST_PIVOT: f32 = 128.0;

/// Map a contrast slider value in `[-100, 100]` to a multiplicative gain.
///
/// Positive contrast ramps the gain from 1.0 up to 3.0; negative
/// contrast ramps it down to 0.5. The two halves have different slopes.
#[must_use]
pub fn contrast_gain(contrast: f32) -> f32 {
    if contrast > 0.0 {
        (contrast / 100.0).mul_add(2.0, 1.0)
    } else {
        (contrast / 100.0).mul_add(0.5, 1.0)
    }
}

/// Adjust contrast, then brightness.
///
/// Each sample becomes `(p - 128) * alpha + 128 + brightness`, where
/// `alpha` is [`contrast_gain`]. Contrast is always applied strictly
/// before the brightness offset. With both values at zero the result
/// is an unchanged copy.
#[must_use = "returns the adjusted image"]
pub fn brightness_contrast(image: &RgbImage, brightness: f32, contrast: f32) -> RgbImage {
    if brightness == 0.0 && contrast == 0.0 {
        return image.clone();
    }

    let alpha = contrast_gain(contrast);
    let mut out = image.clone();
    for sample in out.iter_mut() {
        let v = (f32::from(*sample) - CONTRAST_PIVOT).mul_add(alpha, CONTRAST_PIVOT);
        *sample = to_u8(v + brightness);
    }
    out
}

/// Global warm/cool tint.
///
/// `warmth` in `[-50, 50]` maps to a factor `f = warmth / 50 * 0.1`;
/// red is scaled by `1 + f`, green by `1 + f/2` and blue by `1 - f`.
/// Every pixel receives the same tint regardless of content. Zero
/// warmth returns an unchanged copy.
#[must_use = "returns the tinted image"]
pub fn skin_tone_warmth(image: &RgbImage, warmth: f32) -> RgbImage {
    if warmth == 0.0 {
        return image.clone();
    }

    let factor = warmth / 50.0 * 0.1;
    let gains = [1.0 + factor, factor.mul_add(0.5, 1.0), 1.0 - factor];
    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        for (sample, gain) in pixel.0.iter_mut().zip(gains) {
            *sample = to_u8(f32::from(*sample) * gain);
        }
    }
    out
}
