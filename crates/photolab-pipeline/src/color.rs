//! Saturation and vibrance in hue/saturation/value space.
//!
//! Saturation and value are kept on the 8-bit `0..=255` scale so the
//! vibrance threshold reads the same as the slider documentation: a
//! pixel is "under-saturated" when its saturation is below half of the
//! range.

use crate::raster::to_u8;
use crate::types::RgbImage;

/// Saturation below which vibrance applies (50% of the 0..=255 range).
pub const VIBRANCE_THRESHOLD: f32 = 128.0;

/// A pixel in HSV space: hue in degrees `[0, 360)`, saturation and
/// value in `[0, 255]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    /// Hue angle in degrees.
    pub h: f32,
    /// Saturation, `0` for gray and `255` for a fully saturated color.
    pub s: f32,
    /// Value (the largest RGB component).
    pub v: f32,
}

impl Hsv {
    /// Convert an 8-bit RGB pixel.
    #[must_use]
    pub fn from_rgb(pixel: image::Rgb<u8>) -> Self {
        let [r, g, b] = pixel.0.map(f32::from);
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let chroma = max - min;

        let s = if max > 0.0 { chroma / max * 255.0 } else { 0.0 };
        let h = if chroma <= 0.0 {
            0.0
        } else if max == r {
            (60.0 * (g - b) / chroma).rem_euclid(360.0)
        } else if max == g {
            60.0_f32.mul_add((b - r) / chroma, 120.0)
        } else {
            60.0_f32.mul_add((r - g) / chroma, 240.0)
        };

        Self { h, s, v: max }
    }

    /// Convert back to an 8-bit RGB pixel.
    #[must_use]
    pub fn to_rgb(self) -> image::Rgb<u8> {
        let v = self.v;
        let chroma = v * (self.s / 255.0);
        let sector = (self.h / 60.0).rem_euclid(6.0);
        let x = chroma * (1.0 - (sector.rem_euclid(2.0) - 1.0).abs());
        let m = v - chroma;

        let (r, g, b) = match sector {
            s if s < 1.0 => (chroma, x, 0.0),
            s if s < 2.0 => (x, chroma, 0.0),
            s if s < 3.0 => (0.0, chroma, x),
            s if s < 4.0 => (0.0, x, chroma),
            s if s < 5.0 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        image::Rgb([to_u8(r + m), to_u8(g + m), to_u8(b + m)])
    }
}

/// Adjust saturation uniformly and vibrance selectively.
///
/// Saturation is first scaled by `1 + saturation/100` for every pixel.
/// Then pixels whose resulting saturation is still below
/// [`VIBRANCE_THRESHOLD`] are scaled again by `1 + vibrance/100`;
/// already vivid pixels are left alone. The channel is clamped to
/// `[0, 255]` before converting back to RGB. Both values at zero
/// return an unchanged copy.
#[must_use = "returns the adjusted image"]
pub fn vibrance_saturation(image: &RgbImage, vibrance: f32, saturation: f32) -> RgbImage {
    if vibrance == 0.0 && saturation == 0.0 {
        return image.clone();
    }

    let saturation_gain = 1.0 + saturation / 100.0;
    let vibrance_gain = 1.0 + vibrance / 100.0;

    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        let mut hsv = Hsv::from_rgb(*pixel);
        hsv.s *= saturation_gain;
        if hsv.s < VIBRANCE_THRESHOLD {
            hsv.s *= vibrance_gain;
        }
        hsv.s = hsv.s.clamp(0.0, 255.0);
        *pixel = hsv.to_rgb();
    }
    out
}
