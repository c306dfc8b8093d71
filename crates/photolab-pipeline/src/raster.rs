//! Floating-point image views shared by the spatial filters.
//!
//! Convolution itself goes through `imageproc::filter`; this module only
//! widens 8-bit images to `f32` buffers and narrows results back with
//! [`to_u8`], which is the single place the `[0, 255]` clamp happens.

use image::{ImageBuffer, Luma, Rgb32FImage};

use crate::types::{GrayImage, RgbImage};

/// Single-channel `f32` image.
pub(crate) type Gray32FImage = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Clamp a floating-point sample into `[0, 255]` and round it to 8 bits.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn to_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Map a possibly out-of-range coordinate into `0..len` by mirroring
/// around the edge samples without duplicating them
/// (`gfedcb|abcdefgh|gfedcba`).
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn reflect_101(index: i64, len: u32) -> u32 {
    let len = i64::from(len);
    if len <= 1 {
        return 0;
    }
    let period = 2 * (len - 1);
    let i = index.rem_euclid(period);
    (if i >= len { period - i } else { i }) as u32
}

pub(crate) fn rgb_to_f32(image: &RgbImage) -> Rgb32FImage {
    Rgb32FImage::from_fn(image.width(), image.height(), |x, y| {
        image::Rgb(image.get_pixel(x, y).0.map(f32::from))
    })
}

pub(crate) fn gray_to_f32(image: &GrayImage) -> Gray32FImage {
    Gray32FImage::from_fn(image.width(), image.height(), |x, y| {
        Luma([f32::from(image.get_pixel(x, y).0[0])])
    })
}

/// Narrow an `f32` RGB image back to 8 bits.
pub(crate) fn rgb_from_f32(image: &Rgb32FImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        image::Rgb(image.get_pixel(x, y).0.map(to_u8))
    })
}

/// Narrow a single-channel `f32` image to 8 bits, replicating the
/// sample into all three RGB channels.
pub(crate) fn rgb_from_gray_f32(image: &Gray32FImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let v = to_u8(image.get_pixel(x, y).0[0]);
        image::Rgb([v, v, v])
    })
}
