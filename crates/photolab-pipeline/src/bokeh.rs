//! Simulated shallow depth of field.
//!
//! The centre of the frame stays sharp inside an ellipse while the rest
//! fades into a Gaussian-blurred copy. The mask depends only on the
//! image dimensions, never on content: the subject is assumed to be
//! centred.

use imageproc::filter::separable_filter_equal;

use crate::blur::{gaussian_blur, gaussian_kernel};
use crate::raster::{Gray32FImage, to_u8};
use crate::types::{FilterParameters, RgbImage};

/// Horizontal radius of the focus ellipse as a fraction of image width.
pub const FOCUS_RADIUS_X: f32 = 0.35;

/// Vertical radius of the focus ellipse as a fraction of image height.
pub const FOCUS_RADIUS_Y: f32 = 0.40;

/// Kernel size used to feather the focus mask.
pub const MASK_FEATHER_KERNEL: u32 = 51;

/// Background blur kernel size for a strength in `[0, 100]`:
/// `5 + strength/100 * 96`, rounded to the nearest odd integer.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn background_kernel_size(strength: f32) -> u32 {
    let range = FilterParameters::BOKEH_STRENGTH;
    let raw = (range.clamp(strength) / range.max).mul_add(96.0, 5.0);
    2 * ((raw - 1.0) / 2.0).round() as u32 + 1
}

/// Feathered elliptical focus mask: 1.0 keeps the sharp pixel, 0.0
/// takes the blurred one.
///
/// The raw value is `clamp(1.5 - d, 0, 1)` where `d` is the normalized
/// elliptical distance from the image centre, so the ellipse interior
/// out to `d = 0.5` is fully sharp and the falloff reaches zero at
/// `d = 1.5`. The mask is then smoothed with a fixed
/// [`MASK_FEATHER_KERNEL`] Gaussian.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn focus_mask(width: u32, height: u32) -> Gray32FImage {
    let (w, h) = (width as f32, height as f32);
    let (cx, cy) = (w / 2.0, h / 2.0);
    let rx = (w * FOCUS_RADIUS_X).max(f32::EPSILON);
    let ry = (h * FOCUS_RADIUS_Y).max(f32::EPSILON);

    let raw = Gray32FImage::from_fn(width, height, |x, y| {
        let dx = (x as f32 - cx) / rx;
        let dy = (y as f32 - cy) / ry;
        let d = dx.hypot(dy);
        image::Luma([(1.5 - d).clamp(0.0, 1.0)])
    });
    separable_filter_equal(&raw, &gaussian_kernel(MASK_FEATHER_KERNEL))
}

/// Blur the background around a sharp elliptical centre.
///
/// Non-positive strength returns an unchanged copy.
#[must_use = "returns the bokeh image"]
pub fn bokeh(image: &RgbImage, strength: f32) -> RgbImage {
    if strength.is_nan() || strength <= 0.0 {
        return image.clone();
    }

    let blurred = gaussian_blur(image, background_kernel_size(strength));
    let mask = focus_mask(image.width(), image.height());

    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let m = mask.get_pixel(x, y).0[0];
        let sharp = image.get_pixel(x, y).0;
        let soft = blurred.get_pixel(x, y).0;
        image::Rgb(std::array::from_fn(|c| {
            to_u8(f32::from(sharp[c]).mul_add(m, f32::from(soft[c]) * (1.0 - m)))
        }))
    })
}
