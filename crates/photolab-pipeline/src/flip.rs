//! Lossless mirror transforms.
//!
//! Unlike the tone and spatial filters, flips are applied to the base
//! image itself and persist across re-renders.

use crate::types::RgbImage;

/// Mirror columns (left <-> right).
#[must_use = "returns the flipped image"]
pub fn flip_horizontal(image: &RgbImage) -> RgbImage {
    image::imageops::flip_horizontal(image)
}

/// Mirror rows (top <-> bottom).
#[must_use = "returns the flipped image"]
pub fn flip_vertical(image: &RgbImage) -> RgbImage {
    image::imageops::flip_vertical(image)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(clippy::cast_possible_truncation)]
    fn asymmetric() -> RgbImage {
        RgbImage::from_fn(5, 3, |x, y| {
            image::Rgb([(x * 50) as u8, (y * 100) as u8, (x * 10 + y) as u8])
        })
    }

    #[test]
    fn horizontal_mirrors_columns() {
        let img = asymmetric();
        let out = flip_horizontal(&img);
        assert_eq!(out.dimensions(), img.dimensions());
        assert_eq!(out.get_pixel(0, 1), img.get_pixel(4, 1));
        assert_eq!(out.get_pixel(4, 2), img.get_pixel(0, 2));
    }

    #[test]
    fn vertical_mirrors_rows() {
        let img = asymmetric();
        let out = flip_vertical(&img);
        assert_eq!(out.get_pixel(3, 0), img.get_pixel(3, 2));
        assert_eq!(out.get_pixel(1, 1), img.get_pixel(1, 1));
    }

    #[test]
    fn flips_are_self_inverse() {
        let img = asymmetric();
        assert_eq!(flip_horizontal(&flip_horizontal(&img)), img);
        assert_eq!(flip_vertical(&flip_vertical(&img)), img);
    }

    #[test]
    fn flips_commute() {
        let img = asymmetric();
        assert_eq!(
            flip_horizontal(&flip_vertical(&img)),
            flip_vertical(&flip_horizontal(&img)),
        );
    }
}
