//! In-memory image codec: bytes in, RGB out, and back.
//!
//! No filesystem access happens here; `photolab-io` wraps these
//! functions with reads and writes.

use std::fmt;
use std::path::Path;

use image::ImageEncoder;
use serde::{Deserialize, Serialize};

use crate::types::{PipelineError, RgbImage};

/// Quality used for every JPEG export.
pub const JPEG_QUALITY: u8 = 95;

/// Output formats an edited image can be exported as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    /// Lossless PNG.
    Png,
    /// Lossy JPEG at [`JPEG_QUALITY`].
    Jpeg,
    /// Uncompressed BMP.
    Bmp,
}

impl ExportFormat {
    /// Pick a format from a bare file extension (no leading dot),
    /// ignoring ASCII case.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::UnsupportedFormat`] for anything other
    /// than `png`, `jpg`, `jpeg` or `bmp`.
    pub fn from_extension(extension: &str) -> Result<Self, PipelineError> {
        match extension.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "bmp" => Ok(Self::Bmp),
            _ => Err(PipelineError::UnsupportedFormat(extension.to_owned())),
        }
    }

    /// Pick a format from the extension of `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::UnsupportedFormat`] when the path has no
    /// extension or an unsupported one.
    pub fn from_path(path: &Path) -> Result<Self, PipelineError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| PipelineError::UnsupportedFormat(path.display().to_string()))?;
        Self::from_extension(extension)
    }

    /// Canonical file extension for this format.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Bmp => "bmp",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Png => f.write_str("PNG"),
            Self::Jpeg => f.write_str("JPEG"),
            Self::Bmp => f.write_str("BMP"),
        }
    }
}

/// Decode raw image bytes (PNG, JPEG, BMP) into an RGB image.
///
/// Alpha is dropped and grayscale sources are widened to three channels.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyInput`] if `bytes` is empty.
/// Returns [`PipelineError::ImageDecode`] if the format is unrecognized
/// or the data is corrupt.
pub fn decode(bytes: &[u8]) -> Result<RgbImage, PipelineError> {
    if bytes.is_empty() {
        return Err(PipelineError::EmptyInput);
    }
    let decoded = image::load_from_memory(bytes)?;
    Ok(decoded.to_rgb8())
}

/// Encode an RGB image in the given format.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyInput`] for a zero-sized image and
/// [`PipelineError::ImageEncode`] if the encoder fails.
pub fn encode(image: &RgbImage, format: ExportFormat) -> Result<Vec<u8>, PipelineError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(PipelineError::EmptyInput);
    }

    let mut buf = Vec::new();
    let (w, h) = image.dimensions();
    let color = image::ExtendedColorType::Rgb8;
    let result = match format {
        ExportFormat::Png => {
            image::codecs::png::PngEncoder::new(&mut buf).write_image(image.as_raw(), w, h, color)
        }
        ExportFormat::Jpeg => {
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY)
                .write_image(image.as_raw(), w, h, color)
        }
        ExportFormat::Bmp => {
            image::codecs::bmp::BmpEncoder::new(&mut buf).write_image(image.as_raw(), w, h, color)
        }
    };
    result.map_err(|e| PipelineError::ImageEncode(e.to_string()))?;
    Ok(buf)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[allow(clippy::cast_possible_truncation)]
    fn gradient() -> RgbImage {
        RgbImage::from_fn(16, 9, |x, y| {
            image::Rgb([(x * 15) as u8, (y * 28) as u8, 77])
        })
    }

    #[test]
    fn extension_lookup_is_case_insensitive() {
        assert_eq!(ExportFormat::from_extension("PNG").unwrap(), ExportFormat::Png);
        assert_eq!(ExportFormat::from_extension("jpg").unwrap(), ExportFormat::Jpeg);
        assert_eq!(ExportFormat::from_extension("JpEg").unwrap(), ExportFormat::Jpeg);
        assert_eq!(ExportFormat::from_extension("bmp").unwrap(), ExportFormat::Bmp);
    }

    #[test]
    fn unknown_extension_rejected() {
        match ExportFormat::from_extension("tiff") {
            Err(PipelineError::UnsupportedFormat(ext)) => assert_eq!(ext, "tiff"),
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[test]
    fn path_without_extension_rejected() {
        let result = ExportFormat::from_path(Path::new("/tmp/photo"));
        assert!(matches!(result, Err(PipelineError::UnsupportedFormat(_))));
    }

    #[test]
    fn path_extension_selects_format() {
        let format = ExportFormat::from_path(Path::new("holiday/beach.JPEG")).unwrap();
        assert_eq!(format, ExportFormat::Jpeg);
        assert_eq!(format.extension(), "jpg");
    }

    #[test]
    fn decode_empty_input() {
        assert!(matches!(decode(&[]), Err(PipelineError::EmptyInput)));
    }

    #[test]
    fn decode_garbage_is_decode_error() {
        let result = decode(b"definitely not an image");
        assert!(matches!(result, Err(PipelineError::ImageDecode(_))));
    }

    #[test]
    fn png_round_trip_is_lossless() {
        let img = gradient();
        let bytes = encode(&img, ExportFormat::Png).unwrap();
        assert_eq!(decode(&bytes).unwrap(), img);
    }

    #[test]
    fn bmp_round_trip_is_lossless() {
        let img = gradient();
        let bytes = encode(&img, ExportFormat::Bmp).unwrap();
        assert_eq!(decode(&bytes).unwrap(), img);
    }

    #[test]
    fn jpeg_round_trip_keeps_shape_and_tone() {
        let img = RgbImage::from_pixel(32, 24, image::Rgb([120, 160, 200]));
        let bytes = encode(&img, ExportFormat::Jpeg).unwrap();
        let back = decode(&bytes).unwrap();
        assert_eq!(back.dimensions(), (32, 24));
        let p = back.get_pixel(16, 12).0;
        for (got, want) in p.iter().zip([120_u8, 160, 200]) {
            assert!(got.abs_diff(want) <= 4, "jpeg drifted: {p:?}");
        }
    }

    #[test]
    fn encode_empty_image_rejected() {
        let empty = RgbImage::new(0, 0);
        assert!(matches!(
            encode(&empty, ExportFormat::Png),
            Err(PipelineError::EmptyInput)
        ));
    }
}
