//! Shared types for the photolab filter pipeline.

use serde::{Deserialize, Serialize};

/// Re-export `GrayImage` so downstream crates can reference
/// single-channel intermediates without depending on `image` directly.
pub use image::GrayImage;

/// Re-export `RgbImage`, the image model every filter accepts and returns.
pub use image::RgbImage;

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Dimensions of an existing image.
    #[must_use]
    pub fn of(image: &RgbImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
        }
    }

    /// Total pixel count (`width * height`).
    #[must_use]
    pub fn pixel_count(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Inclusive valid range of a numeric filter parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterRange {
    /// Smallest accepted value.
    pub min: f32,
    /// Largest accepted value.
    pub max: f32,
}

impl ParameterRange {
    const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Whether `value` lies within the range. `NaN` is never contained.
    #[must_use]
    pub fn contains(self, value: f32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Clamp `value` into the range. `NaN` maps to the range minimum.
    #[must_use]
    pub fn clamp(self, value: f32) -> f32 {
        if value.is_nan() {
            self.min
        } else {
            value.clamp(self.min, self.max)
        }
    }
}

/// The slider-driven adjustment knobs of an editing session.
///
/// Every parameter has a neutral value that produces the identity
/// transform; [`Default`] yields the all-neutral record.
///
/// Fields are public and unvalidated, matching how a UI writes them
/// straight from its controls. [`FilterParameters::clamped`] brings
/// any record into range and is what the render pipeline applies
/// before running a single filter. [`FilterParameters::validate`]
/// reports the first out-of-range field instead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterParameters {
    /// Flat offset added after contrast, in 8-bit levels.
    pub brightness: f32,
    /// Contrast gain around mid-gray: positive up to 3x, negative down to 0.5x.
    pub contrast: f32,
    /// Unsharp-mask strength.
    pub sharpen_strength: f32,
    /// Gaussian blur radius; the kernel size is `2 * radius + 1`.
    pub blur_radius: u32,
    /// Selective saturation boost for under-saturated pixels.
    pub vibrance: f32,
    /// Uniform saturation scale.
    pub saturation: f32,
    /// Edge-preserving smoothing strength.
    pub skin_smooth_strength: f32,
    /// Background blur strength outside the elliptical focus region.
    pub bokeh_strength: f32,
    /// Global red/yellow tint (positive) or blue tint (negative).
    pub warmth: f32,
    /// Convert the result to grayscale as the last default stage.
    pub grayscale: bool,
}

impl FilterParameters {
    /// Valid range of [`brightness`](Self::brightness).
    pub const BRIGHTNESS: ParameterRange = ParameterRange::new(-100.0, 100.0);
    /// Valid range of [`contrast`](Self::contrast).
    pub const CONTRAST: ParameterRange = ParameterRange::new(-100.0, 100.0);
    /// Valid range of [`sharpen_strength`](Self::sharpen_strength).
    pub const SHARPEN_STRENGTH: ParameterRange = ParameterRange::new(0.0, 20.0);
    /// Largest accepted [`blur_radius`](Self::blur_radius).
    pub const MAX_BLUR_RADIUS: u32 = 30;
    /// Valid range of [`vibrance`](Self::vibrance).
    pub const VIBRANCE: ParameterRange = ParameterRange::new(-100.0, 100.0);
    /// Valid range of [`saturation`](Self::saturation).
    pub const SATURATION: ParameterRange = ParameterRange::new(-100.0, 100.0);
    /// Valid range of [`skin_smooth_strength`](Self::skin_smooth_strength).
    pub const SKIN_SMOOTH_STRENGTH: ParameterRange = ParameterRange::new(0.0, 100.0);
    /// Valid range of [`bokeh_strength`](Self::bokeh_strength).
    pub const BOKEH_STRENGTH: ParameterRange = ParameterRange::new(0.0, 100.0);
    /// Valid range of [`warmth`](Self::warmth).
    pub const WARMTH: ParameterRange = ParameterRange::new(-50.0, 50.0);

    /// The all-neutral parameter set.
    pub const NEUTRAL: Self = Self {
        brightness: 0.0,
        contrast: 0.0,
        sharpen_strength: 0.0,
        blur_radius: 0,
        vibrance: 0.0,
        saturation: 0.0,
        skin_smooth_strength: 0.0,
        bokeh_strength: 0.0,
        warmth: 0.0,
        grayscale: false,
    };

    /// Returns `true` when rendering with these parameters is the identity.
    #[must_use]
    pub fn is_neutral(&self) -> bool {
        *self == Self::NEUTRAL
    }

    /// Copy of `self` with every field clamped into its valid range.
    #[must_use]
    pub fn clamped(&self) -> Self {
        Self {
            brightness: Self::BRIGHTNESS.clamp(self.brightness),
            contrast: Self::CONTRAST.clamp(self.contrast),
            sharpen_strength: Self::SHARPEN_STRENGTH.clamp(self.sharpen_strength),
            blur_radius: self.blur_radius.min(Self::MAX_BLUR_RADIUS),
            vibrance: Self::VIBRANCE.clamp(self.vibrance),
            saturation: Self::SATURATION.clamp(self.saturation),
            skin_smooth_strength: Self::SKIN_SMOOTH_STRENGTH.clamp(self.skin_smooth_strength),
            bokeh_strength: Self::BOKEH_STRENGTH.clamp(self.bokeh_strength),
            warmth: Self::WARMTH.clamp(self.warmth),
            grayscale: self.grayscale,
        }
    }

    /// Check every field against its valid range.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidParameter`] for the first field
    /// outside its range (or `NaN`).
    pub fn validate(&self) -> Result<(), PipelineError> {
        let checks = [
            ("brightness", self.brightness, Self::BRIGHTNESS),
            ("contrast", self.contrast, Self::CONTRAST),
            ("sharpen_strength", self.sharpen_strength, Self::SHARPEN_STRENGTH),
            ("vibrance", self.vibrance, Self::VIBRANCE),
            ("saturation", self.saturation, Self::SATURATION),
            (
                "skin_smooth_strength",
                self.skin_smooth_strength,
                Self::SKIN_SMOOTH_STRENGTH,
            ),
            ("bokeh_strength", self.bokeh_strength, Self::BOKEH_STRENGTH),
            ("warmth", self.warmth, Self::WARMTH),
        ];
        for (name, value, range) in checks {
            if !range.contains(value) {
                return Err(PipelineError::InvalidParameter {
                    name: name.to_owned(),
                    value,
                    min: range.min,
                    max: range.max,
                });
            }
        }

        if self.blur_radius > Self::MAX_BLUR_RADIUS {
            #[allow(clippy::cast_precision_loss)]
            let (value, max) = (self.blur_radius as f32, Self::MAX_BLUR_RADIUS as f32);
            return Err(PipelineError::InvalidParameter {
                name: "blur_radius".to_owned(),
                value,
                min: 0.0,
                max,
            });
        }

        Ok(())
    }
}

impl Default for FilterParameters {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// Errors that can occur while loading, filtering, or exporting images.
///
/// Uses custom `Serialize`/`Deserialize` because `image::ImageError`
/// does not implement serde traits. The `ImageDecode` variant is
/// serialized as its `Display` string.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Failed to decode the input image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// Failed to encode the image for export.
    #[error("failed to encode image: {0}")]
    ImageEncode(String),

    /// There is no image to operate on (empty bytes or no image loaded).
    #[error("no image data")]
    EmptyInput,

    /// A filter parameter lies outside its documented range.
    #[error("invalid parameter {name}: {value} is outside [{min}, {max}]")]
    InvalidParameter {
        /// Parameter field name.
        name: String,
        /// The rejected value.
        value: f32,
        /// Inclusive lower bound.
        min: f32,
        /// Inclusive upper bound.
        max: f32,
    },

    /// The export file extension does not name a supported format.
    #[error("unsupported image format: {0:?}")]
    UnsupportedFormat(String),
}

/// Serde-compatible proxy for `PipelineError`.
///
/// A deserialized `ImageDecode` cannot reconstruct the original typed
/// `image::ImageError`, so it comes back as an
/// [`image::error::DecodingError`] carrying the message.
#[derive(Serialize, Deserialize)]
enum PipelineErrorProxy {
    ImageDecode(String),
    ImageEncode(String),
    EmptyInput,
    InvalidParameter {
        name: String,
        value: f32,
        min: f32,
        max: f32,
    },
    UnsupportedFormat(String),
}

impl Serialize for PipelineError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let proxy = match self {
            Self::ImageDecode(e) => PipelineErrorProxy::ImageDecode(e.to_string()),
            Self::ImageEncode(s) => PipelineErrorProxy::ImageEncode(s.clone()),
            Self::EmptyInput => PipelineErrorProxy::EmptyInput,
            Self::InvalidParameter {
                name,
                value,
                min,
                max,
            } => PipelineErrorProxy::InvalidParameter {
                name: name.clone(),
                value: *value,
                min: *min,
                max: *max,
            },
            Self::UnsupportedFormat(s) => PipelineErrorProxy::UnsupportedFormat(s.clone()),
        };
        proxy.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PipelineError {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let proxy = PipelineErrorProxy::deserialize(deserializer)?;
        Ok(match proxy {
            PipelineErrorProxy::ImageDecode(msg) => {
                Self::ImageDecode(image::ImageError::Decoding(
                    image::error::DecodingError::new(
                        image::error::ImageFormatHint::Unknown,
                        msg,
                    ),
                ))
            }
            PipelineErrorProxy::ImageEncode(s) => Self::ImageEncode(s),
            PipelineErrorProxy::EmptyInput => Self::EmptyInput,
            PipelineErrorProxy::InvalidParameter {
                name,
                value,
                min,
                max,
            } => Self::InvalidParameter {
                name,
                value,
                min,
                max,
            },
            PipelineErrorProxy::UnsupportedFormat(s) => Self::UnsupportedFormat(s),
        })
    }
}
