//! One-shot effects applied on top of the current display image.
//!
//! Effects are not part of [`FilterParameters`](crate::FilterParameters):
//! they act once on whatever is displayed and are lost on the next
//! re-render from the base image.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bokeh::bokeh;
use crate::color::vibrance_saturation;
use crate::landscape::{LandscapeSettings, landscape_enhance};
use crate::smooth::skin_smoothing;
use crate::tone::skin_tone_warmth;
use crate::types::{FilterParameters, RgbImage};

/// A single transient effect and its strength.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// Bilateral smoothing, strength in `[0, 100]`.
    SkinSmoothing(f32),
    /// Background blur around a sharp centre, strength in `[0, 100]`.
    Bokeh(f32),
    /// Warm or cool tint, warmth in `[-50, 50]`.
    Warmth(f32),
    /// Saturation scale plus selective vibrance.
    VibranceSaturation {
        /// Boost for under-saturated pixels.
        vibrance: f32,
        /// Uniform saturation scale.
        saturation: f32,
    },
    /// The outdoor scene preset.
    Landscape(LandscapeSettings),
}

impl Effect {
    /// The landscape preset with its default settings.
    #[must_use]
    pub fn landscape() -> Self {
        Self::Landscape(LandscapeSettings::default())
    }

    /// The same effect with every strength clamped into the range of the
    /// matching slider in [`FilterParameters`]. NaN maps to the range
    /// minimum.
    #[must_use]
    pub fn clamped(&self) -> Self {
        match *self {
            Self::SkinSmoothing(strength) => {
                Self::SkinSmoothing(FilterParameters::SKIN_SMOOTH_STRENGTH.clamp(strength))
            }
            Self::Bokeh(strength) => Self::Bokeh(FilterParameters::BOKEH_STRENGTH.clamp(strength)),
            Self::Warmth(warmth) => Self::Warmth(FilterParameters::WARMTH.clamp(warmth)),
            Self::VibranceSaturation {
                vibrance,
                saturation,
            } => Self::VibranceSaturation {
                vibrance: FilterParameters::VIBRANCE.clamp(vibrance),
                saturation: FilterParameters::SATURATION.clamp(saturation),
            },
            Self::Landscape(ref settings) => Self::Landscape(settings.clamped()),
        }
    }

    /// Apply the effect, returning a new image of the same size.
    ///
    /// Strengths outside their slider range are clamped first (see
    /// [`clamped`](Self::clamped)).
    #[must_use = "returns the image with the effect applied"]
    pub fn apply(&self, image: &RgbImage) -> RgbImage {
        match self.clamped() {
            Self::SkinSmoothing(strength) => skin_smoothing(image, strength),
            Self::Bokeh(strength) => bokeh(image, strength),
            Self::Warmth(warmth) => skin_tone_warmth(image, warmth),
            Self::VibranceSaturation {
                vibrance,
                saturation,
            } => vibrance_saturation(image, vibrance, saturation),
            Self::Landscape(settings) => landscape_enhance(image, &settings),
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SkinSmoothing(s) => write!(f, "skin smoothing ({s})"),
            Self::Bokeh(s) => write!(f, "bokeh ({s})"),
            Self::Warmth(w) => write!(f, "warmth ({w})"),
            Self::VibranceSaturation {
                vibrance,
                saturation,
            } => write!(f, "vibrance {vibrance} / saturation {saturation}"),
            Self::Landscape(_) => f.write_str("landscape"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn portrait() -> RgbImage {
        RgbImage::from_fn(16, 16, |x, y| {
            if (x + 2 * y) % 4 == 0 {
                image::Rgb([200, 150, 130])
            } else {
                image::Rgb([190, 140, 120])
            }
        })
    }

    #[test]
    fn effects_delegate_to_filters() {
        let img = portrait();
        assert_eq!(Effect::SkinSmoothing(40.0).apply(&img), skin_smoothing(&img, 40.0));
        assert_eq!(Effect::Bokeh(30.0).apply(&img), bokeh(&img, 30.0));
        assert_eq!(Effect::Warmth(-20.0).apply(&img), skin_tone_warmth(&img, -20.0));
        assert_eq!(
            Effect::VibranceSaturation {
                vibrance: 50.0,
                saturation: -10.0
            }
            .apply(&img),
            vibrance_saturation(&img, 50.0, -10.0)
        );
        assert_eq!(
            Effect::landscape().apply(&img),
            landscape_enhance(&img, &LandscapeSettings::default())
        );
    }

    #[test]
    fn zero_strength_effects_are_identity() {
        let img = portrait();
        for effect in [
            Effect::SkinSmoothing(0.0),
            Effect::Bokeh(0.0),
            Effect::Warmth(0.0),
            Effect::VibranceSaturation {
                vibrance: 0.0,
                saturation: 0.0,
            },
        ] {
            assert_eq!(effect.apply(&img), img, "{effect} changed the image");
        }
    }

    #[test]
    fn out_of_range_strengths_clamp_to_slider_limits() {
        let img = portrait();
        assert_eq!(Effect::Warmth(500.0).apply(&img), Effect::Warmth(50.0).apply(&img));
        assert_eq!(Effect::Warmth(-80.0).apply(&img), Effect::Warmth(-50.0).apply(&img));
        assert_eq!(
            Effect::VibranceSaturation {
                vibrance: 1000.0,
                saturation: -300.0
            }
            .apply(&img),
            vibrance_saturation(&img, 100.0, -100.0)
        );
        assert_eq!(Effect::Bokeh(400.0).apply(&img), bokeh(&img, 100.0));
        assert_eq!(Effect::SkinSmoothing(-5.0).apply(&img), img);
    }

    #[test]
    fn clamped_leaves_in_range_effects_alone() {
        let effect = Effect::VibranceSaturation {
            vibrance: 40.0,
            saturation: -25.0,
        };
        assert_eq!(effect.clamped(), effect);
        assert_eq!(Effect::Warmth(f32::NAN).clamped(), Effect::Warmth(-50.0));

        let landscape = Effect::Landscape(LandscapeSettings {
            vibrance: 250.0,
            sharpen_strength: 90.0,
            ..LandscapeSettings::default()
        });
        assert_eq!(
            landscape.clamped(),
            Effect::Landscape(LandscapeSettings {
                vibrance: 100.0,
                sharpen_strength: 20.0,
                ..LandscapeSettings::default()
            })
        );
    }

    #[test]
    fn effect_serde_round_trip() {
        let effect = Effect::Landscape(LandscapeSettings {
            detail_strength: 0.0,
            ..LandscapeSettings::default()
        });
        let json = serde_json::to_string(&effect).unwrap();
        let back: Effect = serde_json::from_str(&json).unwrap();
        assert_eq!(back, effect);
    }
}
