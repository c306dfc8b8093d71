//! Editing session: the loaded image and everything derived from it.
//!
//! A session keeps three images:
//!
//! - **original**: exactly what was loaded, never modified.
//! - **base**: the original plus any flips. Flips are the only edits
//!   that change it; reset restores it from the original.
//! - **display**: what the user sees, always re-rendered from the base
//!   with the current parameters after every edit (except one-shot
//!   effects, which act on the display directly until the next edit).
//!
//! Every method on an empty session returns
//! [`PipelineError::EmptyInput`] and logs a warning.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::codec::{self, ExportFormat};
use crate::effect::Effect;
use crate::flip;
use crate::pipeline::render;
use crate::resize::fit_to_bounds;
use crate::types::{Dimensions, FilterParameters, PipelineError, RgbImage};

/// State of a loaded image.
#[derive(Debug, Clone, PartialEq)]
struct Loaded {
    original: RgbImage,
    base: RgbImage,
    display: RgbImage,
    parameters: FilterParameters,
}

impl Loaded {
    fn rerender(&mut self) {
        self.display = render(&self.base, &self.parameters);
    }
}

/// A single-image editing session.
///
/// Serializable via a proxy that stores each image as a
/// `(width, height, raw_rgb_bytes)` tuple.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    loaded: Option<Loaded>,
}

impl Session {
    /// A session with no image loaded.
    #[must_use]
    pub const fn new() -> Self {
        Self { loaded: None }
    }

    /// Whether an image is loaded.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    fn loaded(&self, operation: &str) -> Result<&Loaded, PipelineError> {
        self.loaded.as_ref().ok_or_else(|| {
            warn!(operation, "no image loaded");
            PipelineError::EmptyInput
        })
    }

    fn loaded_mut(&mut self, operation: &str) -> Result<&mut Loaded, PipelineError> {
        self.loaded.as_mut().ok_or_else(|| {
            warn!(operation, "no image loaded");
            PipelineError::EmptyInput
        })
    }

    /// Start editing `image`: it becomes the original, the base and the
    /// display, and all parameters reset to neutral.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::EmptyInput`] for a zero-sized image; the
    /// previous session state is kept.
    pub fn load(&mut self, image: RgbImage) -> Result<(), PipelineError> {
        if image.width() == 0 || image.height() == 0 {
            warn!("refusing to load an empty image");
            return Err(PipelineError::EmptyInput);
        }
        debug!(width = image.width(), height = image.height(), "load");
        self.loaded = Some(Loaded {
            base: image.clone(),
            display: image.clone(),
            original: image,
            parameters: FilterParameters::NEUTRAL,
        });
        Ok(())
    }

    /// Drop all edits: base and display return to the original and the
    /// parameters to neutral.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::EmptyInput`] if nothing is loaded.
    pub fn reset(&mut self) -> Result<(), PipelineError> {
        let loaded = self.loaded_mut("reset")?;
        debug!("reset");
        loaded.base = loaded.original.clone();
        loaded.display = loaded.original.clone();
        loaded.parameters = FilterParameters::NEUTRAL;
        Ok(())
    }

    /// Mirror the base image left-to-right and re-render.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::EmptyInput`] if nothing is loaded.
    pub fn flip_horizontal(&mut self) -> Result<(), PipelineError> {
        let loaded = self.loaded_mut("flip_horizontal")?;
        debug!("flip horizontal");
        loaded.base = flip::flip_horizontal(&loaded.base);
        loaded.rerender();
        Ok(())
    }

    /// Mirror the base image top-to-bottom and re-render.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::EmptyInput`] if nothing is loaded.
    pub fn flip_vertical(&mut self) -> Result<(), PipelineError> {
        let loaded = self.loaded_mut("flip_vertical")?;
        debug!("flip vertical");
        loaded.base = flip::flip_vertical(&loaded.base);
        loaded.rerender();
        Ok(())
    }

    /// Flip the grayscale flag and re-render. Returns the new flag.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::EmptyInput`] if nothing is loaded.
    pub fn toggle_grayscale(&mut self) -> Result<bool, PipelineError> {
        let loaded = self.loaded_mut("toggle_grayscale")?;
        loaded.parameters.grayscale = !loaded.parameters.grayscale;
        debug!(grayscale = loaded.parameters.grayscale, "toggle grayscale");
        loaded.rerender();
        Ok(loaded.parameters.grayscale)
    }

    /// Store `params` (clamped into range) and re-render.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::EmptyInput`] if nothing is loaded.
    pub fn set_parameters(&mut self, params: FilterParameters) -> Result<(), PipelineError> {
        let loaded = self.loaded_mut("set_parameters")?;
        loaded.parameters = params.clamped();
        debug!(parameters = ?loaded.parameters, "set parameters");
        loaded.rerender();
        Ok(())
    }

    /// Apply a one-shot effect to the current display image.
    ///
    /// The effect does not touch the base image or the parameters, so
    /// the next edit that re-renders discards it.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::EmptyInput`] if nothing is loaded.
    pub fn apply_effect(&mut self, effect: &Effect) -> Result<(), PipelineError> {
        let loaded = self.loaded_mut("apply_effect")?;
        debug!(%effect, "apply effect");
        loaded.display = effect.apply(&loaded.display);
        Ok(())
    }

    /// The image currently shown to the user.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::EmptyInput`] if nothing is loaded.
    pub fn display(&self) -> Result<&RgbImage, PipelineError> {
        self.loaded("display").map(|l| &l.display)
    }

    /// The original image with flips applied.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::EmptyInput`] if nothing is loaded.
    pub fn base(&self) -> Result<&RgbImage, PipelineError> {
        self.loaded("base").map(|l| &l.base)
    }

    /// The image exactly as loaded.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::EmptyInput`] if nothing is loaded.
    pub fn original(&self) -> Result<&RgbImage, PipelineError> {
        self.loaded("original").map(|l| &l.original)
    }

    /// The current (clamped) parameters.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::EmptyInput`] if nothing is loaded.
    pub fn parameters(&self) -> Result<FilterParameters, PipelineError> {
        self.loaded("parameters").map(|l| l.parameters)
    }

    /// Dimensions of the display image.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::EmptyInput`] if nothing is loaded.
    pub fn dimensions(&self) -> Result<Dimensions, PipelineError> {
        self.loaded("dimensions").map(|l| Dimensions::of(&l.display))
    }

    /// The display image shrunk to fit `max_width x max_height`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::EmptyInput`] if nothing is loaded.
    pub fn preview(&self, max_width: u32, max_height: u32) -> Result<RgbImage, PipelineError> {
        let loaded = self.loaded("preview")?;
        Ok(fit_to_bounds(&loaded.display, max_width, max_height))
    }

    /// Encode the display image for saving.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::EmptyInput`] if nothing is loaded, or
    /// [`PipelineError::ImageEncode`] if encoding fails.
    pub fn export(&self, format: ExportFormat) -> Result<Vec<u8>, PipelineError> {
        let loaded = self.loaded("export")?;
        debug!(%format, "export");
        codec::encode(&loaded.display, format)
    }
}

// ───────────────────────── serde proxy ─────────────────────────

/// `(width, height, raw_rgb_bytes)`.
type RawImage = (u32, u32, Vec<u8>);

fn to_raw(image: &RgbImage) -> RawImage {
    (image.width(), image.height(), image.as_raw().clone())
}

fn from_raw<E: serde::de::Error>((width, height, data): RawImage) -> Result<RgbImage, E> {
    RgbImage::from_raw(width, height, data).ok_or_else(|| {
        E::custom(format!(
            "raw image data does not match {width}x{height} RGB dimensions"
        ))
    })
}

#[derive(Serialize, Deserialize)]
struct LoadedProxy {
    original: RawImage,
    base: RawImage,
    display: RawImage,
    parameters: FilterParameters,
}

#[derive(Serialize, Deserialize)]
struct SessionProxy {
    loaded: Option<LoadedProxy>,
}

impl Serialize for Session {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let proxy = SessionProxy {
            loaded: self.loaded.as_ref().map(|l| LoadedProxy {
                original: to_raw(&l.original),
                base: to_raw(&l.base),
                display: to_raw(&l.display),
                parameters: l.parameters,
            }),
        };
        proxy.serialize(serializer)
    }
}

/// Parameters are clamped on the way in, the same as
/// [`Session::set_parameters`]; the stored images are taken as they are.
impl<'de> Deserialize<'de> for Session {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let proxy = SessionProxy::deserialize(deserializer)?;
        let loaded = match proxy.loaded {
            Some(l) => Some(Loaded {
                original: from_raw(l.original)?,
                base: from_raw(l.base)?,
                display: from_raw(l.display)?,
                parameters: l.parameters.clamped(),
            }),
            None => None,
        };
        Ok(Self { loaded })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    fn photo() -> RgbImage {
        RgbImage::from_fn(12, 8, |x, y| {
            if x < 4 {
                image::Rgb([200, 40, 40])
            } else if y < 4 {
                image::Rgb([40, 200, 40])
            } else {
                image::Rgb([40, 40, 200])
            }
        })
    }

    fn loaded_session() -> Session {
        let mut session = Session::new();
        session.load(photo()).unwrap();
        session
    }

    #[test]
    fn empty_session_operations_return_empty_input() {
        let mut session = Session::new();
        assert!(!session.is_loaded());
        assert!(matches!(session.reset(), Err(PipelineError::EmptyInput)));
        assert!(matches!(session.flip_horizontal(), Err(PipelineError::EmptyInput)));
        assert!(matches!(session.flip_vertical(), Err(PipelineError::EmptyInput)));
        assert!(matches!(session.toggle_grayscale(), Err(PipelineError::EmptyInput)));
        assert!(matches!(
            session.set_parameters(FilterParameters::default()),
            Err(PipelineError::EmptyInput)
        ));
        assert!(matches!(
            session.apply_effect(&Effect::Bokeh(50.0)),
            Err(PipelineError::EmptyInput)
        ));
        assert!(matches!(session.display(), Err(PipelineError::EmptyInput)));
        assert!(matches!(session.base(), Err(PipelineError::EmptyInput)));
        assert!(matches!(session.original(), Err(PipelineError::EmptyInput)));
        assert!(matches!(session.parameters(), Err(PipelineError::EmptyInput)));
        assert!(matches!(session.dimensions(), Err(PipelineError::EmptyInput)));
        assert!(matches!(session.preview(10, 10), Err(PipelineError::EmptyInput)));
        assert!(matches!(
            session.export(ExportFormat::Png),
            Err(PipelineError::EmptyInput)
        ));
    }

    #[test]
    fn load_sets_all_three_images() {
        let session = loaded_session();
        assert_eq!(session.original().unwrap(), &photo());
        assert_eq!(session.base().unwrap(), &photo());
        assert_eq!(session.display().unwrap(), &photo());
        assert!(session.parameters().unwrap().is_neutral());
    }

    #[test]
    fn load_rejects_empty_image_and_keeps_state() {
        let mut session = loaded_session();
        assert!(matches!(
            session.load(RgbImage::new(0, 5)),
            Err(PipelineError::EmptyInput)
        ));
        assert_eq!(session.original().unwrap(), &photo());
    }

    #[test]
    fn load_resets_parameters() {
        let mut session = loaded_session();
        session
            .set_parameters(FilterParameters {
                brightness: 40.0,
                ..FilterParameters::default()
            })
            .unwrap();
        session.load(photo()).unwrap();
        assert!(session.parameters().unwrap().is_neutral());
        assert_eq!(session.display().unwrap(), &photo());
    }

    #[test]
    fn set_parameters_stores_clamped_values() {
        let mut session = loaded_session();
        session
            .set_parameters(FilterParameters {
                brightness: 1000.0,
                ..FilterParameters::default()
            })
            .unwrap();
        let stored = session.parameters().unwrap();
        assert!((stored.brightness - 100.0).abs() < f32::EPSILON);
        assert_eq!(session.display().unwrap(), &render(&photo(), &stored));
    }

    #[test]
    fn flips_persist_across_rerenders() {
        let mut session = loaded_session();
        session.flip_horizontal().unwrap();
        session
            .set_parameters(FilterParameters {
                contrast: 10.0,
                ..FilterParameters::default()
            })
            .unwrap();
        let flipped = flip::flip_horizontal(&photo());
        assert_eq!(session.base().unwrap(), &flipped);
        assert_eq!(
            session.display().unwrap(),
            &render(&flipped, &session.parameters().unwrap())
        );
        assert_eq!(session.original().unwrap(), &photo());
    }

    #[test]
    fn effects_do_not_survive_rerender() {
        let mut session = loaded_session();
        session.apply_effect(&Effect::Warmth(40.0)).unwrap();
        assert_ne!(session.display().unwrap(), &photo());
        assert_eq!(session.base().unwrap(), &photo());

        session.set_parameters(FilterParameters::default()).unwrap();
        assert_eq!(session.display().unwrap(), &photo());
    }

    #[test]
    fn effects_stack_on_display() {
        let mut session = loaded_session();
        session.apply_effect(&Effect::Warmth(20.0)).unwrap();
        session.apply_effect(&Effect::Warmth(20.0)).unwrap();
        let twice = Effect::Warmth(20.0).apply(&Effect::Warmth(20.0).apply(&photo()));
        assert_eq!(session.display().unwrap(), &twice);
    }

    #[test]
    fn toggle_grayscale_flips_flag_and_rerenders() {
        let mut session = loaded_session();
        assert!(session.toggle_grayscale().unwrap());
        assert!(
            session
                .display()
                .unwrap()
                .pixels()
                .all(|p| p.0[0] == p.0[1] && p.0[1] == p.0[2])
        );
        assert!(!session.toggle_grayscale().unwrap());
        assert_eq!(session.display().unwrap(), &photo());
    }

    #[test]
    fn reset_restores_original() {
        let mut session = loaded_session();
        session.flip_vertical().unwrap();
        session.toggle_grayscale().unwrap();
        session.apply_effect(&Effect::Bokeh(70.0)).unwrap();
        session.reset().unwrap();
        assert_eq!(session.base().unwrap(), &photo());
        assert_eq!(session.display().unwrap(), &photo());
        assert!(session.parameters().unwrap().is_neutral());
    }

    #[test]
    fn preview_fits_bounds() {
        let session = loaded_session();
        let preview = session.preview(6, 6).unwrap();
        assert_eq!(preview.dimensions(), (6, 4));
        assert_eq!(
            session.dimensions().unwrap(),
            Dimensions {
                width: 12,
                height: 8
            }
        );
    }

    #[test]
    fn export_encodes_display() {
        let mut session = loaded_session();
        session.flip_vertical().unwrap();
        let bytes = session.export(ExportFormat::Png).unwrap();
        assert_eq!(
            codec::decode(&bytes).unwrap(),
            flip::flip_vertical(&photo())
        );
    }

    #[test]
    fn serde_round_trip_preserves_state() {
        let mut session = loaded_session();
        session.flip_horizontal().unwrap();
        session
            .set_parameters(FilterParameters {
                warmth: 15.0,
                ..FilterParameters::default()
            })
            .unwrap();
        let json = serde_json::to_string(&session).unwrap();
        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
    }

    #[test]
    fn serde_round_trip_of_empty_session() {
        let json = serde_json::to_string(&Session::new()).unwrap();
        let back: Session = serde_json::from_str(&json).unwrap();
        assert!(!back.is_loaded());
    }

    #[test]
    fn deserialize_clamps_out_of_range_parameters() {
        let mut value = serde_json::to_value(loaded_session()).unwrap();
        let params = &mut value["loaded"]["parameters"];
        params["brightness"] = serde_json::json!(400.0);
        params["warmth"] = serde_json::json!(-90.0);
        params["blur_radius"] = serde_json::json!(500);

        let back: Session = serde_json::from_value(value).unwrap();
        let stored = back.parameters().unwrap();
        assert!((stored.brightness - 100.0).abs() < f32::EPSILON);
        assert!((stored.warmth + 50.0).abs() < f32::EPSILON);
        assert_eq!(stored.blur_radius, FilterParameters::MAX_BLUR_RADIUS);
        assert_eq!(stored, stored.clamped());
    }

    #[test]
    fn deserialize_rejects_mismatched_raw_data() {
        let json = r#"{"loaded":{"original":[2,2,[1,2,3]],"base":[2,2,[1,2,3]],"display":[2,2,[1,2,3]],"parameters":{}}}"#;
        let err = serde_json::from_str::<Session>(json).unwrap_err();
        assert!(err.to_string().contains("2x2"), "unexpected error: {err}");
    }
}
