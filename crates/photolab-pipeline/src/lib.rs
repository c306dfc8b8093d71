//! photolab-pipeline: Pure photo filter library and render pipeline (sans-IO).
//!
//! Every filter takes an 8-bit RGB image and returns a new one of the
//! same size. The display image of an editing [`Session`] is re-rendered
//! from its base image on every edit through a fixed stage order:
//! brightness/contrast -> sharpen -> blur -> grayscale, followed by
//! vibrance/saturation -> warmth -> skin smoothing -> bokeh. Stages at
//! their neutral value are skipped.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! images and byte slices. All filesystem interaction lives in
//! `photolab-io`.

pub mod blur;
pub mod bokeh;
pub mod codec;
pub mod color;
pub mod diagnostics;
pub mod effect;
pub mod flip;
pub mod grayscale;
pub mod landscape;
pub mod pipeline;
mod raster;
pub mod resize;
pub mod session;
pub mod sharpen;
pub mod smooth;
pub mod tone;
pub mod types;

pub use codec::{ExportFormat, decode, encode};
pub use diagnostics::{Clock, RenderDiagnostics, StageDiagnostics};
pub use effect::Effect;
pub use landscape::LandscapeSettings;
pub use pipeline::{RenderPlan, Stage, render, render_with_diagnostics};
pub use raster::to_u8;
pub use resize::{ResampleFilter, fit_to_bounds};
pub use session::Session;
pub use types::{Dimensions, FilterParameters, GrayImage, ParameterRange, PipelineError, RgbImage};
