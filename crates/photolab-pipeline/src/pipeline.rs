//! Deterministic re-render of the display image from the base image.
//!
//! Rendering always starts from the base image and runs a fixed,
//! ordered list of stages. A stage whose parameter sits at its neutral
//! value is skipped entirely, so the all-neutral parameter set renders
//! an exact copy of the base.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::blur::gaussian_blur;
use crate::bokeh::bokeh;
use crate::color::vibrance_saturation;
use crate::diagnostics::{Clock, RenderDiagnostics, StageDiagnostics};
use crate::grayscale::grayscale;
use crate::sharpen::sharpen;
use crate::smooth::skin_smoothing;
use crate::tone::{brightness_contrast, skin_tone_warmth};
use crate::types::{Dimensions, FilterParameters, RgbImage};

/// One step of the render pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Contrast around mid-gray, then a flat brightness offset.
    BrightnessContrast,
    /// 3x3 sharpening.
    Sharpen,
    /// Gaussian blur with kernel size `2 * blur_radius + 1`.
    Blur,
    /// Luminance, widened back to three channels.
    Grayscale,
    /// Uniform saturation scale plus selective vibrance.
    VibranceSaturation,
    /// Red/yellow or blue tint.
    Warmth,
    /// Bilateral smoothing.
    SkinSmoothing,
    /// Elliptical background blur.
    Bokeh,
}

impl Stage {
    /// Every stage in the order the pipeline runs them.
    pub const ALL: [Self; 8] = [
        Self::BrightnessContrast,
        Self::Sharpen,
        Self::Blur,
        Self::Grayscale,
        Self::VibranceSaturation,
        Self::Warmth,
        Self::SkinSmoothing,
        Self::Bokeh,
    ];

    /// Whether this stage runs for `params`.
    ///
    /// Brightness/contrast always runs; it is an identity copy when
    /// both values are zero.
    #[must_use]
    pub fn is_active(self, params: &FilterParameters) -> bool {
        match self {
            Self::BrightnessContrast => true,
            Self::Sharpen => params.sharpen_strength > 0.0,
            Self::Blur => params.blur_radius > 0,
            Self::Grayscale => params.grayscale,
            Self::VibranceSaturation => params.vibrance != 0.0 || params.saturation != 0.0,
            Self::Warmth => params.warmth != 0.0,
            Self::SkinSmoothing => params.skin_smooth_strength > 0.0,
            Self::Bokeh => params.bokeh_strength > 0.0,
        }
    }

    /// Run this stage on `image` regardless of whether it is active.
    #[must_use = "returns the filtered image"]
    pub fn apply(self, image: &RgbImage, params: &FilterParameters) -> RgbImage {
        match self {
            Self::BrightnessContrast => {
                brightness_contrast(image, params.brightness, params.contrast)
            }
            Self::Sharpen => sharpen(image, params.sharpen_strength),
            Self::Blur => gaussian_blur(image, blur_kernel_size(params.blur_radius)),
            Self::Grayscale => grayscale(image),
            Self::VibranceSaturation => {
                vibrance_saturation(image, params.vibrance, params.saturation)
            }
            Self::Warmth => skin_tone_warmth(image, params.warmth),
            Self::SkinSmoothing => skin_smoothing(image, params.skin_smooth_strength),
            Self::Bokeh => bokeh(image, params.bokeh_strength),
        }
    }

    /// Short human-readable name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::BrightnessContrast => "Brightness/Contrast",
            Self::Sharpen => "Sharpen",
            Self::Blur => "Blur",
            Self::Grayscale => "Grayscale",
            Self::VibranceSaturation => "Vibrance/Saturation",
            Self::Warmth => "Warmth",
            Self::SkinSmoothing => "Skin Smoothing",
            Self::Bokeh => "Bokeh",
        }
    }

    /// The parameter values this stage reads, formatted for reports.
    #[must_use]
    pub fn details(self, params: &FilterParameters) -> String {
        match self {
            Self::BrightnessContrast => format!(
                "brightness={:.1} contrast={:.1}",
                params.brightness, params.contrast
            ),
            Self::Sharpen => format!("strength={:.1}", params.sharpen_strength),
            Self::Blur => format!(
                "radius={} ksize={}",
                params.blur_radius,
                blur_kernel_size(params.blur_radius)
            ),
            Self::Grayscale => String::new(),
            Self::VibranceSaturation => format!(
                "vibrance={:.1} saturation={:.1}",
                params.vibrance, params.saturation
            ),
            Self::Warmth => format!("warmth={:.1}", params.warmth),
            Self::SkinSmoothing => format!("strength={:.1}", params.skin_smooth_strength),
            Self::Bokeh => format!("strength={:.1}", params.bokeh_strength),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Kernel size the blur stage uses for a given radius.
#[must_use]
pub const fn blur_kernel_size(radius: u32) -> u32 {
    radius.saturating_mul(2).saturating_add(1)
}

/// The stages a render will execute, with the clamped parameters they
/// will read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderPlan {
    params: FilterParameters,
    stages: Vec<Stage>,
}

impl RenderPlan {
    /// Clamp `params` and list the active stages in execution order.
    #[must_use]
    pub fn for_parameters(params: &FilterParameters) -> Self {
        let params = params.clamped();
        let stages = Stage::ALL
            .into_iter()
            .filter(|stage| stage.is_active(&params))
            .collect();
        Self { params, stages }
    }

    /// Stages that will run, in order.
    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// The clamped parameters the stages read.
    #[must_use]
    pub const fn parameters(&self) -> &FilterParameters {
        &self.params
    }

    /// Execute the plan on `base`.
    #[must_use = "returns the rendered image"]
    pub fn execute(&self, base: &RgbImage) -> RgbImage {
        let mut image = base.clone();
        for &stage in &self.stages {
            debug!(%stage, details = %stage.details(&self.params), "render stage");
            image = stage.apply(&image, &self.params);
        }
        image
    }
}

/// Render the display image for `params` from `base`.
///
/// Parameters are clamped into range first. The result always has the
/// dimensions of `base`.
#[must_use = "returns the rendered image"]
pub fn render(base: &RgbImage, params: &FilterParameters) -> RgbImage {
    RenderPlan::for_parameters(params).execute(base)
}

/// [`render`] while timing every executed stage with `clock`.
#[must_use = "returns the rendered image and its diagnostics"]
pub fn render_with_diagnostics<C: Clock>(
    base: &RgbImage,
    params: &FilterParameters,
    clock: &C,
) -> (RgbImage, RenderDiagnostics) {
    let total_start = clock.now();
    let plan = RenderPlan::for_parameters(params);

    let mut image = base.clone();
    let mut stages = Vec::with_capacity(plan.stages().len());
    for &stage in plan.stages() {
        let details = stage.details(plan.parameters());
        debug!(%stage, %details, "render stage");
        let start = clock.now();
        image = stage.apply(&image, plan.parameters());
        stages.push(StageDiagnostics {
            stage,
            duration: clock.elapsed(&start),
            details,
        });
    }

    let diagnostics = RenderDiagnostics {
        dimensions: Dimensions::of(base),
        parameters: *plan.parameters(),
        stages,
        total_duration: clock.elapsed(&total_start),
    };
    (image, diagnostics)
}
