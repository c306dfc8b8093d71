//! photolab-bench: CLI tool for filter parameter experimentation and diagnostics.
//!
//! Renders a single image file with configurable filter parameters,
//! printing per-stage timings. Useful for:
//!
//! - Measuring which stages dominate render time at a given image size
//! - Checking how a parameter set looks before wiring it into a UI
//! - Producing an edited file from the command line (`--output`)
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin photolab-bench -- [OPTIONS] <IMAGE_PATH>
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use photolab_pipeline::diagnostics::{Clock, RenderDiagnostics};
use photolab_pipeline::resize::{DEFAULT_MAX_HEIGHT, DEFAULT_MAX_WIDTH};
use photolab_pipeline::{Effect, FilterParameters, Session, Stage};
use photolab_pipeline::RgbImage;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Filter parameter experimentation and diagnostics for photolab.
///
/// Renders one image with the given parameters and prints per-stage
/// timing diagnostics.
#[derive(Parser)]
#[command(name = "photolab-bench", version)]
struct Cli {
    /// Path to the input image (PNG, JPEG, BMP).
    image_path: PathBuf,

    /// Brightness offset (-100 to 100).
    #[arg(long, default_value_t = FilterParameters::NEUTRAL.brightness, allow_negative_numbers = true)]
    brightness: f32,

    /// Contrast (-100 to 100).
    #[arg(long, default_value_t = FilterParameters::NEUTRAL.contrast, allow_negative_numbers = true)]
    contrast: f32,

    /// Sharpen strength (0 to 20).
    #[arg(long, default_value_t = FilterParameters::NEUTRAL.sharpen_strength)]
    sharpen: f32,

    /// Blur radius; kernel size is `2 * radius + 1` (0 to 30).
    #[arg(long, default_value_t = FilterParameters::NEUTRAL.blur_radius)]
    blur_radius: u32,

    /// Vibrance (-100 to 100).
    #[arg(long, default_value_t = FilterParameters::NEUTRAL.vibrance, allow_negative_numbers = true)]
    vibrance: f32,

    /// Saturation (-100 to 100).
    #[arg(long, default_value_t = FilterParameters::NEUTRAL.saturation, allow_negative_numbers = true)]
    saturation: f32,

    /// Skin smoothing strength (0 to 100).
    #[arg(long, default_value_t = FilterParameters::NEUTRAL.skin_smooth_strength)]
    skin_smooth: f32,

    /// Bokeh strength (0 to 100).
    #[arg(long, default_value_t = FilterParameters::NEUTRAL.bokeh_strength)]
    bokeh: f32,

    /// Warmth (-50 to 50).
    #[arg(long, default_value_t = FilterParameters::NEUTRAL.warmth, allow_negative_numbers = true)]
    warmth: f32,

    /// Convert to grayscale.
    #[arg(long)]
    grayscale: bool,

    /// Full parameter set as a JSON string.
    ///
    /// When provided, all other filter parameter flags are ignored.
    /// The JSON must be a valid `FilterParameters` serialization;
    /// missing fields take their neutral value.
    #[arg(long)]
    params_json: Option<String>,

    /// Mirror the image left-to-right before rendering.
    #[arg(long)]
    flip_horizontal: bool,

    /// Mirror the image top-to-bottom before rendering.
    #[arg(long)]
    flip_vertical: bool,

    /// One-shot effect applied to the rendered image.
    #[arg(long, value_enum, default_value_t = EffectArg::None)]
    effect: EffectArg,

    /// Shrink the output to fit `WIDTHxHEIGHT` (never upscales).
    #[arg(long, value_parser = parse_bounds)]
    preview: Option<(u32, u32)>,

    /// Write the edited image to this path (format from extension,
    /// `.jpg` appended when missing).
    #[arg(long)]
    output: Option<PathBuf>,

    /// Number of runs for averaging.
    #[arg(long, default_value_t = 1, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    runs: usize,

    /// Output diagnostics as JSON instead of human-readable report.
    #[arg(long)]
    json: bool,
}

/// One-shot effect selection.
#[derive(Clone, Copy, ValueEnum)]
enum EffectArg {
    /// No effect.
    None,
    /// Landscape preset: vibrance, sharpen, detail enhancement.
    Landscape,
}

impl EffectArg {
    fn to_effect(self) -> Option<Effect> {
        match self {
            Self::None => None,
            Self::Landscape => Some(Effect::landscape()),
        }
    }
}

/// Parse `WIDTHxHEIGHT`, e.g. `800x600`. Empty means the default
/// preview area.
fn parse_bounds(s: &str) -> Result<(u32, u32), String> {
    if s.is_empty() {
        return Ok((DEFAULT_MAX_WIDTH, DEFAULT_MAX_HEIGHT));
    }
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
    let w: u32 = w
        .trim()
        .parse()
        .map_err(|e| format!("invalid width {w:?}: {e}"))?;
    let h: u32 = h
        .trim()
        .parse()
        .map_err(|e| format!("invalid height {h:?}: {e}"))?;
    if w == 0 || h == 0 {
        return Err(format!("preview bounds must be positive, got {w}x{h}"));
    }
    Ok((w, h))
}

/// Build [`FilterParameters`] from CLI arguments.
///
/// If `--params-json` is provided, the JSON is parsed directly and all
/// individual parameter flags are ignored.  Otherwise, parameters are
/// assembled from the individual flags.
fn params_from_cli(cli: &Cli) -> Result<FilterParameters, String> {
    if let Some(ref json) = cli.params_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --params-json: {e}"));
    }

    Ok(FilterParameters {
        brightness: cli.brightness,
        contrast: cli.contrast,
        sharpen_strength: cli.sharpen,
        blur_radius: cli.blur_radius,
        vibrance: cli.vibrance,
        saturation: cli.saturation,
        skin_smooth_strength: cli.skin_smooth,
        bokeh_strength: cli.bokeh,
        warmth: cli.warmth,
        grayscale: cli.grayscale,
    })
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let params = match params_from_cli(&cli) {
        Ok(p) => p,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = params.validate() {
        warn!("{e}; rendering with the clamped value");
    }
    if !photolab_io::is_supported_image(&cli.image_path) {
        warn!(
            path = %cli.image_path.display(),
            "unrecognized extension; trying to decode anyway"
        );
    }

    let image = match photolab_io::load_image(&cli.image_path) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("Error loading {}: {e}", cli.image_path.display());
            return ExitCode::FAILURE;
        }
    };

    let mut session = Session::new();
    if let Err(e) = prepare_session(&mut session, image, &cli) {
        eprintln!("Error preparing image: {e}");
        return ExitCode::FAILURE;
    }
    let Ok(base) = session.base() else {
        eprintln!("Error: no image loaded");
        return ExitCode::FAILURE;
    };

    eprintln!("Image: {}", cli.image_path.display());
    eprintln!("Parameters: {:#?}", params.clamped());
    eprintln!("Runs: {}", cli.runs);
    eprintln!();

    let effect = cli.effect.to_effect();
    let mut all_diagnostics = Vec::with_capacity(cli.runs);
    let mut rendered = None;

    for run in 0..cli.runs {
        if cli.runs > 1 {
            eprintln!("--- Run {}/{} ---", run + 1, cli.runs);
        }

        let (mut image, diagnostics) =
            photolab_pipeline::render_with_diagnostics(base, &params, &StdClock);

        if let Some(ref effect) = effect {
            let start = StdClock.now();
            image = effect.apply(&image);
            eprintln!(
                "Effect {effect}: {:.3}ms",
                StdClock.elapsed(&start).as_secs_f64() * 1000.0
            );
        }

        if cli.json {
            match serde_json::to_string_pretty(&diagnostics) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("Error serializing diagnostics: {e}");
                    return ExitCode::FAILURE;
                }
            }
        } else {
            println!("{}", diagnostics.report());
        }

        all_diagnostics.push(diagnostics);
        if rendered.is_none() {
            rendered = Some(image);
        }

        if cli.runs > 1 {
            eprintln!();
        }
    }

    if cli.runs > 1 {
        print_multi_run_summary(&all_diagnostics);
    }

    let Some(image) = rendered.map(|image| apply_preview(image, cli.preview)) else {
        return ExitCode::SUCCESS;
    };
    if cli.preview.is_some() {
        eprintln!("Preview: {}x{}", image.width(), image.height());
    }

    if let Some(output) = cli.output.as_ref() {
        match photolab_io::save_image(&image, output) {
            Ok(path) => eprintln!("Output written to {}", path.display()),
            Err(e) => {
                eprintln!("Error writing {}: {e}", output.display());
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

/// Shrink the rendered image to the `--preview` bounds, if any.
fn apply_preview(image: RgbImage, bounds: Option<(u32, u32)>) -> RgbImage {
    let Some((max_w, max_h)) = bounds else {
        return image;
    };
    let preview = photolab_pipeline::fit_to_bounds(&image, max_w, max_h);
    debug!(
        width = preview.width(),
        height = preview.height(),
        "resized to preview bounds"
    );
    preview
}

/// Load `image` into `session` and apply the requested flips.
fn prepare_session(
    session: &mut Session,
    image: RgbImage,
    cli: &Cli,
) -> Result<(), photolab_pipeline::PipelineError> {
    session.load(image)?;
    if cli.flip_horizontal {
        session.flip_horizontal()?;
    }
    if cli.flip_vertical {
        session.flip_vertical()?;
    }
    Ok(())
}

/// [`Clock`] implementation backed by [`std::time::Instant`].
struct StdClock;

impl Clock for StdClock {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn elapsed(&self, since: &Instant) -> Duration {
        since.elapsed()
    }
}

/// Print aggregated statistics across multiple runs.
#[allow(clippy::cast_precision_loss)]
fn print_multi_run_summary(all_diagnostics: &[RenderDiagnostics]) {
    debug_assert!(!all_diagnostics.is_empty(), "no diagnostics to summarize");

    println!();
    println!(
        "Summary ({} runs)\n{}",
        all_diagnostics.len(),
        "=".repeat(60),
    );

    if all_diagnostics.is_empty() {
        println!("Warning: no diagnostics to summarize");
        return;
    }

    let durations: Vec<f64> = all_diagnostics
        .iter()
        .map(|d| d.total_duration.as_secs_f64() * 1000.0)
        .collect();

    let min = durations.iter().copied().reduce(f64::min).unwrap_or(0.0);
    let max = durations.iter().copied().reduce(f64::max).unwrap_or(0.0);
    let mean = durations.iter().sum::<f64>() / durations.len() as f64;

    println!("Total duration: min={min:.3}ms  mean={mean:.3}ms  max={max:.3}ms");

    // Per-stage means.
    println!();
    println!("{:<24} {:>12}", "Stage", "Mean (ms)");
    println!("{}", "-".repeat(40));

    for stage in Stage::ALL {
        let stage_durations: Vec<f64> = all_diagnostics
            .iter()
            .filter_map(|d| d.stage_duration(stage))
            .map(|dur| dur.as_secs_f64() * 1000.0)
            .collect();

        if stage_durations.is_empty() {
            continue;
        }

        let stage_mean = stage_durations.iter().sum::<f64>() / stage_durations.len() as f64;
        println!("{:<24} {stage_mean:>10.3}ms", stage.label());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_parse() {
        assert_eq!(parse_bounds("800x600"), Ok((800, 600)));
        assert_eq!(parse_bounds("1024X768"), Ok((1024, 768)));
        assert_eq!(parse_bounds(""), Ok((DEFAULT_MAX_WIDTH, DEFAULT_MAX_HEIGHT)));
        assert!(parse_bounds("800").is_err());
        assert!(parse_bounds("0x600").is_err());
        assert!(parse_bounds("wide x tall").is_err());
    }

    #[test]
    fn preview_shrinks_without_output() {
        let cli = Cli::parse_from(["photolab-bench", "in.png", "--preview", "800x600"]);
        assert!(cli.output.is_none());
        let image = apply_preview(RgbImage::new(1600, 600), cli.preview);
        assert_eq!(image.dimensions(), (800, 300));
    }

    #[test]
    fn no_preview_keeps_rendered_size() {
        let image = apply_preview(RgbImage::new(1600, 600), None);
        assert_eq!(image.dimensions(), (1600, 600));
    }

    #[test]
    fn flags_build_parameters() {
        let cli = Cli::parse_from([
            "photolab-bench",
            "in.png",
            "--brightness",
            "-20",
            "--blur-radius",
            "3",
            "--grayscale",
        ]);
        let params = params_from_cli(&cli);
        assert_eq!(
            params,
            Ok(FilterParameters {
                brightness: -20.0,
                blur_radius: 3,
                grayscale: true,
                ..FilterParameters::default()
            })
        );
    }

    #[test]
    fn json_overrides_flags() {
        let cli = Cli::parse_from([
            "photolab-bench",
            "in.png",
            "--brightness",
            "40",
            "--params-json",
            r#"{"warmth": 12.5}"#,
        ]);
        let params = params_from_cli(&cli);
        assert_eq!(
            params,
            Ok(FilterParameters {
                warmth: 12.5,
                ..FilterParameters::default()
            })
        );
    }

    #[test]
    fn bad_json_is_reported() {
        let cli = Cli::parse_from(["photolab-bench", "in.png", "--params-json", "{"]);
        assert!(params_from_cli(&cli).is_err());
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
