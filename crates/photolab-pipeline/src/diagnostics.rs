//! Render diagnostics: per-stage timing for parameter experimentation.
//!
//! Timing goes through the [`Clock`] trait so this crate never touches
//! a platform clock itself; callers supply one (the bench binary backs
//! it with [`std::time::Instant`], tests use a fake).
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since `std::time::Duration` does not implement serde
//! traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::pipeline::Stage;
use crate::types::{Dimensions, FilterParameters};

/// Source of timestamps for diagnostics.
pub trait Clock {
    /// Opaque point in time.
    type Instant;

    /// The current instant.
    fn now(&self) -> Self::Instant;

    /// Time elapsed since `since`.
    fn elapsed(&self, since: &Self::Instant) -> Duration;
}

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Diagnostics collected from a single render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderDiagnostics {
    /// Size of the rendered image.
    pub dimensions: Dimensions,
    /// The clamped parameters the render used.
    pub parameters: FilterParameters,
    /// One entry per executed stage, in execution order. Skipped stages
    /// do not appear.
    pub stages: Vec<StageDiagnostics>,
    /// Total wall-clock duration of the render (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
}

/// Diagnostics for a single executed stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDiagnostics {
    /// Which stage ran.
    pub stage: Stage,
    /// Wall-clock duration of this stage (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// The parameter values the stage read.
    pub details: String,
}

impl RenderDiagnostics {
    /// Duration of `stage`, or `None` if it was skipped.
    #[must_use]
    pub fn stage_duration(&self, stage: Stage) -> Option<Duration> {
        self.stages
            .iter()
            .find(|s| s.stage == stage)
            .map(|s| s.duration)
    }

    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Render Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Image: {}x{} ({} pixels)",
            self.dimensions.width,
            self.dimensions.height,
            self.dimensions.pixel_count(),
        ));
        lines.push(format!(
            "Total duration: {:.3}ms",
            duration_ms(self.total_duration),
        ));
        lines.push(String::new());

        lines.push(format!(
            "{:<24} {:>10} {:>10}  {}",
            "Stage", "Duration", "% Total", "Details"
        ));
        lines.push("-".repeat(80));

        let total_ms = duration_ms(self.total_duration);
        for diag in &self.stages {
            let ms = duration_ms(diag.duration);
            let pct = if total_ms > 0.0 {
                ms / total_ms * 100.0
            } else {
                0.0
            };
            let name = diag.stage.label();
            let details = &diag.details;
            lines.push(format!("{name:<24} {ms:>8.3}ms {pct:>9.1}%  {details}"));
        }

        let skipped: Vec<&str> = Stage::ALL
            .iter()
            .filter(|stage| self.stage_duration(**stage).is_none())
            .map(|stage| stage.label())
            .collect();
        if !skipped.is_empty() {
            lines.push(String::new());
            lines.push(format!("Skipped: {}", skipped.join(", ")));
        }

        lines.join("\n")
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}
