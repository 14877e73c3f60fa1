//! Composer configuration.
//!
//! Everything here is fixed for the lifetime of a [`crate::SnapshotComposer`].
//! Missing JSON fields take their defaults.

use std::path::Path;

use anyhow::Context as _;

use crate::capture::desaturate::DesaturationLimit;
use crate::capture::service::{CaptureOptions, MAX_SURFACE_SIDE, RenderMode};
use crate::foundation::core::Color;
use crate::foundation::error::{SnapshotError, SnapshotResult};
use crate::legend::flow::LegendMetrics;
use crate::markers::model::ActivationPointPolicy;

/// Marker colors used when the configured palette is empty.
pub const DEFAULT_PALETTE: [Color; 7] = [
    Color::rgb(0, 255, 255),
    Color::rgb(255, 0, 255),
    Color::rgb(0, 255, 0),
    Color::rgb(0, 0, 255),
    Color::rgb(255, 255, 0),
    Color::rgb(128, 0, 128),
    Color::rgb(255, 128, 0),
];

/// How the subject is captured.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Rendering strategy.
    pub mode: RenderMode,
    /// Desaturate the captured snapshot.
    pub desaturate: bool,
    /// Device pixels per point.
    pub scale: f64,
    /// Largest single-surface side, in points.
    pub max_tile_side: f64,
    /// Platform desaturation ceiling; `None` when the platform has none.
    pub desaturation_limit: Option<DesaturationLimit>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            mode: RenderMode::default(),
            desaturate: false,
            scale: 1.0,
            max_tile_side: MAX_SURFACE_SIDE,
            desaturation_limit: None,
        }
    }
}

impl CaptureConfig {
    /// Options for a single capture.
    pub fn options(&self) -> CaptureOptions {
        CaptureOptions {
            mode: self.mode,
            desaturate: self.desaturate,
            scale: self.scale,
            max_tile_side: self.max_tile_side,
            desaturation_limit: self.desaturation_limit,
        }
    }
}

/// Top-level composer configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Capture settings.
    pub capture: CaptureConfig,
    /// Marker colors, cycled by marker index. Empty selects [`DEFAULT_PALETTE`].
    pub palette: Vec<Color>,
    /// When activation-point indicators are drawn.
    pub activation_points: ActivationPointPolicy,
    /// Render the input-label section of legend entries.
    pub show_user_input_labels: bool,
    /// Legend spacing.
    pub legend: LegendMetrics,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            capture: CaptureConfig::default(),
            palette: Vec::new(),
            activation_points: ActivationPointPolicy::default(),
            show_user_input_labels: true,
            legend: LegendMetrics::default(),
        }
    }
}

impl SnapshotConfig {
    /// Parse a JSON config.
    pub fn from_json_str(json: &str) -> SnapshotResult<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| SnapshotError::validation(format!("invalid config json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse a JSON config file.
    pub fn from_json_path(path: &Path) -> SnapshotResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Reject values no capture or layout could honor.
    pub fn validate(&self) -> SnapshotResult<()> {
        let capture = &self.capture;
        if !capture.scale.is_finite() || capture.scale <= 0.0 {
            return Err(SnapshotError::validation("capture.scale must be finite and > 0"));
        }
        if !capture.max_tile_side.is_finite() || capture.max_tile_side <= 0.0 {
            return Err(SnapshotError::validation(
                "capture.max_tile_side must be finite and > 0",
            ));
        }
        let m = &self.legend;
        let spacing = [
            m.insets.x0,
            m.insets.y0,
            m.insets.x1,
            m.insets.y1,
            m.horizontal_spacing,
            m.vertical_spacing,
        ];
        if spacing.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(SnapshotError::validation(
                "legend insets and spacing must be finite and >= 0",
            ));
        }
        if !m.minimum_width.is_finite() || m.minimum_width <= 0.0 {
            return Err(SnapshotError::validation(
                "legend.minimum_width must be finite and > 0",
            ));
        }
        Ok(())
    }

    /// Effective palette; never empty.
    pub fn palette(&self) -> &[Color] {
        if self.palette.is_empty() {
            &DEFAULT_PALETTE
        } else {
            &self.palette
        }
    }

    /// Color of the marker at `index`.
    pub fn color_for(&self, index: usize) -> Color {
        let palette = self.palette();
        palette[index % palette.len()]
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
