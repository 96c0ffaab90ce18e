//! Engine configuration.

use crate::error::{EngineError, EngineResult};
use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::style::{Rgba, StrokeStyle, StyleConfig};
use crate::surface::{SURFACE_HEIGHT, SURFACE_WIDTH};
use crate::viewport::{MAX_ZOOM, MIN_ZOOM, ZOOM_STEP};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for a [`CanvasSession`](crate::CanvasSession).
///
/// Every field has a default, so a partial JSON document is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Surface width in pixels. Only 800 is accepted; exports are always 800x600.
    pub surface_width: u32,
    /// Surface height in pixels.
    pub surface_height: u32,
    /// Background color as `#rrggbb`.
    pub background: String,
    pub min_zoom: f64,
    pub max_zoom: f64,
    /// Increment applied by zoom-in/zoom-out.
    pub zoom_step: f64,
    /// Maximum snapshots kept including the blank base; `None` for unbounded.
    pub history_limit: Option<usize>,
    /// Style selected when the session starts.
    pub default_style: StyleConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            surface_width: SURFACE_WIDTH,
            surface_height: SURFACE_HEIGHT,
            background: "#FFFFFF".to_string(),
            min_zoom: MIN_ZOOM,
            max_zoom: MAX_ZOOM,
            zoom_step: ZOOM_STEP,
            history_limit: Some(DEFAULT_HISTORY_LIMIT),
            default_style: StyleConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        log::debug!("Loading engine config from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> EngineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that the configuration describes a usable session.
    pub fn validate(&self) -> EngineResult<()> {
        let invalid = |msg: String| Err(EngineError::InvalidConfig(msg));

        if (self.surface_width, self.surface_height) != (SURFACE_WIDTH, SURFACE_HEIGHT) {
            return invalid(format!(
                "surface must be {}x{}, got {}x{}",
                SURFACE_WIDTH, SURFACE_HEIGHT, self.surface_width, self.surface_height
            ));
        }
        if !(self.min_zoom.is_finite() && self.min_zoom > 0.0) {
            return invalid(format!("min_zoom must be positive, got {}", self.min_zoom));
        }
        if !self.max_zoom.is_finite() || self.max_zoom < self.min_zoom {
            return invalid(format!(
                "max_zoom ({}) must be >= min_zoom ({})",
                self.max_zoom, self.min_zoom
            ));
        }
        if !(self.zoom_step.is_finite() && self.zoom_step > 0.0) {
            return invalid(format!("zoom_step must be positive, got {}", self.zoom_step));
        }
        if let Some(limit) = self.history_limit {
            if limit < 2 {
                return invalid(format!("history_limit must be at least 2, got {limit}"));
            }
        }
        Rgba::from_hex(&self.background)
            .map_err(|_| EngineError::InvalidConfig(format!("background: {}", self.background)))?;
        StrokeStyle::try_from(&self.default_style)
            .map_err(|e| EngineError::InvalidConfig(format!("default_style: {e}")))?;
        Ok(())
    }

    /// Background color. Falls back to white if the field does not parse.
    pub fn background_color(&self) -> Rgba {
        Rgba::from_hex(&self.background).unwrap_or(Rgba::WHITE)
    }
}
