use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::color::Argb;
use crate::error::ConfigError;
use crate::tool::{ToolProperties, ToolRegistry};

/// Engine settings. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Extra room around the drawable bounds where a gesture may still
    /// start, in density-independent units
    pub drawing_area_margin: f32,
    pub pixels_per_point: f32,
    pub background_color: Argb,
    pub anti_alias: bool,
    pub tools: Vec<ToolProperties>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            drawing_area_margin: 40.0,
            pixels_per_point: 1.0,
            background_color: Argb::WHITE,
            anti_alias: true,
            tools: ToolRegistry::with_defaults().all().to_vec(),
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    /// Margin in physical pixels
    pub fn margin_px(&self) -> f32 {
        self.drawing_area_margin * self.pixels_per_point
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.pixels_per_point.is_finite() && self.pixels_per_point > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "pixels_per_point must be positive, got {}",
                self.pixels_per_point
            )));
        }
        if !(self.drawing_area_margin.is_finite() && self.drawing_area_margin >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "drawing_area_margin must not be negative, got {}",
                self.drawing_area_margin
            )));
        }
        if let Some(bad) = self.tools.iter().find(|t| t.stroke_width.is_nan() || t.stroke_width < 0.0) {
            return Err(ConfigError::Invalid(format!(
                "{} stroke_width must not be negative",
                bad.shape_type
            )));
        }
        Ok(())
    }
}
