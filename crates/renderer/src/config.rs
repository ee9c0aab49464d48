//! Per-call render configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use heatmap_common::{HeatmapError, HeatmapResult, OutputSize};

use crate::gradient::ColorRamp;
use crate::grouping::GroupingParams;
use crate::style::RampConfig;
use crate::weights::BalanceParams;

/// Options for one render call. Every field has a default, so a config file
/// only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Heat intensity; scales the footprint radius of every point
    pub boost: f64,
    pub weights_adjustment_enabled: bool,
    pub grouping_enabled: bool,
    /// Device pixels per point
    pub scale: f64,
    /// Raster size in points. Defaults to the size of the rendered rect.
    pub output_size: Option<OutputSize>,
    /// Density mapped to the top of the ramp, in raw weight units. Defaults to
    /// the field maximum.
    pub density_ceiling: Option<f32>,
    /// Largest RGBA buffer the overlay path will hand to a host
    pub max_image_bytes: Option<usize>,
    pub balance: BalanceParams,
    pub grouping: GroupingParams,
    pub ramp: Option<RampConfig>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            boost: 1.0,
            weights_adjustment_enabled: false,
            grouping_enabled: true,
            scale: 1.0,
            output_size: None,
            density_ceiling: None,
            max_image_bytes: None,
            balance: BalanceParams::default(),
            grouping: GroupingParams::default(),
            ramp: None,
        }
    }
}

impl RenderConfig {
    pub fn with_boost(boost: f64) -> Self {
        Self {
            boost,
            ..Self::default()
        }
    }

    pub fn weights_adjustment(mut self, enabled: bool) -> Self {
        self.weights_adjustment_enabled = enabled;
        self
    }

    pub fn grouping(mut self, enabled: bool) -> Self {
        self.grouping_enabled = enabled;
        self
    }

    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn output_size(mut self, size: OutputSize) -> Self {
        self.output_size = Some(size);
        self
    }

    pub fn max_image_bytes(mut self, limit: usize) -> Self {
        self.max_image_bytes = Some(limit);
        self
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> HeatmapResult<Self> {
        Ok(serde_json::from_str(json_str)?)
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> HeatmapResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Check scalar options. Does not build the ramp.
    pub fn validate(&self) -> HeatmapResult<()> {
        if !self.boost.is_finite() || self.boost <= 0.0 {
            return Err(HeatmapError::invalid_parameter(
                "boost",
                format!("must be a positive number, got {}", self.boost),
            ));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(HeatmapError::invalid_parameter(
                "scale",
                format!("must be a positive number, got {}", self.scale),
            ));
        }
        if let Some(ceiling) = self.density_ceiling {
            if !ceiling.is_finite() || ceiling <= 0.0 {
                return Err(HeatmapError::invalid_parameter(
                    "density_ceiling",
                    format!("must be a positive number, got {}", ceiling),
                ));
            }
        }
        self.balance.validate()?;
        self.grouping.validate()?;
        Ok(())
    }

    /// The configured ramp, or the built-in heat ramp.
    pub fn color_ramp(&self) -> HeatmapResult<ColorRamp> {
        match &self.ramp {
            Some(ramp) => ramp.to_ramp(),
            None => Ok(ColorRamp::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.boost, 1.0);
        assert!(!config.weights_adjustment_enabled);
        assert!(config.grouping_enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = RenderConfig::from_json(r#"{ "boost": 2.5, "grouping": { "merge_distance": 4.0 } }"#)
            .unwrap();
        assert_eq!(config.boost, 2.5);
        assert!(config.grouping_enabled);
        assert_eq!(config.grouping.merge_distance, 4.0);
        assert_eq!(config.grouping.peak_removal_distance, 20.0);
    }

    #[test]
    fn test_validate_rejects_bad_boost() {
        for boost in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = RenderConfig::with_boost(boost).validate().unwrap_err();
            assert_eq!(err.code(), "InvalidParameter");
        }
    }

    #[test]
    fn test_bad_json_is_config_error() {
        let err = RenderConfig::from_json("{ boost: }").unwrap_err();
        assert_eq!(err.code(), "ConfigError");
    }
}
