//! Color ramp configuration loaded from JSON.

use serde::{Deserialize, Serialize};

use heatmap_common::{HeatmapError, HeatmapResult};

use crate::gradient::{Color, ColorRamp, ColorStop};

/// A color ramp as written in configuration files.
///
/// ```json
/// { "stops": [ { "position": 0.0, "color": "#0000FF00" },
///              { "position": 1.0, "color": "#FF0000" } ] }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RampConfig {
    pub stops: Vec<RampStopConfig>,
}

/// One stop of a configured ramp.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RampStopConfig {
    pub position: f32,
    /// "#RRGGBB" (opaque) or "#RRGGBBAA"
    pub color: String,
}

impl RampConfig {
    /// Load ramp configuration from JSON string
    pub fn from_json(json_str: &str) -> HeatmapResult<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| HeatmapError::InvalidColorRamp(format!("JSON error: {}", e)))
    }

    /// Parse colors and build a validated [`ColorRamp`].
    pub fn to_ramp(&self) -> HeatmapResult<ColorRamp> {
        let stops = self
            .stops
            .iter()
            .map(|stop| {
                hex_to_rgba(&stop.color)
                    .map(|color| ColorStop::new(stop.position, color))
                    .ok_or_else(|| {
                        HeatmapError::InvalidColorRamp(format!(
                            "invalid color '{}' at position {}",
                            stop.color, stop.position
                        ))
                    })
            })
            .collect::<HeatmapResult<Vec<_>>>()?;
        ColorRamp::new(stops)
    }
}

/// Parse a hex color string to RGBA.
///
/// Accepts 6 digits (alpha 255) or 8 digits, with or without a leading `#`.
pub fn hex_to_rgba(hex: &str) -> Option<Color> {
    let hex = hex.trim().trim_start_matches('#');
    if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
        return None;
    }

    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let r = channel(0)?;
    let g = channel(2)?;
    let b = channel(4)?;
    let a = if hex.len() == 8 { channel(6)? } else { 255 };

    Some(Color::new(r, g, b, a))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_rgba() {
        assert_eq!(hex_to_rgba("#FF0000"), Some(Color::new(255, 0, 0, 255)));
        assert_eq!(hex_to_rgba("00ff0080"), Some(Color::new(0, 255, 0, 128)));
        assert_eq!(hex_to_rgba("#FF00"), None);
        assert_eq!(hex_to_rgba("#GG0000"), None);
        assert_eq!(hex_to_rgba("#ÿÿÿ"), None);
    }

    #[test]
    fn test_from_json() {
        let json = r##"{
            "stops": [
                { "position": 0.0, "color": "#00000000" },
                { "position": 1.0, "color": "#FFA500" }
            ]
        }"##;
        let config = RampConfig::from_json(json).unwrap();
        assert_eq!(config.stops.len(), 2);
        let ramp = config.to_ramp().unwrap();
        assert_eq!(ramp.sample(1.0), Color::new(255, 165, 0, 255));
    }

    #[test]
    fn test_bad_color_is_ramp_error() {
        let config = RampConfig {
            stops: vec![
                RampStopConfig { position: 0.0, color: "#000000".to_string() },
                RampStopConfig { position: 1.0, color: "red".to_string() },
            ],
        };
        let err = config.to_ramp().unwrap_err();
        assert_eq!(err.code(), "InvalidColorRamp");
    }
}
