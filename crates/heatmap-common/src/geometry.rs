//! Point and size types used across the rendering pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{HeatmapError, HeatmapResult};

/// A WGS84 coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub lat: f64,
    pub lon: f64,
}

impl GeoCoordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Whether latitude is within [-90, 90] and longitude within [-180, 180].
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// A position in a view's point space (origin top-left).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for PixelPoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Requested raster size in points, before the device scale factor is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutputSize {
    pub width: f64,
    pub height: f64,
}

impl OutputSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Device pixel dimensions for a given scale factor.
    ///
    /// Each side is rounded to the nearest pixel and is at least one pixel.
    pub fn device_pixels(&self, scale: f64) -> HeatmapResult<(usize, usize)> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(HeatmapError::invalid_parameter(
                "scale",
                format!("must be a positive number, got {}", scale),
            ));
        }
        if !self.width.is_finite() || !self.height.is_finite() {
            return Err(HeatmapError::invalid_parameter(
                "output_size",
                "dimensions must be finite",
            ));
        }

        let width = (self.width * scale).round();
        let height = (self.height * scale).round();
        if width < 1.0 || height < 1.0 {
            return Err(HeatmapError::invalid_parameter(
                "output_size",
                format!("{}x{} at scale {} is empty", self.width, self.height, scale),
            ));
        }
        Ok((width as usize, height as usize))
    }
}
