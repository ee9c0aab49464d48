//! Rectangles describing the region a heatmap covers.

use serde::{Deserialize, Serialize};

use crate::error::{HeatmapError, HeatmapResult};

/// A rectangle in a screen-like coordinate space (origin top-left, y grows down).
///
/// This is the frame a map view reports for its visible area, and the
/// coordinate space planar input points are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewRect {
    /// Create a new rectangle from its origin and extent.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle anchored at the origin.
    pub fn with_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Parse an "x,y,width,height" string.
    pub fn from_csv_string(s: &str) -> Result<Self, BboxParseError> {
        let [x, y, width, height] = parse_four(s, "x,y,width,height")?;
        Ok(Self::new(x, y, width, height))
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// Center point of the rectangle.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check if a point is contained within this rectangle (max edges exclusive).
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.max_x() && y >= self.y && y < self.max_y()
    }

    /// Reject rectangles that cannot be rendered into.
    pub fn validate(&self) -> HeatmapResult<()> {
        let all_finite = [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(HeatmapError::InvalidRect(format!(
                "non-finite component in {:?}",
                self
            )));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(HeatmapError::InvalidRect(format!(
                "width and height must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// A planar or geographic bounding box with y growing upward.
///
/// For geographic data, x is longitude and y is latitude in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Parse a "minx,miny,maxx,maxy" string.
    pub fn from_csv_string(s: &str) -> Result<Self, BboxParseError> {
        let [min_x, min_y, max_x, max_y] = parse_four(s, "minx,miny,maxx,maxy")?;
        Ok(Self::new(min_x, min_y, max_x, max_y))
    }

    /// Smallest box containing every point, or `None` for an empty slice.
    pub fn enclosing(points: &[(f64, f64)]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let init = Self::new(first.0, first.1, first.0, first.1);
        Some(rest.iter().fold(init, |b, &(x, y)| {
            Self::new(b.min_x.min(x), b.min_y.min(y), b.max_x.max(x), b.max_y.max(y))
        }))
    }

    /// Width of the bounding box in coordinate units.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in coordinate units.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Center point of the box.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Reject boxes with no area.
    pub fn validate(&self) -> HeatmapResult<()> {
        let all_finite = [self.min_x, self.min_y, self.max_x, self.max_y]
            .iter()
            .all(|v| v.is_finite());
        if !all_finite || self.width() <= 0.0 || self.height() <= 0.0 {
            return Err(HeatmapError::InvalidRect(format!(
                "bounding box has no area: {:?}",
                self
            )));
        }
        Ok(())
    }
}

fn parse_four(s: &str, expected: &'static str) -> Result<[f64; 4], BboxParseError> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 4 {
        return Err(BboxParseError::InvalidFormat {
            input: s.to_string(),
            expected,
        });
    }

    let mut out = [0.0; 4];
    for (slot, part) in out.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|_| BboxParseError::InvalidNumber(part.to_string()))?;
    }
    Ok(out)
}

#[derive(Debug, thiserror::Error)]
pub enum BboxParseError {
    #[error("Invalid rectangle format: {input}. Expected '{expected}'")]
    InvalidFormat {
        input: String,
        expected: &'static str,
    },

    #[error("Invalid number in rectangle: {0}")]
    InvalidNumber(String),
}
