//! Common types and utilities shared across the heatmap crates.

pub mod bbox;
pub mod error;
pub mod geometry;

pub use bbox::{BoundingBox, ViewRect};
pub use error::{HeatmapError, HeatmapResult};
pub use geometry::{GeoCoordinate, OutputSize, PixelPoint};
