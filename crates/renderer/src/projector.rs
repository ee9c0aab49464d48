//! Point projection from source coordinates into device-pixel raster space.

use heatmap_common::{BoundingBox, GeoCoordinate, HeatmapError, HeatmapResult, PixelPoint, ViewRect};
use projection::MapView;

/// A weighted point in device-pixel space.
///
/// Positions may lie outside the raster; such points still diffuse into it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatPoint {
    pub x: f64,
    pub y: f64,
    pub weight: f64,
}

impl HeatPoint {
    pub fn new(x: f64, y: f64, weight: f64) -> Self {
        Self { x, y, weight }
    }
}

/// Affine map from a source region onto a `width` x `height` raster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointProjector {
    origin_x: f64,
    origin_y: f64,
    scale_x: f64,
    scale_y: f64,
}

impl PointProjector {
    /// Projector for points in a top-left-origin space such as a view frame.
    pub fn for_view_rect(rect: &ViewRect, width: usize, height: usize) -> Self {
        Self {
            origin_x: rect.x,
            origin_y: rect.y,
            scale_x: width as f64 / rect.width,
            scale_y: height as f64 / rect.height,
        }
    }

    /// Projector for points in a y-up space (planar maps, lon/lat boxes).
    ///
    /// The top edge of the box (`max_y`) lands on raster row 0.
    pub fn for_bounding_box(bbox: &BoundingBox, width: usize, height: usize) -> Self {
        Self {
            origin_x: bbox.min_x,
            origin_y: bbox.max_y,
            scale_x: width as f64 / bbox.width(),
            scale_y: -(height as f64) / bbox.height(),
        }
    }

    /// Device-pixel position of a source point.
    pub fn project(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (x - self.origin_x) * self.scale_x,
            (y - self.origin_y) * self.scale_y,
        )
    }

    /// Project a slice of points, pairing each with its weight.
    pub fn project_all(&self, points: &[PixelPoint], weights: &[f64]) -> Vec<HeatPoint> {
        points
            .iter()
            .zip(weights)
            .map(|(p, &w)| {
                let (x, y) = self.project(p.x, p.y);
                HeatPoint::new(x, y, w)
            })
            .collect()
    }
}

/// Convert geographic locations to view points through the host map view.
pub fn locations_to_view_points<V: MapView + ?Sized>(
    view: &V,
    locations: &[GeoCoordinate],
) -> Vec<PixelPoint> {
    locations
        .iter()
        .map(|&coordinate| view.coordinate_to_pixel(coordinate))
        .collect()
}

/// Reject points with a NaN or infinite coordinate.
pub fn validate_points(points: &[PixelPoint]) -> HeatmapResult<()> {
    match points
        .iter()
        .enumerate()
        .find(|(_, p)| !p.x.is_finite() || !p.y.is_finite())
    {
        Some((index, p)) => Err(HeatmapError::invalid_parameter(
            "points",
            format!("point {} has a non-finite coordinate ({}, {})", index, p.x, p.y),
        )),
        None => Ok(()),
    }
}
