//! The map-view seam and a self-contained Web Mercator view.

use serde::{Deserialize, Serialize};

use heatmap_common::{BoundingBox, GeoCoordinate, OutputSize, PixelPoint, ViewRect};

use crate::mercator::{WebMercator, DEFAULT_TILE_SIZE, MAX_LATITUDE};

/// What the renderer needs from a host map widget.
///
/// Any binding (native map view, web map, static tile renderer) can
/// implement this; the renderer only projects coordinates through it.
pub trait MapView {
    /// Visible frame in the view's point space (origin top-left).
    fn visible_rect(&self) -> ViewRect;

    /// Position of a coordinate in the same point space as [`visible_rect`](Self::visible_rect).
    fn coordinate_to_pixel(&self, coordinate: GeoCoordinate) -> PixelPoint;

    /// Device pixels per point. Retina-style displays report 2.0 or 3.0.
    fn scale_factor(&self) -> f64 {
        1.0
    }

    /// Coordinate shown at the middle of the visible frame, when the view knows it.
    fn center_coordinate(&self) -> Option<GeoCoordinate> {
        None
    }
}

impl<T: MapView + ?Sized> MapView for &T {
    fn visible_rect(&self) -> ViewRect {
        (**self).visible_rect()
    }

    fn coordinate_to_pixel(&self, coordinate: GeoCoordinate) -> PixelPoint {
        (**self).coordinate_to_pixel(coordinate)
    }

    fn scale_factor(&self) -> f64 {
        (**self).scale_factor()
    }

    fn center_coordinate(&self) -> Option<GeoCoordinate> {
        (**self).center_coordinate()
    }
}

/// A Web Mercator viewport centered on a coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WebMercatorView {
    pub center: GeoCoordinate,
    pub zoom: f64,
    /// Frame size in points
    pub size: OutputSize,
    #[serde(default = "default_scale")]
    pub scale: f64,
}

fn default_scale() -> f64 {
    1.0
}

impl WebMercatorView {
    pub fn new(center: GeoCoordinate, zoom: f64, size: OutputSize) -> Self {
        Self {
            center,
            zoom,
            size,
            scale: 1.0,
        }
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Smallest-zoom view that still shows all of `bounds` (x = lon, y = lat).
    ///
    /// `padding` is a fraction of the frame kept free on every side.
    pub fn fitting(bounds: &BoundingBox, size: OutputSize, padding: f64) -> Self {
        let usable = 1.0 - 2.0 * padding.clamp(0.0, 0.45);
        let zoom_x = WebMercator::zoom_for_longitude_span(
            bounds.width(),
            size.width * usable,
            DEFAULT_TILE_SIZE,
        );

        // Latitude is not linear in Mercator, so measure the span at zoom 0.
        let unit = WebMercator::new(0.0);
        let north = bounds.max_y.clamp(-MAX_LATITUDE, MAX_LATITUDE);
        let south = bounds.min_y.clamp(-MAX_LATITUDE, MAX_LATITUDE);
        let (_, y_top) = unit.geo_to_world(GeoCoordinate::new(north, 0.0));
        let (_, y_bottom) = unit.geo_to_world(GeoCoordinate::new(south, 0.0));
        let span_y = (y_bottom - y_top).max(1e-9);
        let zoom_y = (size.height * usable / span_y).log2();

        // Center in projected space so the box is framed symmetrically.
        let (center_lon, _) = bounds.center();
        let center_lat = unit.world_to_geo(0.0, (y_top + y_bottom) / 2.0).lat;

        Self::new(
            GeoCoordinate::new(center_lat, center_lon),
            zoom_x.min(zoom_y),
            size,
        )
    }

    fn projection(&self) -> WebMercator {
        WebMercator::new(self.zoom)
    }

    /// Inverse of [`MapView::coordinate_to_pixel`].
    pub fn pixel_to_coordinate(&self, pixel: PixelPoint) -> GeoCoordinate {
        let proj = self.projection();
        let (cx, cy) = proj.geo_to_world(self.center);
        proj.world_to_geo(
            cx + pixel.x - self.size.width / 2.0,
            cy + pixel.y - self.size.height / 2.0,
        )
    }
}

impl MapView for WebMercatorView {
    fn visible_rect(&self) -> ViewRect {
        ViewRect::with_size(self.size.width, self.size.height)
    }

    fn coordinate_to_pixel(&self, coordinate: GeoCoordinate) -> PixelPoint {
        let proj = self.projection();
        let world = proj.world_size();
        let (cx, cy) = proj.geo_to_world(self.center);
        let (x, y) = proj.geo_to_world(coordinate);

        // Take the world copy closest to the center so the antimeridian is seamless.
        let mut dx = x - cx;
        if dx > world / 2.0 {
            dx -= world;
        } else if dx < -world / 2.0 {
            dx += world;
        }

        PixelPoint::new(
            dx + self.size.width / 2.0,
            y - cy + self.size.height / 2.0,
        )
    }

    fn scale_factor(&self) -> f64 {
        self.scale
    }

    fn center_coordinate(&self) -> Option<GeoCoordinate> {
        Some(self.center)
    }
}
