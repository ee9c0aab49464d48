//! Spherical Web Mercator (EPSG:3857) in world-pixel units.
//!
//! World pixel space follows the slippy-map convention:
//! - Origin at (-180°, ~85.05°), x grows east, y grows south
//! - At zoom `z` the world is `tile_size * 2^z` pixels wide and tall
//!
//! Latitudes beyond [`MAX_LATITUDE`] are clamped, since the projection
//! diverges at the poles.

use std::f64::consts::PI;

use heatmap_common::GeoCoordinate;

/// Latitude at which the Web Mercator world becomes square.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Standard web map tile edge in pixels.
pub const DEFAULT_TILE_SIZE: f64 = 256.0;

/// Web Mercator projection at a fixed (possibly fractional) zoom level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WebMercator {
    /// Zoom level; 0 shows the whole world in one tile
    pub zoom: f64,
    /// Tile edge in pixels
    pub tile_size: f64,
}

impl WebMercator {
    pub fn new(zoom: f64) -> Self {
        Self {
            zoom,
            tile_size: DEFAULT_TILE_SIZE,
        }
    }

    /// Width (and height) of the whole world in pixels at this zoom.
    pub fn world_size(&self) -> f64 {
        self.tile_size * 2f64.powf(self.zoom)
    }

    /// Project a coordinate to world pixels.
    pub fn geo_to_world(&self, coordinate: GeoCoordinate) -> (f64, f64) {
        let size = self.world_size();
        let lat = coordinate.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();

        let x = (coordinate.lon + 180.0) / 360.0 * size;
        let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * size;
        (x, y)
    }

    /// Inverse of [`geo_to_world`](Self::geo_to_world).
    pub fn world_to_geo(&self, x: f64, y: f64) -> GeoCoordinate {
        let size = self.world_size();
        let lon = x / size * 360.0 - 180.0;
        let n = PI * (1.0 - 2.0 * y / size);
        let lat = n.sinh().atan().to_degrees();
        GeoCoordinate::new(lat, lon)
    }

    /// Zoom level at which `span_pixels` world pixels cover `span_degrees` of longitude.
    pub fn zoom_for_longitude_span(span_degrees: f64, span_pixels: f64, tile_size: f64) -> f64 {
        let span = span_degrees.abs().max(1e-9);
        (span_pixels * 360.0 / (span * tile_size)).log2()
    }
}
