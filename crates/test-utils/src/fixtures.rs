//! Common test fixtures for heatmap tests.

use heatmap_common::{GeoCoordinate, OutputSize, ViewRect};

use crate::generators::scattered_coordinates;

/// Common view frames for testing.
pub mod views {
    use heatmap_common::ViewRect;

    /// Phone-sized portrait frame in points
    pub const PHONE: ViewRect = ViewRect {
        x: 0.0,
        y: 0.0,
        width: 320.0,
        height: 480.0,
    };

    /// A single 256 px map tile
    pub const TILE: ViewRect = ViewRect {
        x: 0.0,
        y: 0.0,
        width: 256.0,
        height: 256.0,
    };

    /// Small frame for fast pixel-level assertions
    pub const SMALL: ViewRect = ViewRect {
        x: 0.0,
        y: 0.0,
        width: 64.0,
        height: 64.0,
    };

    /// Frame whose origin is not at zero
    pub const OFFSET: ViewRect = ViewRect {
        x: 100.0,
        y: 50.0,
        width: 200.0,
        height: 100.0,
    };
}

/// Center of the mid-Atlantic earthquake demo region.
pub const QUAKE_REGION_CENTER: GeoCoordinate = GeoCoordinate {
    lat: 39.0,
    lon: -77.0,
};

/// Latitude and longitude span of the demo region, in degrees.
pub const QUAKE_REGION_SPAN: (f64, f64) = (10.0, 13.0);

/// Epicenters the quake sample clusters around, with a typical magnitude.
pub const QUAKE_EPICENTERS: [(f64, f64, f64); 5] = [
    (37.94, -77.93, 5.8),
    (40.71, -74.01, 2.4),
    (36.17, -81.11, 3.1),
    (42.36, -71.06, 2.0),
    (38.90, -77.04, 1.6),
];

/// A geographic point with an earthquake magnitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuakeRecord {
    pub location: GeoCoordinate,
    pub magnitude: f64,
}

/// Deterministic quake-like sample: `per_epicenter` events around each of
/// [`QUAKE_EPICENTERS`], magnitudes decreasing away from the main shock.
pub fn quake_sample(per_epicenter: usize) -> Vec<QuakeRecord> {
    QUAKE_EPICENTERS
        .iter()
        .enumerate()
        .flat_map(|(i, &(lat, lon, magnitude))| {
            scattered_coordinates(GeoCoordinate::new(lat, lon), per_epicenter, 0.6, i as u64)
                .into_iter()
                .enumerate()
                .map(move |(n, location)| QuakeRecord {
                    location,
                    magnitude: (magnitude - 0.1 * n as f64).max(0.5),
                })
        })
        .collect()
}

/// Split a quake sample into locations and weights, scaling magnitudes like the demo app.
pub fn quake_inputs(records: &[QuakeRecord], weight_scale: f64) -> (Vec<GeoCoordinate>, Vec<f64>) {
    records
        .iter()
        .map(|r| (r.location, r.magnitude * weight_scale))
        .unzip()
}

/// Output size matching a view frame.
pub fn size_of(rect: &ViewRect) -> OutputSize {
    OutputSize::new(rect.width, rect.height)
}
