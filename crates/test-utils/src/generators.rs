//! Deterministic point generators.
//!
//! Every generator takes a seed, so a failing test reproduces exactly.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use heatmap_common::{GeoCoordinate, PixelPoint, ViewRect};

/// Points spread uniformly over `rect`.
///
/// # Example
///
/// ```
/// use heatmap_common::ViewRect;
/// use test_utils::uniform_points;
///
/// let rect = ViewRect::with_size(100.0, 50.0);
/// let points = uniform_points(&rect, 20, 7);
/// assert_eq!(points.len(), 20);
/// assert!(points.iter().all(|p| rect.contains_point(p.x, p.y)));
/// ```
pub fn uniform_points(rect: &ViewRect, count: usize, seed: u64) -> Vec<PixelPoint> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            PixelPoint::new(
                rect.x + rng.gen::<f64>() * rect.width,
                rect.y + rng.gen::<f64>() * rect.height,
            )
        })
        .collect()
}

/// Points scattered around `centers` with roughly `spread` pixels of jitter.
///
/// Points are assigned to centers round-robin.
pub fn clustered_points(
    centers: &[PixelPoint],
    per_cluster: usize,
    spread: f64,
    seed: u64,
) -> Vec<PixelPoint> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut points = Vec::with_capacity(centers.len() * per_cluster);
    for _ in 0..per_cluster {
        for center in centers {
            // Sum of two uniforms: peaked at the center, bounded by spread.
            let dx = (rng.gen::<f64>() + rng.gen::<f64>() - 1.0) * spread;
            let dy = (rng.gen::<f64>() + rng.gen::<f64>() - 1.0) * spread;
            points.push(PixelPoint::new(center.x + dx, center.y + dy));
        }
    }
    points
}

/// Weights in `[min, max)`.
pub fn random_weights(count: usize, min: f64, max: f64, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count).map(|_| rng.gen_range(min..max)).collect()
}

/// Coordinates scattered around `center` within `radius_deg` degrees on each axis.
pub fn scattered_coordinates(
    center: GeoCoordinate,
    count: usize,
    radius_deg: f64,
    seed: u64,
) -> Vec<GeoCoordinate> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            GeoCoordinate::new(
                (center.lat + rng.gen_range(-radius_deg..radius_deg)).clamp(-85.0, 85.0),
                center.lon + rng.gen_range(-radius_deg..radius_deg),
            )
        })
        .collect()
}
