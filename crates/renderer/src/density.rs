//! Density accumulation: splatting weighted points into a scalar grid.

use crate::projector::HeatPoint;

/// Base footprint radius in points at `boost = 1.0`.
pub const BASE_RADIUS: f64 = 50.0;

/// Upper bound on the footprint radius in device pixels, whatever the boost.
pub const MAX_KERNEL_RADIUS: usize = 1024;

/// Row-major grid of non-negative densities, one per device pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityField {
    width: usize,
    height: usize,
    values: Vec<f32>,
}

impl DensityField {
    /// Zero-filled field.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            values: vec![0.0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub(crate) fn values_mut(&mut self) -> &mut [f32] {
        &mut self.values
    }

    /// Density at a pixel, or 0 outside the grid.
    pub fn get(&self, x: usize, y: usize) -> f32 {
        if x < self.width && y < self.height {
            self.values[y * self.width + x]
        } else {
            0.0
        }
    }

    /// Largest density in the field (0 for an empty field).
    pub fn max_value(&self) -> f32 {
        self.values.iter().copied().fold(0.0, f32::max)
    }

    /// Sum of all densities.
    pub fn total(&self) -> f64 {
        self.values.iter().map(|&v| v as f64).sum()
    }

    /// Position of the first maximal pixel.
    pub fn argmax(&self) -> Option<(usize, usize)> {
        let max = self.max_value();
        if max <= 0.0 {
            return None;
        }
        self.values
            .iter()
            .position(|&v| v == max)
            .map(|idx| (idx % self.width, idx / self.width))
    }

    /// Add one point's cone footprint.
    ///
    /// The peak sits on the pixel containing the point and falls off
    /// linearly to zero at `radius`. Pixels outside the grid are skipped.
    pub fn splat(&mut self, point: &HeatPoint, radius: usize) {
        if point.weight <= 0.0 || radius == 0 {
            return;
        }

        let r = radius as i64;
        let cx = point.x.floor() as i64;
        let cy = point.y.floor() as i64;
        let from_x = (cx - r).max(0);
        let to_x = (cx + r).min(self.width as i64 - 1);
        let from_y = (cy - r).max(0);
        let to_y = (cy + r).min(self.height as i64 - 1);
        if from_x > to_x || from_y > to_y {
            return;
        }

        let weight = point.weight as f32;
        let radius_f = radius as f32;
        for y in from_y..=to_y {
            let dy = (y - cy) as f32;
            let row = y as usize * self.width;
            for x in from_x..=to_x {
                let dx = (x - cx) as f32;
                let falloff = radius_f - (dx * dx + dy * dy).sqrt();
                if falloff > 0.0 {
                    self.values[row + x as usize] += weight * falloff;
                }
            }
        }
    }
}

/// Footprint radius in device pixels for a boost and device scale.
///
/// Never below one pixel and never above the larger raster side or
/// [`MAX_KERNEL_RADIUS`]. Non-decreasing in `boost`.
pub fn kernel_radius(boost: f64, scale: f64, width: usize, height: usize) -> usize {
    let cap = width.max(height).min(MAX_KERNEL_RADIUS).max(1);
    let radius = (BASE_RADIUS * boost * scale).round();
    if !radius.is_finite() || radius >= cap as f64 {
        return cap;
    }
    (radius as usize).clamp(1, cap)
}

/// Whether a footprint of `reach` pixels around the point can touch the raster.
pub fn reaches_raster(point: &HeatPoint, reach: usize, width: usize, height: usize) -> bool {
    let reach = reach as f64;
    point.x >= -reach - 1.0
        && point.y >= -reach - 1.0
        && point.x < width as f64 + reach
        && point.y < height as f64 + reach
}

/// Accumulate every point into a fresh field. Overlapping footprints add up unclamped.
///
/// Points whose footprint plus `margin` cannot reach the raster are skipped.
/// Returns the field and the number of points that contributed.
pub fn accumulate(
    points: &[HeatPoint],
    width: usize,
    height: usize,
    radius: usize,
    margin: usize,
) -> (DensityField, usize) {
    let mut field = DensityField::new(width, height);
    let mut splatted = 0;
    for point in points {
        if point.weight > 0.0 && reaches_raster(point, radius + margin, width, height) {
            field.splat(point, radius);
            splatted += 1;
        }
    }
    (field, splatted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_radius_scales_with_boost() {
        assert_eq!(kernel_radius(1.0, 1.0, 400, 400), 50);
        assert_eq!(kernel_radius(0.5, 1.0, 400, 400), 25);
        assert_eq!(kernel_radius(1.0, 2.0, 400, 400), 100);
        assert_eq!(kernel_radius(0.001, 1.0, 400, 400), 1);
    }

    #[test]
    fn test_kernel_radius_is_capped() {
        assert_eq!(kernel_radius(100.0, 1.0, 300, 200), 300);
        assert_eq!(kernel_radius(1000.0, 1.0, 4000, 4000), MAX_KERNEL_RADIUS);
        assert_eq!(kernel_radius(f64::INFINITY, 1.0, 64, 64), 64);
    }

    #[test]
    fn test_splat_peak_at_point() {
        let mut field = DensityField::new(21, 21);
        field.splat(&HeatPoint::new(10.5, 10.5, 1.0), 5);
        assert_eq!(field.argmax(), Some((10, 10)));
        assert_eq!(field.get(10, 10), 5.0);
        assert_eq!(field.get(15, 10), 0.0);
        assert!(field.get(14, 10) > 0.0);
    }

    #[test]
    fn test_splat_clips_at_edges() {
        let mut field = DensityField::new(10, 10);
        field.splat(&HeatPoint::new(-2.0, 5.0, 1.0), 5);
        assert!(field.get(0, 5) > 0.0);
        assert_eq!(field.get(4, 5), 0.0);
    }

    #[test]
    fn test_overlapping_points_sum() {
        let mut single = DensityField::new(11, 11);
        single.splat(&HeatPoint::new(5.0, 5.0, 1.0), 4);

        let (double, splatted) = accumulate(
            &[HeatPoint::new(5.0, 5.0, 1.0), HeatPoint::new(5.0, 5.0, 1.0)],
            11,
            11,
            4,
            0,
        );
        assert_eq!(splatted, 2);
        assert_eq!(double.get(5, 5), 2.0 * single.get(5, 5));
    }

    #[test]
    fn test_far_points_are_skipped() {
        let (field, splatted) = accumulate(&[HeatPoint::new(500.0, 500.0, 1.0)], 10, 10, 5, 2);
        assert_eq!(splatted, 0);
        assert_eq!(field.max_value(), 0.0);
    }
}
