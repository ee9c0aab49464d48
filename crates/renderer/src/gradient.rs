//! Color ramp mapping from density to RGBA.

use rayon::prelude::*;

use heatmap_common::{HeatmapError, HeatmapResult};

use crate::density::DensityField;

/// Number of entries in a precomputed ramp lookup table.
pub const LUT_SIZE: usize = 256;

/// Color value in RGBA format (straight alpha)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn transparent() -> Self {
        Self { r: 0, g: 0, b: 0, a: 0 }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Linear color interpolation
pub fn interpolate_color(color1: Color, color2: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let t_inv = 1.0 - t;
    let mix = |a: u8, b: u8| ((a as f32 * t_inv) + (b as f32 * t)).round() as u8;

    Color::new(
        mix(color1.r, color2.r),
        mix(color1.g, color2.g),
        mix(color1.b, color2.b),
        mix(color1.a, color2.a),
    )
}

/// A gradient control point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    /// Position along the ramp in [0, 1]
    pub position: f32,
    pub color: Color,
}

impl ColorStop {
    pub const fn new(position: f32, color: Color) -> Self {
        Self { position, color }
    }
}

/// Transparent blue through green and yellow to opaque red.
pub const HEAT_STOPS: [ColorStop; 5] = [
    ColorStop::new(0.00, Color::new(0, 0, 255, 0)),
    ColorStop::new(0.20, Color::new(0, 0, 255, 102)),
    ColorStop::new(0.45, Color::new(0, 255, 0, 160)),
    ColorStop::new(0.70, Color::new(255, 255, 0, 210)),
    ColorStop::new(1.00, Color::new(255, 0, 0, 255)),
];

/// Ordered gradient used to turn a density ratio into a color.
///
/// Invariants enforced at construction:
/// - at least two stops, positions finite and within [0, 1]
/// - positions sorted ascending
/// - alpha never decreases along the ramp, so denser never means more transparent
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRamp {
    stops: Vec<ColorStop>,
}

impl Default for ColorRamp {
    fn default() -> Self {
        Self {
            stops: HEAT_STOPS.to_vec(),
        }
    }
}

impl ColorRamp {
    pub fn new(mut stops: Vec<ColorStop>) -> HeatmapResult<Self> {
        if stops.len() < 2 {
            return Err(HeatmapError::InvalidColorRamp(format!(
                "need at least 2 stops, got {}",
                stops.len()
            )));
        }
        if let Some(bad) = stops
            .iter()
            .find(|s| !s.position.is_finite() || !(0.0..=1.0).contains(&s.position))
        {
            return Err(HeatmapError::InvalidColorRamp(format!(
                "stop position {} is outside [0, 1]",
                bad.position
            )));
        }

        if stops.windows(2).any(|w| w[0].position > w[1].position) {
            tracing::warn!("Color ramp stops were not sorted by position, sorting them");
            // Stable sort keeps the declared order of coincident stops.
            stops.sort_by(|a, b| a.position.total_cmp(&b.position));
        }

        if stops.windows(2).any(|w| w[1].color.a < w[0].color.a) {
            return Err(HeatmapError::InvalidColorRamp(
                "alpha must not decrease along the ramp".to_string(),
            ));
        }

        Ok(Self { stops })
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Color at `ratio`, clamped to the first and last stop.
    pub fn sample(&self, ratio: f32) -> Color {
        let first = self.stops[0];
        let last = self.stops[self.stops.len() - 1];
        if ratio.is_nan() || ratio <= first.position {
            return first.color;
        }
        if ratio >= last.position {
            return last.color;
        }

        // First stop strictly above ratio; the one before brackets from below.
        let high = self.stops.partition_point(|s| s.position <= ratio);
        let lo = self.stops[high - 1];
        let hi = self.stops[high];
        let span = hi.position - lo.position;
        let t = if span <= f32::EPSILON {
            1.0
        } else {
            (ratio - lo.position) / span
        };
        interpolate_color(lo.color, hi.color, t)
    }

    /// Precompute `LUT_SIZE` evenly spaced samples.
    pub fn lookup_table(&self) -> Vec<Color> {
        (0..LUT_SIZE)
            .map(|i| self.sample(i as f32 / (LUT_SIZE - 1) as f32))
            .collect()
    }
}

/// Lookup-table index for a density value, or `None` when the pixel stays transparent.
#[inline]
pub fn ramp_index(density: f32, ceiling: f32) -> Option<usize> {
    if density <= 0.0 || ceiling <= 0.0 || !density.is_finite() {
        return None;
    }
    let ratio = (density / ceiling).min(1.0);
    Some((ratio * (LUT_SIZE - 1) as f32).round() as usize)
}

/// Render a density field into straight RGBA pixels (4 bytes per pixel).
///
/// `ceiling` fixes the density that maps to the top of the ramp; when
/// absent the field's own maximum is used. A zero ceiling yields a fully
/// transparent image.
pub fn colorize(field: &DensityField, ramp: &ColorRamp, ceiling: Option<f32>) -> Vec<u8> {
    let width = field.width();
    let mut pixels = vec![0u8; field.len() * 4];
    let ceiling = ceiling.unwrap_or_else(|| field.max_value());
    if ceiling <= 0.0 || width == 0 {
        return pixels;
    }

    let lut = ramp.lookup_table();

    pixels
        .par_chunks_mut(width * 4)
        .zip(field.values().par_chunks(width))
        .for_each(|(row_pixels, row_density)| {
            for (pixel, &density) in row_pixels.chunks_exact_mut(4).zip(row_density) {
                if let Some(idx) = ramp_index(density, ceiling) {
                    pixel.copy_from_slice(&lut[idx].to_array());
                }
            }
        });

    pixels
}
