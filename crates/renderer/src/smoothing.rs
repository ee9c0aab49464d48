//! Separable box blur over a density field.
//!
//! Two box passes approximate a Gaussian closely enough for heat maps and
//! cost O(width * height) regardless of the window size. Edges are zero
//! padded, so energy only leaves the field where it spills past the border.

use rayon::prelude::*;

use crate::density::DensityField;

/// Number of box passes applied per axis.
pub const BLUR_PASSES: usize = 2;

/// Blur half-window for a footprint radius.
///
/// Grouping mode uses a narrower window to keep hotspots defined.
pub fn blur_radius(kernel_radius: usize, grouping: bool) -> usize {
    let divisor = if grouping { 8 } else { 4 };
    (kernel_radius / divisor).max(1)
}

/// Distance, in pixels, the blur can carry density away from its source.
pub fn blur_reach(half_window: usize) -> usize {
    half_window * BLUR_PASSES
}

/// Blur one line in place with a `2k + 1` window, treating out-of-range samples as zero.
fn blur_line(line: &mut [f32], k: usize, prefix: &mut Vec<f64>) {
    let n = line.len();
    if n == 0 {
        return;
    }
    prefix.clear();
    prefix.push(0.0);
    let mut acc = 0.0f64;
    for &v in line.iter() {
        acc += v as f64;
        prefix.push(acc);
    }

    let window = (2 * k + 1) as f64;
    for (i, out) in line.iter_mut().enumerate() {
        let lo = i.saturating_sub(k);
        let hi = (i + k + 1).min(n);
        // Clamp tiny negative residue from floating-point cancellation.
        *out = (((prefix[hi] - prefix[lo]) / window) as f32).max(0.0);
    }
}

fn blur_rows(values: &mut [f32], width: usize, k: usize) {
    values.par_chunks_mut(width).for_each_init(
        || Vec::with_capacity(width + 1),
        |prefix, row| blur_line(row, k, prefix),
    );
}

fn transpose(values: &[f32], width: usize, height: usize) -> Vec<f32> {
    let mut out = vec![0.0f32; values.len()];
    out.par_chunks_mut(height).enumerate().for_each(|(x, column)| {
        for (y, v) in column.iter_mut().enumerate() {
            *v = values[y * width + x];
        }
    });
    out
}

/// Apply [`BLUR_PASSES`] box blurs of half-window `k` along both axes.
pub fn box_blur(field: &mut DensityField, k: usize) {
    let (width, height) = (field.width(), field.height());
    if k == 0 || field.is_empty() {
        return;
    }

    for _ in 0..BLUR_PASSES {
        blur_rows(field.values_mut(), width, k);
    }

    let mut columns = transpose(field.values(), width, height);
    for _ in 0..BLUR_PASSES {
        blur_rows(&mut columns, height, k);
    }
    let restored = transpose(&columns, height, width);
    field.values_mut().copy_from_slice(&restored);
}

/// Smooth an accumulated field for the given footprint radius and mode.
pub fn smooth(field: &mut DensityField, kernel_radius: usize, grouping: bool) {
    let k = blur_radius(kernel_radius, grouping);
    tracing::debug!(
        width = field.width(),
        height = field.height(),
        half_window = k,
        grouping,
        "Smoothing density field"
    );
    box_blur(field, k);
}
