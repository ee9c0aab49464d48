//! Weight validation, normalization and balancing.

use serde::{Deserialize, Serialize};

use heatmap_common::{HeatmapError, HeatmapResult};

/// Largest ratio between two balanced weights when both raw weights are at
/// least `sensitivity / (boost_to * BALANCED_RATIO_BOUND)` of the maximum
/// (0.1% with the defaults).
pub const BALANCED_RATIO_BOUND: f64 = 20.0;

/// Shape of the balancing curve applied when weight adjustment is enabled.
///
/// Weights up to `sensitivity` (a fraction of the maximum) are stretched
/// linearly up to `boost_to`; the rest are compressed linearly into
/// `[boost_to, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceParams {
    pub sensitivity: f64,
    pub boost_to: f64,
}

impl Default for BalanceParams {
    fn default() -> Self {
        Self {
            sensitivity: 0.01,
            boost_to: 0.5,
        }
    }
}

impl BalanceParams {
    pub fn validate(&self) -> HeatmapResult<()> {
        let in_unit = |v: f64| v.is_finite() && v > 0.0 && v < 1.0;
        if !in_unit(self.sensitivity) || !in_unit(self.boost_to) {
            return Err(HeatmapError::invalid_parameter(
                "balance",
                format!(
                    "sensitivity and boost_to must lie in (0, 1), got {} and {}",
                    self.sensitivity, self.boost_to
                ),
            ));
        }
        Ok(())
    }

    /// Balanced weight in (0, 1] for a raw weight in (0, max_weight].
    pub fn apply(&self, weight: f64, max_weight: f64) -> f64 {
        let sensitivity = self.sensitivity * max_weight;
        let boost_to = self.boost_to * max_weight;
        let adjusted = if weight <= sensitivity {
            weight * boost_to / sensitivity
        } else {
            boost_to + (weight - sensitivity) * (max_weight - boost_to) / (max_weight - sensitivity)
        };
        adjusted / max_weight
    }
}

/// Check a caller-supplied weights array against the location count.
///
/// Every weight must be finite and non-negative.
pub fn validate_weights(location_count: usize, weights: Option<&[f64]>) -> HeatmapResult<()> {
    let Some(weights) = weights else {
        return Ok(());
    };
    if weights.len() != location_count {
        return Err(HeatmapError::InputMismatch {
            locations: location_count,
            weights: weights.len(),
        });
    }
    if let Some((index, &value)) = weights
        .iter()
        .enumerate()
        .find(|(_, w)| !w.is_finite() || **w < 0.0)
    {
        return Err(HeatmapError::InvalidWeight { index, value });
    }
    Ok(())
}

/// Produce the per-point weights used for accumulation.
///
/// - No weights: every point weighs 1.0.
/// - All weights zero: every point weighs 1.0, so the output is not blank.
/// - Adjustment disabled: weights pass through unchanged.
/// - Adjustment enabled: weights are balanced into (0, 1] relative to the maximum;
///   zero weights stay zero.
///
/// Expects weights that already passed [`validate_weights`].
pub fn resolve_weights(
    location_count: usize,
    weights: Option<&[f64]>,
    adjustment_enabled: bool,
    params: &BalanceParams,
) -> Vec<f64> {
    let Some(weights) = weights else {
        return vec![1.0; location_count];
    };

    let max_weight = weights.iter().copied().fold(0.0, f64::max);
    if max_weight <= 0.0 {
        tracing::warn!(
            points = location_count,
            "All weights are zero, substituting uniform weights"
        );
        return vec![1.0; location_count];
    }

    if !adjustment_enabled {
        return weights.to_vec();
    }

    weights
        .iter()
        .map(|&w| if w > 0.0 { params.apply(w, max_weight) } else { 0.0 })
        .collect()
}

/// Weight that densities are expressed relative to: the largest resolved
/// weight, or 1.0 when none is positive.
///
/// Splatting `weight / unit` keeps the density field finite for any finite
/// weights; colors only depend on density ratios.
pub fn weight_unit(weights: &[f64]) -> f64 {
    let max = weights.iter().copied().fold(0.0, f64::max);
    if max > 0.0 {
        max
    } else {
        1.0
    }
}
