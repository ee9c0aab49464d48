//! Proximity grouping of projected points before accumulation.
//!
//! Nearby points are merged into a single heavier point, and points in
//! crowded neighborhoods are damped so a dense cluster reads as a defined
//! hotspot rather than one saturated blob.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use heatmap_common::{HeatmapError, HeatmapResult};

use crate::projector::HeatPoint;

/// Grouping thresholds, in points. Renders multiply them by the device scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupingParams {
    /// Points closer than this to a group seed join that group
    pub merge_distance: f64,
    /// Neighbors within this distance damp each other's weight
    pub peak_removal_distance: f64,
    /// 0 disables damping, 1 removes a coincident neighbor's peak entirely
    pub peak_removal_factor: f64,
}

impl Default for GroupingParams {
    fn default() -> Self {
        Self {
            merge_distance: 10.0,
            peak_removal_distance: 20.0,
            peak_removal_factor: 0.4,
        }
    }
}

impl GroupingParams {
    pub fn validate(&self) -> HeatmapResult<()> {
        if !self.merge_distance.is_finite() || self.merge_distance < 0.0 {
            return Err(HeatmapError::invalid_parameter(
                "grouping.merge_distance",
                format!("must be finite and >= 0, got {}", self.merge_distance),
            ));
        }
        if !self.peak_removal_distance.is_finite() || self.peak_removal_distance <= 0.0 {
            return Err(HeatmapError::invalid_parameter(
                "grouping.peak_removal_distance",
                format!("must be finite and > 0, got {}", self.peak_removal_distance),
            ));
        }
        if !(0.0..=1.0).contains(&self.peak_removal_factor) {
            return Err(HeatmapError::invalid_parameter(
                "grouping.peak_removal_factor",
                format!("must lie in [0, 1], got {}", self.peak_removal_factor),
            ));
        }
        Ok(())
    }

    /// Distances converted to device pixels for a scale factor.
    pub fn scaled(&self, scale: f64) -> Self {
        Self {
            merge_distance: self.merge_distance * scale,
            peak_removal_distance: self.peak_removal_distance * scale,
            ..*self
        }
    }
}

type Cell = (i64, i64);

/// Uniform-grid index over point positions.
struct SpatialHash {
    cell_size: f64,
    cells: HashMap<Cell, Vec<usize>>,
}

impl SpatialHash {
    fn new(cell_size: f64) -> Self {
        Self {
            cell_size: cell_size.max(1.0),
            cells: HashMap::new(),
        }
    }

    fn cell_of(&self, x: f64, y: f64) -> Cell {
        (
            (x / self.cell_size).floor() as i64,
            (y / self.cell_size).floor() as i64,
        )
    }

    fn insert(&mut self, x: f64, y: f64, id: usize) {
        let cell = self.cell_of(x, y);
        self.cells.entry(cell).or_default().push(id);
    }

    /// Ids in the 3x3 block of cells around a position, in ascending order.
    fn nearby(&self, x: f64, y: f64) -> Vec<usize> {
        let (cx, cy) = self.cell_of(x, y);
        let mut ids: Vec<usize> = (-1..=1)
            .flat_map(|dy| {
                (-1..=1).map(move |dx| (cx.saturating_add(dx), cy.saturating_add(dy)))
            })
            .filter_map(|cell| self.cells.get(&cell))
            .flatten()
            .copied()
            .collect();
        ids.sort_unstable();
        ids
    }
}

struct Group {
    seed_x: f64,
    seed_y: f64,
    sum_x: f64,
    sum_y: f64,
    sum_weight: f64,
    count: usize,
}

impl Group {
    fn centroid(&self) -> (f64, f64) {
        if self.sum_weight > 0.0 {
            (self.sum_x / self.sum_weight, self.sum_y / self.sum_weight)
        } else {
            (self.seed_x, self.seed_y)
        }
    }
}

/// Merge points lying within `merge_distance` of an earlier group's seed.
///
/// Groups are formed in input order and positioned at the weighted
/// centroid of their members; their weight is the members' sum.
pub fn merge_nearby(points: &[HeatPoint], merge_distance: f64) -> Vec<HeatPoint> {
    let mut groups: Vec<Group> = Vec::new();
    let mut index = SpatialHash::new(merge_distance);
    let limit_sq = merge_distance * merge_distance;

    for point in points.iter().filter(|p| p.weight > 0.0) {
        let target = index.nearby(point.x, point.y).into_iter().find(|&id| {
            let g = &groups[id];
            let (dx, dy) = (g.seed_x - point.x, g.seed_y - point.y);
            dx * dx + dy * dy <= limit_sq
        });

        match target {
            Some(id) => {
                let g = &mut groups[id];
                g.sum_x += point.x * point.weight;
                g.sum_y += point.y * point.weight;
                g.sum_weight += point.weight;
                g.count += 1;
            }
            None => {
                index.insert(point.x, point.y, groups.len());
                groups.push(Group {
                    seed_x: point.x,
                    seed_y: point.y,
                    sum_x: point.x * point.weight,
                    sum_y: point.y * point.weight,
                    sum_weight: point.weight,
                    count: 1,
                });
            }
        }
    }

    tracing::debug!(
        input = points.len(),
        groups = groups.len(),
        largest = groups.iter().map(|g| g.count).max().unwrap_or(0),
        "Merged nearby points"
    );

    groups
        .iter()
        .map(|g| {
            let (x, y) = g.centroid();
            HeatPoint::new(x, y, g.sum_weight)
        })
        .collect()
}

/// Damp each point by its close neighbors.
///
/// For every other point at distance `d < peak_removal_distance` the weight is
/// multiplied by `1 - factor * (1 - d / peak_removal_distance)`. Factors are
/// computed from the undamped input, so the result does not depend on order.
pub fn remove_peaks(points: &[HeatPoint], params: &GroupingParams) -> Vec<HeatPoint> {
    if params.peak_removal_factor <= 0.0 {
        return points.to_vec();
    }

    let distance = params.peak_removal_distance;
    let mut index = SpatialHash::new(distance);
    for (id, p) in points.iter().enumerate() {
        index.insert(p.x, p.y, id);
    }

    points
        .iter()
        .enumerate()
        .map(|(id, p)| {
            let damping = index
                .nearby(p.x, p.y)
                .into_iter()
                .filter(|&other| other != id)
                .map(|other| {
                    let q = &points[other];
                    let d = ((q.x - p.x).powi(2) + (q.y - p.y).powi(2)).sqrt();
                    if d >= distance {
                        1.0
                    } else {
                        1.0 - params.peak_removal_factor * (1.0 - d / distance)
                    }
                })
                .product::<f64>();
            HeatPoint::new(p.x, p.y, p.weight * damping)
        })
        .collect()
}

/// Full grouping pre-pass: merge, then damp crowded groups.
pub fn group_points(points: &[HeatPoint], params: &GroupingParams) -> Vec<HeatPoint> {
    let merged = if params.merge_distance > 0.0 {
        merge_nearby(points, params.merge_distance)
    } else {
        points.iter().copied().filter(|p| p.weight > 0.0).collect()
    };
    remove_peaks(&merged, params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_close_points() {
        let points = [
            HeatPoint::new(10.0, 10.0, 1.0),
            HeatPoint::new(14.0, 10.0, 3.0),
            HeatPoint::new(100.0, 100.0, 2.0),
        ];
        let merged = merge_nearby(&points, 10.0);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].weight, 4.0);
        assert!((merged[0].x - 13.0).abs() < 1e-12);
        assert_eq!(merged[1], HeatPoint::new(100.0, 100.0, 2.0));
    }

    #[test]
    fn test_merge_across_cell_boundary() {
        // Seeds sit in adjacent hash cells.
        let points = [HeatPoint::new(9.5, 0.0, 1.0), HeatPoint::new(10.5, 0.0, 1.0)];
        assert_eq!(merge_nearby(&points, 10.0).len(), 1);
    }

    #[test]
    fn test_zero_weights_are_dropped() {
        let points = [HeatPoint::new(0.0, 0.0, 0.0), HeatPoint::new(50.0, 0.0, 1.0)];
        let grouped = group_points(&points, &GroupingParams::default());
        assert_eq!(grouped.len(), 1);
    }

    #[test]
    fn test_isolated_points_keep_weight() {
        let points = [HeatPoint::new(0.0, 0.0, 2.0), HeatPoint::new(500.0, 0.0, 5.0)];
        let grouped = group_points(&points, &GroupingParams::default());
        assert_eq!(grouped[0].weight, 2.0);
        assert_eq!(grouped[1].weight, 5.0);
    }

    #[test]
    fn test_peak_removal_damps_neighbors() {
        let params = GroupingParams::default();
        // 15 px apart: not merged, but within the damping distance.
        let points = [HeatPoint::new(0.0, 0.0, 1.0), HeatPoint::new(15.0, 0.0, 1.0)];
        let grouped = group_points(&points, &params);
        assert_eq!(grouped.len(), 2);
        let expected = 1.0 - 0.4 * (1.0 - 15.0 / 20.0);
        assert!((grouped[0].weight - expected).abs() < 1e-12);
        assert!((grouped[1].weight - expected).abs() < 1e-12);
    }

    #[test]
    fn test_grouping_is_deterministic() {
        let points: Vec<HeatPoint> = (0..200)
            .map(|i| HeatPoint::new((i * 37 % 97) as f64, (i * 53 % 89) as f64, 1.0 + (i % 3) as f64))
            .collect();
        let params = GroupingParams::default();
        assert_eq!(group_points(&points, &params), group_points(&points, &params));
    }

    #[test]
    fn test_far_points_do_not_overflow_cells() {
        let points = [
            HeatPoint::new(32.0, 32.0, 1.0),
            HeatPoint::new(1e300, 32.0, 1.0),
            HeatPoint::new(-1e300, -1e300, 1.0),
        ];
        let grouped = group_points(&points, &GroupingParams::default());
        assert_eq!(grouped.len(), 3);
        assert_eq!(grouped[0], HeatPoint::new(32.0, 32.0, 1.0));
    }

    #[test]
    fn test_scaled_params() {
        let params = GroupingParams::default().scaled(2.0);
        assert_eq!(params.merge_distance, 20.0);
        assert_eq!(params.peak_removal_distance, 40.0);
        assert_eq!(params.peak_removal_factor, 0.4);
    }

    #[test]
    fn test_params_validation() {
        assert!(GroupingParams::default().validate().is_ok());
        let bad = GroupingParams {
            peak_removal_factor: 1.5,
            ..GroupingParams::default()
        };
        assert!(bad.validate().is_err());
    }
}
