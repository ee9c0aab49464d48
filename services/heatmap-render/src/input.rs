//! Point files: JSON arrays of planar or geographic records.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use heatmap_common::{GeoCoordinate, PixelPoint};

/// One input record.
///
/// ```json
/// [ { "lat": 37.9, "lon": -77.9, "magnitude": 5.8 }, { "lat": 38.1, "lon": -77.5 } ]
/// [ { "x": 120.0, "y": 80.5, "weight": 2.0 } ]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PointRecord {
    Geographic {
        lat: f64,
        lon: f64,
        #[serde(default, alias = "magnitude")]
        weight: Option<f64>,
    },
    Planar {
        x: f64,
        y: f64,
        #[serde(default)]
        weight: Option<f64>,
    },
}

impl PointRecord {
    fn weight(&self) -> Option<f64> {
        match self {
            PointRecord::Geographic { weight, .. } | PointRecord::Planar { weight, .. } => *weight,
        }
    }
}

/// Parsed points, all of one kind, with weights when every record had one.
#[derive(Debug, Clone, PartialEq)]
pub enum PointSet {
    Planar {
        points: Vec<PixelPoint>,
        weights: Option<Vec<f64>>,
    },
    Geographic {
        locations: Vec<GeoCoordinate>,
        weights: Option<Vec<f64>>,
    },
}

impl PointSet {
    pub fn len(&self) -> usize {
        match self {
            PointSet::Planar { points, .. } => points.len(),
            PointSet::Geographic { locations, .. } => locations.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn weights(&self) -> Option<&[f64]> {
        match self {
            PointSet::Planar { weights, .. } | PointSet::Geographic { weights, .. } => {
                weights.as_deref()
            }
        }
    }

    /// Multiply every weight by `factor`.
    pub fn scale_weights(&mut self, factor: f64) {
        if let PointSet::Planar { weights: Some(w), .. } | PointSet::Geographic { weights: Some(w), .. } =
            self
        {
            w.iter_mut().for_each(|v| *v *= factor);
        }
    }

    /// Build a point set, rejecting mixed record kinds and partial weights.
    pub fn from_records(records: &[PointRecord]) -> Result<Self> {
        let with_weight = records.iter().filter(|r| r.weight().is_some()).count();
        if with_weight != 0 && with_weight != records.len() {
            bail!(
                "{} of {} records carry a weight; give every record a weight or none",
                with_weight,
                records.len()
            );
        }
        let weights = (with_weight > 0).then(|| records.iter().filter_map(|r| r.weight()).collect());

        match records.first() {
            None | Some(PointRecord::Planar { .. }) => {
                let points = records
                    .iter()
                    .enumerate()
                    .map(|(i, r)| match *r {
                        PointRecord::Planar { x, y, .. } => Ok(PixelPoint::new(x, y)),
                        PointRecord::Geographic { .. } => bail!("record {} is geographic in a planar file", i),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(PointSet::Planar { points, weights })
            }
            Some(PointRecord::Geographic { .. }) => {
                let locations = records
                    .iter()
                    .enumerate()
                    .map(|(i, r)| match *r {
                        PointRecord::Geographic { lat, lon, .. } => {
                            let location = GeoCoordinate::new(lat, lon);
                            if !location.is_valid() {
                                bail!("record {} has an invalid coordinate ({}, {})", i, lat, lon);
                            }
                            Ok(location)
                        }
                        PointRecord::Planar { .. } => bail!("record {} is planar in a geographic file", i),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(PointSet::Geographic { locations, weights })
            }
        }
    }
}

pub fn parse_points(json: &str) -> Result<PointSet> {
    let records: Vec<PointRecord> =
        serde_json::from_str(json).context("Failed to parse point records")?;
    PointSet::from_records(&records)
}

pub fn load_points<P: AsRef<Path>>(path: P) -> Result<PointSet> {
    let content = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read points from {:?}", path.as_ref()))?;
    parse_points(&content).with_context(|| format!("Invalid point file {:?}", path.as_ref()))
}
