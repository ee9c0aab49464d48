//! Command-line heatmap rendering.
//!
//! Reads a JSON point file, renders it with the `renderer` crate and writes
//! a PNG. The binary in `main.rs` is a thin argument layer over [`run`].

pub mod config_loader;
pub mod input;
pub mod job;

pub use config_loader::load_render_config;
pub use input::{load_points, parse_points, PointRecord, PointSet};
pub use job::{parse_pair, parse_size, run, RenderJob, RenderSummary, ViewSpec};
