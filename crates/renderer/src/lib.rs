//! Heatmap rendering: turns weighted points into a color-mapped raster.
//!
//! Stages, in order:
//! - Projection into device pixels (`projector`)
//! - Weight normalization and balancing (`weights`)
//! - Optional proximity grouping (`grouping`)
//! - Density accumulation (`density`) and smoothing (`smoothing`)
//! - Color ramp mapping (`gradient`) and encoding (`raster`, `png`)

pub mod config;
pub mod density;
pub mod gradient;
pub mod grouping;
pub mod overlay;
pub mod pipeline;
pub mod png;
pub mod projector;
pub mod raster;
pub mod smoothing;
pub mod style;
pub mod weights;

pub use config::RenderConfig;
pub use density::DensityField;
pub use gradient::{colorize, Color, ColorRamp, ColorStop};
pub use overlay::{present_heatmap, render_overlay, HeatmapOverlay, OverlayAnchor, OverlayHost};
pub use pipeline::{
    render_density_field, render_heatmap, render_heatmap_for_map_view,
    render_heatmap_for_map_view_with_config, render_heatmap_in_bounds, render_heatmap_with_config,
    render_heatmap_with_options,
};
pub use projector::HeatPoint;
pub use raster::{RasterImage, MAX_RASTER_PIXELS};
pub use style::RampConfig;
