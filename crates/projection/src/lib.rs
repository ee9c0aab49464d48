//! Map-view capabilities consumed by the heatmap renderer.
//!
//! The renderer never talks to a map widget directly. It asks a [`MapView`]
//! for its visible frame and for the pixel position of a coordinate; this
//! crate defines that seam and ships a spherical Web Mercator implementation.

pub mod mercator;
pub mod view;

pub use mercator::WebMercator;
pub use view::{MapView, WebMercatorView};
