//! Handing finished heatmaps to a host map as overlays.

use heatmap_common::{GeoCoordinate, HeatmapResult, PixelPoint, ViewRect};
use projection::MapView;

use crate::config::RenderConfig;
use crate::pipeline::{map_view_config, Frame, RenderPlan};
use crate::projector::locations_to_view_points;
use crate::raster::{RasterImage, MAX_RASTER_PIXELS};

/// Where a host should pin an overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverlayAnchor {
    /// Geographic center of the rendered frame
    Coordinate(GeoCoordinate),
    /// Center of the rendered frame in view points, for views without a known center
    Pixel(PixelPoint),
}

/// A rendered heatmap plus the placement a host needs to display it.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapOverlay {
    pub image: RasterImage,
    /// View frame the image covers, in points
    pub frame: ViewRect,
    pub anchor: OverlayAnchor,
}

impl HeatmapOverlay {
    pub fn anchor(&self) -> OverlayAnchor {
        self.anchor
    }
}

/// A map widget that can display overlays.
pub trait OverlayHost: MapView {
    fn accept_overlay(&mut self, overlay: HeatmapOverlay);
}

/// Render an overlay for the view's visible frame.
///
/// Returns `Ok(None)` when the raster would exceed `config.max_image_bytes`
/// or the global raster ceiling; no raster is allocated in that case.
/// Invalid input is still an error.
pub fn render_overlay<V: MapView + ?Sized>(
    view: &V,
    locations: &[GeoCoordinate],
    weights: Option<&[f64]>,
    config: &RenderConfig,
) -> HeatmapResult<Option<HeatmapOverlay>> {
    let frame = view.visible_rect();
    let config = map_view_config(view, config);
    let points = locations_to_view_points(view, locations);
    let plan = RenderPlan::new(Frame::View(frame), &points, weights, &config)?;

    let over_ceiling = plan.width.saturating_mul(plan.height) > MAX_RASTER_PIXELS;
    let over_limit = config
        .max_image_bytes
        .map_or(false, |limit| plan.rgba_bytes() > limit);
    if over_ceiling || over_limit {
        tracing::debug!(
            width = plan.width,
            height = plan.height,
            limit = ?config.max_image_bytes,
            "Overlay too large, no image produced"
        );
        return Ok(None);
    }

    let pixels = plan.rasterize(&points, weights, &config);
    let Some(image) = RasterImage::encode(
        plan.width,
        plan.height,
        plan.scale,
        pixels,
        config.max_image_bytes,
    )?
    else {
        return Ok(None);
    };

    let anchor = match view.center_coordinate() {
        Some(center) => OverlayAnchor::Coordinate(center),
        None => {
            let (x, y) = frame.center();
            OverlayAnchor::Pixel(PixelPoint::new(x, y))
        }
    };

    Ok(Some(HeatmapOverlay {
        image,
        frame,
        anchor,
    }))
}

/// Render an overlay and hand it to the host.
///
/// Returns whether an overlay was delivered.
pub fn present_heatmap<H: OverlayHost>(
    host: &mut H,
    locations: &[GeoCoordinate],
    weights: Option<&[f64]>,
    config: &RenderConfig,
) -> HeatmapResult<bool> {
    match render_overlay(&*host, locations, weights, config)? {
        Some(overlay) => {
            host.accept_overlay(overlay);
            Ok(true)
        }
        None => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heatmap_common::OutputSize;
    use projection::WebMercatorView;

    struct RecordingHost {
        view: WebMercatorView,
        received: Vec<HeatmapOverlay>,
    }

    impl MapView for RecordingHost {
        fn visible_rect(&self) -> ViewRect {
            self.view.visible_rect()
        }

        fn coordinate_to_pixel(&self, coordinate: GeoCoordinate) -> PixelPoint {
            self.view.coordinate_to_pixel(coordinate)
        }

        fn center_coordinate(&self) -> Option<GeoCoordinate> {
            self.view.center_coordinate()
        }
    }

    impl OverlayHost for RecordingHost {
        fn accept_overlay(&mut self, overlay: HeatmapOverlay) {
            self.received.push(overlay);
        }
    }

    fn host() -> RecordingHost {
        RecordingHost {
            view: WebMercatorView::new(GeoCoordinate::new(39.0, -77.0), 5.0, OutputSize::new(64.0, 48.0)),
            received: Vec::new(),
        }
    }

    #[test]
    fn test_overlay_anchor_is_view_center() {
        let host = host();
        let overlay = render_overlay(&host, &[GeoCoordinate::new(39.0, -77.0)], None, &RenderConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(overlay.anchor(), OverlayAnchor::Coordinate(GeoCoordinate::new(39.0, -77.0)));
        assert_eq!(overlay.frame, ViewRect::with_size(64.0, 48.0));
        assert_eq!(overlay.image.width(), 64);
    }

    #[test]
    fn test_byte_limit_yields_none() {
        let host = host();
        let config = RenderConfig::default().max_image_bytes(64 * 48 * 4 - 1);
        let overlay = render_overlay(&host, &[GeoCoordinate::new(39.0, -77.0)], None, &config).unwrap();
        assert!(overlay.is_none());
    }

    #[test]
    fn test_present_hands_over_overlay() {
        let mut host = host();
        let delivered =
            present_heatmap(&mut host, &[GeoCoordinate::new(39.0, -77.0)], None, &RenderConfig::default()).unwrap();
        assert!(delivered);
        assert_eq!(host.received.len(), 1);

        let config = RenderConfig::default().max_image_bytes(16);
        assert!(!present_heatmap(&mut host, &[], None, &config).unwrap());
        assert_eq!(host.received.len(), 1);
    }

    #[test]
    fn test_invalid_input_is_still_an_error() {
        let host = host();
        let config = RenderConfig::default().max_image_bytes(16);
        let result = render_overlay(&host, &[GeoCoordinate::new(39.0, -77.0)], Some(&[]), &config);
        assert!(result.is_err());
    }
}
