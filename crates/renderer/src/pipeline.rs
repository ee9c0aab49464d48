//! Render entry points: projection, weighting, accumulation, smoothing and coloring in one pass.
//!
//! Every call validates its inputs before any raster is allocated and owns
//! its buffers outright, so concurrent calls never share state.

use heatmap_common::{
    BoundingBox, GeoCoordinate, HeatmapResult, OutputSize, PixelPoint, ViewRect,
};
use projection::MapView;

use crate::config::RenderConfig;
use crate::density::{accumulate, kernel_radius, reaches_raster, DensityField};
use crate::gradient::{colorize, ColorRamp};
use crate::grouping::group_points;
use crate::projector::{locations_to_view_points, validate_points, HeatPoint, PointProjector};
use crate::raster::{check_raster_size, RasterImage};
use crate::smoothing::{blur_radius, blur_reach, smooth};
use crate::weights::{resolve_weights, validate_weights, weight_unit};

/// Region the input points are expressed in.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Frame {
    /// Top-left origin, y down
    View(ViewRect),
    /// y up
    Bounds(BoundingBox),
}

impl Frame {
    fn validate(&self) -> HeatmapResult<()> {
        match self {
            Frame::View(rect) => rect.validate(),
            Frame::Bounds(bbox) => bbox.validate(),
        }
    }

    fn natural_size(&self) -> OutputSize {
        match self {
            Frame::View(rect) => OutputSize::new(rect.width, rect.height),
            Frame::Bounds(bbox) => OutputSize::new(bbox.width(), bbox.height()),
        }
    }

    fn projector(&self, width: usize, height: usize) -> PointProjector {
        match self {
            Frame::View(rect) => PointProjector::for_view_rect(rect, width, height),
            Frame::Bounds(bbox) => PointProjector::for_bounding_box(bbox, width, height),
        }
    }
}

/// Validated parameters for one render.
#[derive(Debug, Clone)]
pub(crate) struct RenderPlan {
    pub width: usize,
    pub height: usize,
    pub scale: f64,
    projector: PointProjector,
    ramp: ColorRamp,
}

impl RenderPlan {
    /// Validate everything a render needs, except the raster size ceiling.
    pub fn new(
        frame: Frame,
        points: &[PixelPoint],
        weights: Option<&[f64]>,
        config: &RenderConfig,
    ) -> HeatmapResult<Self> {
        frame.validate()?;
        let size = config.output_size.unwrap_or_else(|| frame.natural_size());
        let (width, height) = size.device_pixels(config.scale)?;
        config.validate()?;
        validate_weights(points.len(), weights)?;
        validate_points(points)?;
        let ramp = config.color_ramp()?;

        Ok(Self {
            width,
            height,
            scale: config.scale,
            projector: frame.projector(width, height),
            ramp,
        })
    }

    pub fn rgba_bytes(&self) -> usize {
        self.width.saturating_mul(self.height).saturating_mul(4)
    }

    fn kernel_radius(&self, config: &RenderConfig) -> usize {
        kernel_radius(config.boost, self.scale, self.width, self.height)
    }

    /// Device-pixel points ready for accumulation, and the weight unit they
    /// are expressed in.
    ///
    /// Weights are divided by the unit. Points whose footprint cannot reach
    /// the raster are dropped before grouping.
    pub fn heat_points(
        &self,
        points: &[PixelPoint],
        weights: Option<&[f64]>,
        config: &RenderConfig,
    ) -> (Vec<HeatPoint>, f64) {
        let mut resolved = resolve_weights(
            points.len(),
            weights,
            config.weights_adjustment_enabled,
            &config.balance,
        );
        let unit = weight_unit(&resolved);
        resolved.iter_mut().for_each(|w| *w /= unit);

        let radius = self.kernel_radius(config);
        let reach = radius + blur_reach(blur_radius(radius, config.grouping_enabled));
        let heat_points: Vec<HeatPoint> = self
            .projector
            .project_all(points, &resolved)
            .into_iter()
            .filter(|p| reaches_raster(p, reach, self.width, self.height))
            .collect();

        if config.grouping_enabled {
            let params = config.grouping.scaled(self.scale);
            (group_points(&heat_points, &params), unit)
        } else {
            (heat_points, unit)
        }
    }

    /// Accumulate and smooth the points into a fresh field.
    ///
    /// Densities are relative to the returned weight unit.
    fn accumulate_field(
        &self,
        points: &[PixelPoint],
        weights: Option<&[f64]>,
        config: &RenderConfig,
    ) -> (DensityField, f64) {
        if points.is_empty() {
            return (DensityField::new(self.width, self.height), 1.0);
        }

        let (heat_points, unit) = self.heat_points(points, weights, config);
        let radius = self.kernel_radius(config);
        let half_window = blur_radius(radius, config.grouping_enabled);
        let (mut field, splatted) = accumulate(
            &heat_points,
            self.width,
            self.height,
            radius,
            blur_reach(half_window),
        );
        tracing::debug!(
            points = points.len(),
            groups = heat_points.len(),
            splatted,
            radius,
            unit,
            "Accumulated density"
        );

        smooth(&mut field, radius, config.grouping_enabled);
        (field, unit)
    }

    /// Smoothed field with densities in units of the heaviest weight.
    pub fn density_field(
        &self,
        points: &[PixelPoint],
        weights: Option<&[f64]>,
        config: &RenderConfig,
    ) -> DensityField {
        self.accumulate_field(points, weights, config).0
    }

    /// Full render into a straight RGBA buffer.
    pub fn rasterize(
        &self,
        points: &[PixelPoint],
        weights: Option<&[f64]>,
        config: &RenderConfig,
    ) -> Vec<u8> {
        if points.is_empty() {
            tracing::debug!(width = self.width, height = self.height, "No points, transparent raster");
            return vec![0; self.rgba_bytes()];
        }
        let (field, unit) = self.accumulate_field(points, weights, config);
        let ceiling = config
            .density_ceiling
            .map(|c| ((c as f64 / unit) as f32).clamp(f32::MIN_POSITIVE, f32::MAX));
        colorize(&field, &self.ramp, ceiling)
    }
}

fn render_frame(
    frame: Frame,
    points: &[PixelPoint],
    weights: Option<&[f64]>,
    config: &RenderConfig,
) -> HeatmapResult<RasterImage> {
    let plan = RenderPlan::new(frame, points, weights, config)?;
    check_raster_size(plan.width, plan.height)?;
    let pixels = plan.rasterize(points, weights, config);
    RasterImage::from_rgba(plan.width, plan.height, plan.scale, pixels)
}

/// Render points given in `rect`'s coordinate space.
///
/// Uses the default pipeline options: no weight adjustment, grouping on.
pub fn render_heatmap(
    rect: &ViewRect,
    boost: f64,
    points: &[PixelPoint],
    weights: Option<&[f64]>,
) -> HeatmapResult<RasterImage> {
    render_heatmap_with_config(rect, points, weights, &RenderConfig::with_boost(boost))
}

/// Render with explicit weight-adjustment and grouping toggles.
pub fn render_heatmap_with_options(
    rect: &ViewRect,
    boost: f64,
    points: &[PixelPoint],
    weights: Option<&[f64]>,
    weights_adjustment_enabled: bool,
    grouping_enabled: bool,
) -> HeatmapResult<RasterImage> {
    let config = RenderConfig::with_boost(boost)
        .weights_adjustment(weights_adjustment_enabled)
        .grouping(grouping_enabled);
    render_heatmap_with_config(rect, points, weights, &config)
}

pub fn render_heatmap_with_config(
    rect: &ViewRect,
    points: &[PixelPoint],
    weights: Option<&[f64]>,
    config: &RenderConfig,
) -> HeatmapResult<RasterImage> {
    render_frame(Frame::View(*rect), points, weights, config)
}

/// Render points from a y-up space (planar map units, lon/lat degrees).
pub fn render_heatmap_in_bounds(
    bbox: &BoundingBox,
    points: &[PixelPoint],
    weights: Option<&[f64]>,
    config: &RenderConfig,
) -> HeatmapResult<RasterImage> {
    render_frame(Frame::Bounds(*bbox), points, weights, config)
}

/// The smoothed density field, for callers that color it themselves.
///
/// Densities are divided by the heaviest resolved weight, so they stay finite
/// for any finite input. With no weights (or a heaviest weight of 1) they are
/// in the same units as `density_ceiling`.
pub fn render_density_field(
    rect: &ViewRect,
    points: &[PixelPoint],
    weights: Option<&[f64]>,
    config: &RenderConfig,
) -> HeatmapResult<DensityField> {
    let plan = RenderPlan::new(Frame::View(*rect), points, weights, config)?;
    check_raster_size(plan.width, plan.height)?;
    Ok(plan.density_field(points, weights, config))
}

/// The view's visible frame and device scale applied over `config`.
pub(crate) fn map_view_config<V: MapView + ?Sized>(view: &V, config: &RenderConfig) -> RenderConfig {
    let rect = view.visible_rect();
    RenderConfig {
        scale: view.scale_factor(),
        output_size: Some(OutputSize::new(rect.width, rect.height)),
        ..config.clone()
    }
}

/// Render geographic locations over a map view's visible frame.
pub fn render_heatmap_for_map_view<V: MapView + ?Sized>(
    view: &V,
    boost: f64,
    locations: &[GeoCoordinate],
    weights: Option<&[f64]>,
) -> HeatmapResult<RasterImage> {
    render_heatmap_for_map_view_with_config(view, locations, weights, &RenderConfig::with_boost(boost))
}

/// Geographic variant with full configuration. The view's scale factor
/// replaces `config.scale`.
pub fn render_heatmap_for_map_view_with_config<V: MapView + ?Sized>(
    view: &V,
    locations: &[GeoCoordinate],
    weights: Option<&[f64]>,
    config: &RenderConfig,
) -> HeatmapResult<RasterImage> {
    validate_weights(locations.len(), weights)?;
    let config = map_view_config(view, config);
    let points = locations_to_view_points(view, locations);
    render_heatmap_with_config(&view.visible_rect(), &points, weights, &config)
}
