//! A single render: points in, PNG out.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use tracing::info;

use heatmap_common::{BoundingBox, GeoCoordinate, OutputSize, PixelPoint, ViewRect};
use projection::WebMercatorView;
use renderer::{render_heatmap_with_config, render_overlay, OverlayAnchor, RasterImage, RenderConfig};

use crate::input::PointSet;

/// Fraction of the frame kept free around fitted data.
const FIT_PADDING: f64 = 0.05;

/// Smallest padding, in input units, around fitted planar data.
const MIN_FIT_PADDING: f64 = 10.0;

/// How the output frame is chosen.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewSpec {
    /// Fit the frame to the data
    Auto,
    /// Explicit planar frame
    Rect(ViewRect),
    /// Web Mercator view
    Map { center: GeoCoordinate, zoom: f64 },
}

#[derive(Debug, Clone)]
pub struct RenderJob {
    pub points: PointSet,
    pub config: RenderConfig,
    pub view: ViewSpec,
    pub output: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderSummary {
    pub width: usize,
    pub height: usize,
    pub points: usize,
    pub png_bytes: usize,
    pub anchor: Option<OverlayAnchor>,
}

/// Parse "a,b" into two numbers.
pub fn parse_pair(s: &str) -> Result<(f64, f64)> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [a, b] = parts.as_slice() else {
        bail!("expected two comma-separated numbers, got '{}'", s);
    };
    let a = a.parse::<f64>().with_context(|| format!("invalid number '{}'", a))?;
    let b = b.parse::<f64>().with_context(|| format!("invalid number '{}'", b))?;
    Ok((a, b))
}

/// Parse "WIDTHxHEIGHT".
pub fn parse_size(s: &str) -> Result<OutputSize> {
    let (w, h) = s
        .split_once(|c: char| c == 'x' || c == 'X')
        .ok_or_else(|| anyhow!("expected WIDTHxHEIGHT, got '{}'", s))?;
    let width = w.trim().parse::<f64>().with_context(|| format!("invalid width '{}'", w))?;
    let height = h.trim().parse::<f64>().with_context(|| format!("invalid height '{}'", h))?;
    Ok(OutputSize::new(width, height))
}

/// Frame enclosing planar points, padded on every side.
fn fit_rect(points: &[PixelPoint]) -> Result<ViewRect> {
    let pairs: Vec<(f64, f64)> = points.iter().map(|p| (p.x, p.y)).collect();
    let bbox = BoundingBox::enclosing(&pairs)
        .ok_or_else(|| anyhow!("cannot fit a frame to an empty point set; pass --rect"))?;
    let pad_x = (bbox.width() * FIT_PADDING).max(MIN_FIT_PADDING);
    let pad_y = (bbox.height() * FIT_PADDING).max(MIN_FIT_PADDING);
    Ok(ViewRect::new(
        bbox.min_x - pad_x,
        bbox.min_y - pad_y,
        bbox.width() + 2.0 * pad_x,
        bbox.height() + 2.0 * pad_y,
    ))
}

fn map_view(locations: &[GeoCoordinate], view: &ViewSpec, size: OutputSize, scale: f64) -> Result<WebMercatorView> {
    let view = match view {
        ViewSpec::Map { center, zoom } => WebMercatorView::new(*center, *zoom, size),
        ViewSpec::Auto => {
            let pairs: Vec<(f64, f64)> = locations.iter().map(|l| (l.lon, l.lat)).collect();
            let bounds = BoundingBox::enclosing(&pairs)
                .ok_or_else(|| anyhow!("cannot fit a map view to no locations; pass --center and --zoom"))?;
            WebMercatorView::fitting(&bounds, size, FIT_PADDING)
        }
        ViewSpec::Rect(_) => bail!("--rect applies to planar points; use --center and --zoom for lat/lon input"),
    };
    Ok(view.with_scale(scale))
}

/// Render the job and write the PNG.
pub fn run(job: &RenderJob) -> Result<RenderSummary> {
    let config = &job.config;
    let (image, anchor) = match &job.points {
        PointSet::Planar { points, weights } => {
            let rect = match &job.view {
                ViewSpec::Rect(rect) => *rect,
                ViewSpec::Auto => fit_rect(points)?,
                ViewSpec::Map { .. } => bail!("--center/--zoom apply to lat/lon input; use --rect for planar points"),
            };
            info!(
                points = points.len(),
                x = rect.x,
                y = rect.y,
                width = rect.width,
                height = rect.height,
                "Rendering planar heatmap"
            );
            let image = render_heatmap_with_config(&rect, points, weights.as_deref(), config)?;
            (image, None)
        }
        PointSet::Geographic { locations, weights } => {
            let size = config.output_size.unwrap_or(OutputSize::new(512.0, 512.0));
            let view = map_view(locations, &job.view, size, config.scale)?;
            info!(
                points = locations.len(),
                lat = view.center.lat,
                lon = view.center.lon,
                zoom = view.zoom,
                "Rendering map heatmap"
            );
            let overlay = render_overlay(&view, locations, weights.as_deref(), config)?
                .ok_or_else(|| anyhow!("no image produced: raster exceeds the configured size limit"))?;
            (overlay.image, Some(overlay.anchor))
        }
    };

    write_image(&image, job)?;
    let png_bytes = std::fs::metadata(&job.output)
        .with_context(|| format!("Failed to stat {:?}", job.output))?
        .len() as usize;

    info!(
        width = image.width(),
        height = image.height(),
        bytes = png_bytes,
        output = %job.output.display(),
        "Heatmap written"
    );

    Ok(RenderSummary {
        width: image.width(),
        height: image.height(),
        points: job.points.len(),
        png_bytes,
        anchor,
    })
}

fn write_image(image: &RasterImage, job: &RenderJob) -> Result<()> {
    image
        .write_png(&job.output)
        .with_context(|| format!("Failed to write {:?}", job.output))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pair() {
        assert_eq!(parse_pair("39.0, -77.0").unwrap(), (39.0, -77.0));
        assert!(parse_pair("39.0").is_err());
        assert!(parse_pair("a,b").is_err());
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("640x480").unwrap(), OutputSize::new(640.0, 480.0));
        assert!(parse_size("640").is_err());
    }

    #[test]
    fn test_fit_rect_pads_points() {
        let rect = fit_rect(&[PixelPoint::new(0.0, 0.0), PixelPoint::new(100.0, 50.0)]).unwrap();
        assert!(rect.contains_point(0.0, 0.0));
        assert!(rect.contains_point(100.0, 50.0));
        assert!(fit_rect(&[]).is_err());
    }
}
