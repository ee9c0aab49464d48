//! Heatmap renderer CLI.
//!
//! Renders a JSON point file (planar `x`/`y` or geographic `lat`/`lon`
//! records) into a PNG heatmap.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use heatmap_common::{GeoCoordinate, ViewRect};
use heatmap_render::{load_points, load_render_config, parse_pair, parse_size, run, RenderJob, ViewSpec};
use renderer::RenderConfig;

#[derive(Parser, Debug)]
#[command(name = "heatmap-render")]
#[command(about = "Render weighted points into a heatmap PNG")]
struct Args {
    /// JSON point file
    #[arg(short, long, env = "HEATMAP_INPUT")]
    input: PathBuf,

    /// Output PNG path
    #[arg(short, long, default_value = "heatmap.png", env = "HEATMAP_OUTPUT")]
    output: PathBuf,

    /// Render configuration (YAML, or JSON by extension)
    #[arg(short, long, env = "HEATMAP_CONFIG")]
    config: Option<PathBuf>,

    /// Heat intensity; scales each point's footprint
    #[arg(short, long, env = "HEATMAP_BOOST")]
    boost: Option<f64>,

    /// Balance weights so outliers do not dominate
    #[arg(long, env = "HEATMAP_WEIGHTS_ADJUSTMENT")]
    weights_adjustment: bool,

    /// Disable proximity grouping (wider, smoother glow)
    #[arg(long, env = "HEATMAP_NO_GROUPING")]
    no_grouping: bool,

    /// Multiply every input weight (the quake demo uses 10)
    #[arg(long, default_value_t = 1.0, env = "HEATMAP_WEIGHT_SCALE")]
    weight_scale: f64,

    /// Device pixels per point
    #[arg(long, env = "HEATMAP_SCALE")]
    scale: Option<f64>,

    /// Output size in points, WIDTHxHEIGHT
    #[arg(long, env = "HEATMAP_SIZE")]
    size: Option<String>,

    /// Planar frame, x,y,width,height
    #[arg(long, env = "HEATMAP_RECT", conflicts_with_all = ["center", "zoom"])]
    rect: Option<String>,

    /// Map center, lat,lon
    #[arg(long, env = "HEATMAP_CENTER", requires = "zoom")]
    center: Option<String>,

    /// Web Mercator zoom level
    #[arg(long, env = "HEATMAP_ZOOM", requires = "center")]
    zoom: Option<f64>,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, env = "HEATMAP_LOG_JSON")]
    log_json: bool,
}

fn init_tracing(args: &Args) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    let builder = fmt().with_env_filter(filter).with_target(true).with_level(true);
    if args.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn build_config(args: &Args) -> Result<RenderConfig> {
    let mut config = match &args.config {
        Some(path) => load_render_config(path)?,
        None => RenderConfig::default(),
    };

    // Command-line flags override file values
    if let Some(boost) = args.boost {
        config.boost = boost;
    }
    if args.weights_adjustment {
        config.weights_adjustment_enabled = true;
    }
    if args.no_grouping {
        config.grouping_enabled = false;
    }
    if let Some(scale) = args.scale {
        config.scale = scale;
    }
    if let Some(size) = &args.size {
        config.output_size = Some(parse_size(size)?);
    }
    Ok(config)
}

fn build_view(args: &Args) -> Result<ViewSpec> {
    if let Some(rect) = &args.rect {
        let rect = ViewRect::from_csv_string(rect).with_context(|| format!("Invalid --rect '{}'", rect))?;
        return Ok(ViewSpec::Rect(rect));
    }
    match (&args.center, args.zoom) {
        (Some(center), Some(zoom)) => {
            let (lat, lon) = parse_pair(center).with_context(|| format!("Invalid --center '{}'", center))?;
            Ok(ViewSpec::Map {
                center: GeoCoordinate::new(lat, lon),
                zoom,
            })
        }
        _ => Ok(ViewSpec::Auto),
    }
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args);

    info!("Starting heatmap renderer");

    let mut points = load_points(&args.input)?;
    points.scale_weights(args.weight_scale);

    let job = RenderJob {
        points,
        config: build_config(&args)?,
        view: build_view(&args)?,
        output: args.output.clone(),
    };

    let summary = run(&job)?;
    info!(
        width = summary.width,
        height = summary.height,
        points = summary.points,
        bytes = summary.png_bytes,
        "Done"
    );
    Ok(())
}
