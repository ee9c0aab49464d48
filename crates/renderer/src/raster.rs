//! Finished heatmap images.

use std::path::Path;

use heatmap_common::{HeatmapError, HeatmapResult};

use crate::png::create_png_auto;

/// Largest raster, in device pixels, the plain entry points will allocate.
pub const MAX_RASTER_PIXELS: usize = 8192 * 8192;

/// Reject rasters above [`MAX_RASTER_PIXELS`] before anything is allocated.
pub fn check_raster_size(width: usize, height: usize) -> HeatmapResult<()> {
    match width.checked_mul(height) {
        Some(pixels) if pixels <= MAX_RASTER_PIXELS => Ok(()),
        _ => Err(HeatmapError::OversizedOutput {
            width,
            height,
            limit: MAX_RASTER_PIXELS,
        }),
    }
}

/// Straight-alpha RGBA8 raster in device pixels.
///
/// `scale` records how many device pixels make up one point, so hosts can
/// display the image at `width / scale` x `height / scale` points.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    width: usize,
    height: usize,
    scale: f64,
    pixels: Vec<u8>,
}

impl RasterImage {
    /// Fully transparent image.
    pub fn transparent(width: usize, height: usize, scale: f64) -> Self {
        Self {
            width,
            height,
            scale,
            pixels: vec![0; width * height * 4],
        }
    }

    /// Wrap an RGBA buffer, checking its length.
    pub fn from_rgba(width: usize, height: usize, scale: f64, pixels: Vec<u8>) -> HeatmapResult<Self> {
        if pixels.len() != width * height * 4 {
            return Err(HeatmapError::EncodeError(format!(
                "RGBA buffer holds {} bytes, {}x{} needs {}",
                pixels.len(),
                width,
                height,
                width * height * 4
            )));
        }
        Ok(Self {
            width,
            height,
            scale,
            pixels,
        })
    }

    /// Wrap an RGBA buffer unless it exceeds `max_bytes`.
    ///
    /// `None` means no image is produced; hosts fall back to their own default.
    pub fn encode(
        width: usize,
        height: usize,
        scale: f64,
        pixels: Vec<u8>,
        max_bytes: Option<usize>,
    ) -> HeatmapResult<Option<Self>> {
        if let Some(limit) = max_bytes {
            if pixels.len() > limit {
                tracing::debug!(
                    bytes = pixels.len(),
                    limit,
                    "Raster exceeds byte limit, no image produced"
                );
                return Ok(None);
            }
        }
        Self::from_rgba(width, height, scale, pixels).map(Some)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Size in points.
    pub fn point_size(&self) -> (f64, f64) {
        (self.width as f64 / self.scale, self.height as f64 / self.scale)
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    pub fn byte_len(&self) -> usize {
        self.pixels.len()
    }

    /// RGBA value at a pixel, or `None` outside the image.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 4;
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    pub fn is_fully_transparent(&self) -> bool {
        self.pixels.chunks_exact(4).all(|p| p[3] == 0)
    }

    /// Encode as PNG (indexed when the palette fits, RGBA otherwise).
    pub fn to_png(&self) -> HeatmapResult<Vec<u8>> {
        create_png_auto(&self.pixels, self.width, self.height)
    }

    pub fn write_png(&self, path: impl AsRef<Path>) -> HeatmapResult<()> {
        let png = self.to_png()?;
        std::fs::write(path, png)?;
        Ok(())
    }
}
