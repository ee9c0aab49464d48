//! PNG output tests, decoded back with the `image` crate.

use heatmap_common::PixelPoint;
use renderer::png::{create_png, create_png_auto, create_png_indexed, PNG_SIGNATURE};
use renderer::{render_heatmap, RasterImage};
use test_utils::{clustered_points, views};

fn ihdr_size(png: &[u8]) -> (u32, u32) {
    assert_eq!(&png[12..16], b"IHDR");
    let width = u32::from_be_bytes([png[16], png[17], png[18], png[19]]);
    let height = u32::from_be_bytes([png[20], png[21], png[22], png[23]]);
    (width, height)
}

fn sample_heatmap() -> RasterImage {
    let centers = [PixelPoint::new(100.0, 120.0), PixelPoint::new(190.0, 60.0)];
    let points = clustered_points(&centers, 25, 30.0, 42);
    render_heatmap(&views::TILE, 0.5, &points, None).unwrap()
}

// ============================================================================
// Container structure
// ============================================================================

#[test]
fn test_png_signature_and_ihdr() {
    let image = sample_heatmap();
    let png = image.to_png().unwrap();
    assert_eq!(&png[0..8], &PNG_SIGNATURE);
    assert_eq!(ihdr_size(&png), (256, 256));
    assert_eq!(&png[png.len() - 8..png.len() - 4], b"IEND");
}

#[test]
fn test_heatmap_uses_indexed_encoding() {
    // Colors come from a 256-entry table, so the palette always fits.
    let png = sample_heatmap().to_png().unwrap();
    assert_eq!(png[25], 3);
    assert!(png.windows(4).any(|w| w == b"PLTE"));
    assert!(png.windows(4).any(|w| w == b"tRNS"));
}

// ============================================================================
// Round trips through a real decoder
// ============================================================================

#[test]
fn test_decoded_pixels_match_raster() {
    let image = sample_heatmap();
    let png = image.to_png().unwrap();

    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (256, 256));
    assert_eq!(decoded.as_raw().as_slice(), image.pixels());
}

#[test]
fn test_rgba_encoding_decodes() {
    let mut pixels = Vec::with_capacity(20 * 20 * 4);
    for y in 0..20u8 {
        for x in 0..20u8 {
            pixels.extend_from_slice(&[x * 12, y * 12, x ^ y, 200]);
        }
    }
    let png = create_png(&pixels, 20, 20).unwrap();
    assert_eq!(png[25], 6);

    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded.as_raw(), &pixels);
}

#[test]
fn test_indexed_encoding_decodes() {
    let palette: [(u8, u8, u8, u8); 2] = [(255, 0, 0, 255), (0, 0, 255, 0)];
    let indices = [0u8, 1, 1, 0, 0, 1];
    let png = create_png_indexed(3, 2, &palette, &indices).unwrap();

    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(decoded.get_pixel(1, 0).0, [0, 0, 255, 0]);
    assert_eq!(decoded.get_pixel(2, 1).0, [0, 0, 255, 0]);
}

#[test]
fn test_transparent_raster_round_trip() {
    let image = RasterImage::transparent(17, 9, 1.0);
    let png = create_png_auto(image.pixels(), 17, 9).unwrap();
    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (17, 9));
    assert!(decoded.pixels().all(|p| p.0[3] == 0));
}

#[test]
fn test_write_png_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("heat.png");
    let image = sample_heatmap();
    image.write_png(&path).unwrap();

    let decoded = image::open(&path).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (256, 256));
}
