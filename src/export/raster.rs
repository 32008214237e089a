//! Raster tiling.
//!
//! The rendered on-screen view is captured once as a bitmap, scaled to the
//! page width, and shown across as many pages as it needs. Every page
//! references the same full bitmap shifted upward by the height already
//! shown, so consecutive pages tile with no gap or overlap.
//!
//! Capturing is delegated to a [`CaptureBackend`] handed to the tiler at
//! construction; a tiler built without one reports the missing capability.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use image::imageops::FilterType;
use image::{DynamicImage, RgbImage, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::render::ScreenView;

use super::geometry::PageGeometry;
use super::page::{ExportPage, PaginatedDocument, RasterPlacement};

/// Options for the bitmap capture step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureOptions {
    /// Device pixels per CSS pixel
    pub scale: f32,
    /// Opaque colour painted behind transparent pixels
    pub background: [u8; 3],
    /// Allow images from other origins to be drawn into the capture
    pub allow_cross_origin: bool,
}

impl CaptureOptions {
    /// Set the device scale.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Set the background colour.
    pub fn with_background(mut self, rgb: [u8; 3]) -> Self {
        self.background = rgb;
        self
    }

    /// Allow or refuse cross-origin images.
    pub fn with_cross_origin(mut self, allow: bool) -> Self {
        self.allow_cross_origin = allow;
        self
    }
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            scale: 2.0,
            background: [255, 255, 255],
            allow_cross_origin: true,
        }
    }
}

/// Something that can turn a rendered view into pixels.
///
/// Implementations complete only once the view has finished painting,
/// and either return one complete bitmap or fail.
#[async_trait]
pub trait CaptureBackend: Send + Sync {
    /// Capture the view as a single bitmap.
    async fn capture(&self, view: &ScreenView, options: &CaptureOptions) -> Result<RgbaImage>;
}

/// Capture backend that serves a pre-rendered image of the view.
///
/// The image is taken to be at 1x scale and is resampled to the requested
/// device scale.
#[derive(Debug, Clone)]
pub struct ImageCapture {
    image: DynamicImage,
    cross_origin_content: bool,
}

impl ImageCapture {
    /// Use an in-memory image.
    pub fn from_image(image: DynamicImage) -> Self {
        Self {
            image,
            cross_origin_content: false,
        }
    }

    /// Load the image from a file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let image = image::open(path.as_ref())?;
        Ok(Self::from_image(image))
    }

    /// Mark the image as containing content from another origin.
    pub fn with_cross_origin_content(mut self, cross_origin: bool) -> Self {
        self.cross_origin_content = cross_origin;
        self
    }
}

#[async_trait]
impl CaptureBackend for ImageCapture {
    async fn capture(&self, view: &ScreenView, options: &CaptureOptions) -> Result<RgbaImage> {
        if self.cross_origin_content && !options.allow_cross_origin {
            return Err(Error::Capture(
                "surface is tainted by cross-origin content".to_string(),
            ));
        }
        if !(options.scale.is_finite() && options.scale > 0.0) {
            return Err(Error::InvalidOptions(format!(
                "capture scale must be positive, got {}",
                options.scale
            )));
        }

        log::debug!(
            "capturing view with {} node(s) at {}x",
            view.nodes.len(),
            options.scale
        );

        let rgba = self.image.to_rgba8();
        if options.scale == 1.0 || rgba.width() == 0 || rgba.height() == 0 {
            return Ok(rgba);
        }
        let width = ((rgba.width() as f32) * options.scale).round().max(1.0) as u32;
        let height = ((rgba.height() as f32) * options.scale).round().max(1.0) as u32;
        Ok(image::imageops::resize(&rgba, width, height, FilterType::Triangle))
    }
}

/// Slices one captured bitmap into pages.
#[derive(Clone)]
pub struct RasterTiler {
    backend: Option<Arc<dyn CaptureBackend>>,
    options: CaptureOptions,
    geometry: PageGeometry,
}

impl RasterTiler {
    /// Create a tiler. `None` means the environment cannot capture bitmaps.
    pub fn new(backend: Option<Arc<dyn CaptureBackend>>) -> Self {
        Self {
            backend,
            options: CaptureOptions::default(),
            geometry: PageGeometry::A4,
        }
    }

    /// Set the capture options.
    pub fn with_options(mut self, options: CaptureOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the page geometry.
    pub fn with_geometry(mut self, geometry: PageGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Check if a capture backend is available.
    pub fn is_supported(&self) -> bool {
        self.backend.is_some()
    }

    /// Capture `view` and tile it onto pages.
    pub async fn tile(&self, view: &ScreenView) -> Result<PaginatedDocument> {
        let backend = self.backend.as_ref().ok_or_else(|| {
            Error::UnsupportedCapability("bitmap capture is not available".to_string())
        })?;
        self.geometry.validate()?;

        let captured = backend.capture(view, &self.options).await?;
        let bitmap = flatten(&captured, self.options.background);
        tile_bitmap(bitmap, &self.geometry)
    }
}

impl std::fmt::Debug for RasterTiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterTiler")
            .field("supported", &self.is_supported())
            .field("options", &self.options)
            .finish()
    }
}

/// Lay a flattened bitmap out across pages at full page width.
pub fn tile_bitmap(bitmap: RgbImage, geometry: &PageGeometry) -> Result<PaginatedDocument> {
    let (width_px, height_px) = bitmap.dimensions();
    if width_px == 0 || height_px == 0 {
        return Err(Error::EmptyCapture);
    }

    let page_width = geometry.width_mm as f64;
    let page_height = geometry.height_mm as f64;
    let image_height = height_px as f64 * page_width / width_px as f64;

    let pages: Vec<ExportPage> = tile_offsets(image_height, page_height)
        .into_iter()
        .enumerate()
        .map(|(i, offset_mm)| {
            ExportPage::raster(
                i as u32 + 1,
                geometry,
                RasterPlacement {
                    offset_mm,
                    width_mm: page_width,
                    height_mm: image_height,
                },
            )
        })
        .collect();

    log::debug!(
        "tiled {}x{} bitmap ({:.1}mm tall) onto {} page(s)",
        width_px,
        height_px,
        image_height,
        pages.len()
    );

    Ok(PaginatedDocument {
        pages,
        bitmap: Some(bitmap),
    })
}

/// Vertical offsets of the bitmap on each page, in mm.
///
/// The first page shows the bitmap from its top. A further page is added
/// while the height not yet consumed is zero or more, so an image exactly
/// `n` pages tall yields `n + 1` pages, the last one blank.
pub fn tile_offsets(image_height_mm: f64, page_height_mm: f64) -> Vec<f64> {
    let mut offsets = vec![0.0];
    if !(page_height_mm > 0.0) || !image_height_mm.is_finite() {
        return offsets;
    }

    let mut remaining = image_height_mm - page_height_mm;
    while remaining >= 0.0 {
        offsets.push(image_height_mm - remaining);
        remaining -= page_height_mm;
    }
    offsets
}

/// Composite the capture onto an opaque background.
fn flatten(image: &RgbaImage, background: [u8; 3]) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        let alpha = a as u32;
        let blend = |c: u8, bg: u8| ((c as u32 * alpha + bg as u32 * (255 - alpha) + 127) / 255) as u8;
        image::Rgb([
            blend(r, background[0]),
            blend(g, background[1]),
            blend(b, background[2]),
        ])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_tile_offsets_partial_last_page() {
        let offsets = tile_offsets(297.0 * 2.4, 297.0);
        assert_eq!(offsets.len(), 3);
        assert_eq!(offsets[0], 0.0);
        assert!((offsets[1] - 297.0).abs() < 1e-9);
        assert!((offsets[2] - 594.0).abs() < 1e-9);
    }

    #[test]
    fn test_tile_offsets_short_image() {
        assert_eq!(tile_offsets(100.0, 297.0), vec![0.0]);
    }

    #[test]
    fn test_tile_offsets_exact_multiple_adds_blank_page() {
        assert_eq!(tile_offsets(594.0, 297.0).len(), 3);
    }

    #[test]
    fn test_tiles_are_contiguous() {
        let offsets = tile_offsets(1234.5, 297.0);
        for pair in offsets.windows(2) {
            assert!((pair[1] - pair[0] - 297.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_flatten_transparent_onto_white() {
        let mut rgba = RgbaImage::new(2, 1);
        rgba.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
        rgba.put_pixel(1, 0, Rgba([0, 0, 0, 255]));
        let flat = flatten(&rgba, [255, 255, 255]);
        assert_eq!(flat.get_pixel(0, 0).0, [255, 255, 255]);
        assert_eq!(flat.get_pixel(1, 0).0, [0, 0, 0]);
    }

    #[test]
    fn test_tile_bitmap_empty() {
        let err = tile_bitmap(RgbImage::new(0, 0), &PageGeometry::A4).unwrap_err();
        assert!(matches!(err, Error::EmptyCapture));
    }

    #[test]
    fn test_tile_bitmap_scales_to_page_width() {
        // 100 px wide, 300 px tall -> 630mm at 210mm width -> 3 pages.
        let doc = tile_bitmap(RgbImage::new(100, 300), &PageGeometry::A4).unwrap();
        assert_eq!(doc.page_count(), 3);
        match doc.pages[2].content {
            crate::export::page::PageContent::Raster(p) => {
                assert_eq!(p.width_mm, 210.0);
                assert!((p.height_mm - 630.0).abs() < 1e-9);
            }
            ref other => panic!("expected raster page, got {:?}", other),
        }
    }
}
