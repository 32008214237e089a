//! Integration tests for raster tiling.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use image::{DynamicImage, Rgba, RgbaImage};

use sheetflow::export::{
    CaptureBackend, CaptureOptions, ExportOptions, ImageCapture, PageContent, RasterTiler,
};
use sheetflow::render::{render_screen, RenderOptions, ScreenView};
use sheetflow::{build_document, Error, Result};

fn view() -> ScreenView {
    render_screen(&build_document("# Facts\nName: Ravi"), &RenderOptions::default())
}

/// An image whose height at 210mm width equals `pages` A4 pages.
fn image_of_pages(pages: f64) -> DynamicImage {
    let width = 210;
    let height = (297.0 * pages).round() as u32;
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255])))
}

/// Backend that counts captures and returns a fixed bitmap.
struct CountingCapture {
    calls: AtomicUsize,
    bitmap: RgbaImage,
}

#[async_trait]
impl CaptureBackend for CountingCapture {
    async fn capture(&self, _view: &ScreenView, _options: &CaptureOptions) -> Result<RgbaImage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.bitmap.clone())
    }
}

#[tokio::test]
async fn test_two_point_four_pages_tile_to_three() {
    let capture = ImageCapture::from_image(image_of_pages(2.4));
    let tiler = RasterTiler::new(Some(Arc::new(capture)))
        .with_options(CaptureOptions::default().with_scale(1.0));

    let doc = tiler.tile(&view()).await.unwrap();
    assert_eq!(doc.page_count(), 3);

    let placements: Vec<_> = doc
        .pages
        .iter()
        .map(|page| match page.content {
            PageContent::Raster(placement) => placement,
            ref other => panic!("expected raster page, got {:?}", other),
        })
        .collect();

    // Same full-height image on every page, shifted by one page each time.
    for (i, placement) in placements.iter().enumerate() {
        assert_eq!(placement.width_mm, 210.0);
        assert!((placement.height_mm - 713.0).abs() < 1e-6);
        assert!((placement.offset_mm - 297.0 * i as f64).abs() < 1e-6);
    }

    // The last page shows only the remaining 0.4 page; the rest stays blank.
    let last = placements[2];
    let shown = last.height_mm - last.offset_mm;
    assert!(shown > 0.0 && shown < 297.0);
}

#[tokio::test]
async fn test_capture_scale_keeps_page_count() {
    let capture = ImageCapture::from_image(image_of_pages(2.4));
    let tiler = RasterTiler::new(Some(Arc::new(capture)));

    let doc = tiler.tile(&view()).await.unwrap();
    assert_eq!(doc.page_count(), 3);

    // Default 2x device scale doubles the bitmap resolution.
    let bitmap = doc.bitmap.unwrap();
    assert_eq!(bitmap.width(), 420);
}

#[tokio::test]
async fn test_missing_backend_is_unsupported() {
    let tiler = RasterTiler::new(None);
    assert!(!tiler.is_supported());

    let err = tiler.tile(&view()).await.unwrap_err();
    assert!(matches!(err, Error::UnsupportedCapability(_)));
}

#[tokio::test]
async fn test_cross_origin_refused() {
    let capture = ImageCapture::from_image(image_of_pages(1.0)).with_cross_origin_content(true);
    let tiler = RasterTiler::new(Some(Arc::new(capture)))
        .with_options(CaptureOptions::default().with_cross_origin(false));

    let err = tiler.tile(&view()).await.unwrap_err();
    assert!(matches!(err, Error::Capture(_)));
}

#[tokio::test]
async fn test_empty_capture_fails() {
    let backend = Arc::new(CountingCapture {
        calls: AtomicUsize::new(0),
        bitmap: RgbaImage::new(0, 0),
    });
    let tiler = RasterTiler::new(Some(backend.clone()));

    let err = tiler.tile(&view()).await.unwrap_err();
    assert!(matches!(err, Error::EmptyCapture));
    assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_capture_runs_once_per_export() {
    let backend = Arc::new(CountingCapture {
        calls: AtomicUsize::new(0),
        bitmap: RgbaImage::from_pixel(100, 500, Rgba([255, 255, 255, 0])),
    });
    let tiler = RasterTiler::new(Some(backend.clone()));

    let artifact = sheetflow::export::export_raster(&view(), &tiler, &ExportOptions::default())
        .await
        .unwrap();
    assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    // 500 px tall at 100 px wide is 1050mm, which needs 4 pages.
    assert_eq!(artifact.page_count, 4);
    assert_eq!(artifact.filename, "ChargeSheet_Draft.pdf");
}

#[tokio::test]
async fn test_tiny_page_height_rejected_before_capture() {
    let backend = Arc::new(CountingCapture {
        calls: AtomicUsize::new(0),
        bitmap: RgbaImage::from_pixel(100, 500, Rgba([0, 0, 0, 255])),
    });
    let tiler = RasterTiler::new(Some(backend.clone()));
    let options = ExportOptions::from_json(r#"{ "geometry": { "height_mm": 0.001 } }"#).unwrap();

    let err = sheetflow::export::export_raster(&view(), &tiler, &options)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidOptions(_)));
    assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
}
