//! Fixed-page PDF export.
//!
//! Two paths produce the same kind of artifact:
//!
//! - the vector path lays the raw text out as positioned text runs
//!   ([`VectorPaginator`]);
//! - the raster path captures the rendered screen view once and tiles the
//!   bitmap across pages ([`RasterTiler`]).
//!
//! Both finish in [`write_pdf`] and name the artifact from the sanitized
//! case identifier. [`run_export`] and [`run_export_async`] wrap either
//! path with the print/download action and the user-facing error notice.

pub mod action;
pub mod geometry;
pub mod metrics;
pub mod options;
pub mod page;
pub mod pdf;
pub mod raster;
pub mod vector;

pub use action::{
    artifact_filename, run_export, run_export_async, sanitize_identifier, Artifact, ArtifactSink,
    DirectorySink, ExportAction, ExportNotice, DRAFT_IDENTIFIER,
};
pub use geometry::{mm_to_pt, pt_to_mm, PageGeometry, MIN_PAGE_SIDE_MM, PT_PER_MM};
pub use metrics::{split_text_to_size, text_width_mm, win_ansi_code, FontFace};
pub use options::{ExportOptions, DEFAULT_PREFIX};
pub use page::{ExportPage, PageContent, PaginatedDocument, RasterPlacement, TextAlign, TextOp};
pub use pdf::{encode_win_ansi, with_auto_print, write_pdf, PdfMetadata};
pub use raster::{tile_bitmap, tile_offsets, CaptureBackend, CaptureOptions, ImageCapture, RasterTiler};
pub use vector::{LayoutState, PageStream, VectorPaginator};

use crate::error::Result;
use crate::render::ScreenView;

/// Paginate raw text onto vector pages.
pub fn paginate_vector(text: &str, options: &ExportOptions) -> Result<PaginatedDocument> {
    VectorPaginator::new(options).paginate(text)
}

/// Produce a vector PDF artifact from raw text.
pub fn export_vector(text: &str, options: &ExportOptions) -> Result<Artifact> {
    let doc = paginate_vector(text, options)?;
    to_artifact(&doc, options)
}

/// Produce a raster PDF artifact from a rendered view.
///
/// The tiler's page geometry is replaced by the one in `options`.
pub async fn export_raster(
    view: &ScreenView,
    tiler: &RasterTiler,
    options: &ExportOptions,
) -> Result<Artifact> {
    let tiler = tiler.clone().with_geometry(options.geometry);
    let doc = tiler.tile(view).await?;
    to_artifact(&doc, options)
}

/// Serialize a paginated document and name it.
pub fn to_artifact(doc: &PaginatedDocument, options: &ExportOptions) -> Result<Artifact> {
    let metadata = PdfMetadata {
        title: options.title.clone(),
        author: options.author.clone(),
    };
    let bytes = write_pdf(doc, &metadata)?;
    Ok(Artifact::new(options.filename(), bytes, doc.page_count()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_vector_names_artifact() {
        let options = ExportOptions::default().with_identifier("FIR 12/2024!");
        let artifact = export_vector("# Facts\nName: Ravi\n- Knife", &options).unwrap();
        assert_eq!(artifact.filename, "ChargeSheet_FIR_12_2024_.pdf");
        assert_eq!(artifact.page_count, 1);
        assert!(artifact.bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_export_vector_rejects_bad_geometry() {
        let options = ExportOptions::default().with_geometry(PageGeometry {
            height_mm: -1.0,
            ..PageGeometry::A4
        });
        assert!(export_vector("x", &options).is_err());
    }
}
