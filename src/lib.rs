//! # sheetflow
//!
//! Rendering and fixed-page PDF export for generated charge-sheet text.
//!
//! Input is plain newline-delimited text that may use `#` headings,
//! `- ` bullets, `key:` pairs and `**bold**` spans. One shared line grammar
//! classifies it; the result is shown on screen as a styled view or
//! exported to A4 PDF, either as positioned vector text or as a tiled
//! bitmap of the rendered view.
//!
//! ## Quick Start
//!
//! ```no_run
//! use sheetflow::{export, parse_text, render};
//!
//! fn main() -> sheetflow::Result<()> {
//!     let text = std::fs::read_to_string("draft.txt")?;
//!
//!     // On-screen view
//!     let doc = parse_text(&text);
//!     let view = render::render_screen(&doc, &render::RenderOptions::default());
//!     println!("{}", render::to_html(&view));
//!
//!     // Vector PDF
//!     let options = export::ExportOptions::default().with_identifier("FIR 12/2024");
//!     let artifact = export::export_vector(&text, &options)?;
//!     std::fs::write(&artifact.filename, &artifact.bytes)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **One grammar**: headings, section titles, bullets, key-value pairs,
//!   paragraphs and spacers, with inline bold spans
//! - **Screen view**: typed style tree with an HTML serializer
//! - **Vector export**: A4 pages with wrapping, page breaks and a signature block
//! - **Raster export**: one captured bitmap tiled across pages without gaps
//! - **Export actions**: print or download, with failures reported as notices

pub mod error;
pub mod export;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use error::{Error, Result};
pub use export::{
    Artifact, ArtifactSink, CaptureBackend, CaptureOptions, DirectorySink, ExportAction,
    ExportNotice, ExportOptions, ImageCapture, PageGeometry, PaginatedDocument, RasterTiler,
    VectorPaginator,
};
pub use model::{Block, BlockKind, Document, Span};
pub use parser::{build_document, classify_line, tokenize, LineClass};
pub use render::{DocumentStats, JsonFormat, RenderOptions, ScreenView, SignatureBlock};

use std::path::Path;

/// Classify text into a document.
///
/// # Example
///
/// ```
/// use sheetflow::{parse_text, BlockKind};
///
/// let doc = parse_text("# Facts\nName: Ravi");
/// assert_eq!(doc.blocks()[1].kind(), BlockKind::KeyValue);
/// ```
pub fn parse_text(text: &str) -> Document {
    build_document(text)
}

/// Read a UTF-8 text file and classify it.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    let text = std::fs::read_to_string(path)?;
    Ok(build_document(&text))
}

/// Render text as an HTML fragment with default options.
pub fn to_html(text: &str) -> String {
    render::to_html(&render::render_screen(
        &build_document(text),
        &RenderOptions::default(),
    ))
}

/// Render text as plain text with markers stripped.
pub fn to_text(text: &str) -> String {
    render::text_to_plain(text)
}

/// Render the classified document as JSON.
///
/// # Example
///
/// ```
/// use sheetflow::{to_json, JsonFormat};
///
/// let json = to_json("- **Knife**", JsonFormat::Compact).unwrap();
/// assert!(json.contains("\"bullet\""));
/// ```
pub fn to_json(text: &str, format: JsonFormat) -> Result<String> {
    render::to_json(&build_document(text), format)
}

/// Export text as a vector PDF with default options.
pub fn to_pdf(text: &str) -> Result<Artifact> {
    export::export_vector(text, &ExportOptions::default())
}

/// Builder for rendering and exporting one text.
///
/// # Example
///
/// ```no_run
/// use sheetflow::Sheetflow;
///
/// let artifact = Sheetflow::new()
///     .with_identifier("FIR 12/2024")
///     .with_page_numbers()
///     .parse("# Facts\nName: Ravi")
///     .export_pdf()?;
/// std::fs::write(&artifact.filename, &artifact.bytes)?;
/// # Ok::<(), sheetflow::Error>(())
/// ```
pub struct Sheetflow {
    render_options: RenderOptions,
    export_options: ExportOptions,
}

impl Sheetflow {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            render_options: RenderOptions::default(),
            export_options: ExportOptions::default(),
        }
    }

    /// Use these export options; the screen view follows their title and labels.
    pub fn with_export_options(mut self, options: ExportOptions) -> Self {
        self.render_options = options
            .render_options()
            .with_signature(self.render_options.include_signature);
        self.export_options = options;
        self
    }

    /// Set the case identifier used in the filename.
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.export_options = self.export_options.with_identifier(identifier);
        self
    }

    /// Set the title on screen and on the first exported page.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        let title = title.into();
        self.render_options = self.render_options.with_title(title.clone());
        self.export_options = self.export_options.with_title(title);
        self
    }

    /// Draw page numbers on vector pages.
    pub fn with_page_numbers(mut self) -> Self {
        self.export_options = self.export_options.with_page_numbers(true);
        self
    }

    /// Hide the signature block on screen. Exports always carry it.
    pub fn without_screen_signature(mut self) -> Self {
        self.render_options = self.render_options.with_signature(false);
        self
    }

    /// Classify `text` and keep it for rendering and export.
    pub fn parse(self, text: impl Into<String>) -> SheetflowResult {
        let text = text.into();
        let document = build_document(&text);
        SheetflowResult {
            document,
            text,
            render_options: self.render_options,
            export_options: self.export_options,
        }
    }

    /// Read a text file and classify it.
    pub fn parse_file<P: AsRef<Path>>(self, path: P) -> Result<SheetflowResult> {
        let text = std::fs::read_to_string(path)?;
        Ok(self.parse(text))
    }
}

impl Default for Sheetflow {
    fn default() -> Self {
        Self::new()
    }
}

/// A classified text with its rendering and export options.
pub struct SheetflowResult {
    /// The classified document
    pub document: Document,
    text: String,
    render_options: RenderOptions,
    export_options: ExportOptions,
}

impl SheetflowResult {
    /// Build the on-screen view.
    pub fn screen(&self) -> ScreenView {
        render::render_screen(&self.document, &self.render_options)
    }

    /// Render the on-screen view as HTML.
    pub fn to_html(&self) -> String {
        render::to_html(&self.screen())
    }

    /// Render as plain text.
    pub fn to_text(&self) -> String {
        render::to_text(&self.document)
    }

    /// Render as JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Count blocks, words and characters.
    pub fn stats(&self) -> DocumentStats {
        DocumentStats::collect(&self.document)
    }

    /// Lay the text out on vector pages without serializing.
    pub fn paginate(&self) -> Result<PaginatedDocument> {
        export::paginate_vector(&self.text, &self.export_options)
    }

    /// Export as a vector PDF.
    pub fn export_pdf(&self) -> Result<Artifact> {
        export::export_vector(&self.text, &self.export_options)
    }

    /// Export as a raster PDF by capturing the on-screen view.
    pub async fn export_raster(&self, tiler: &RasterTiler) -> Result<Artifact> {
        export::export_raster(&self.screen(), tiler, &self.export_options).await
    }

    /// Filename the export artifacts are saved under.
    pub fn filename(&self) -> String {
        self.export_options.filename()
    }

    /// Get the source text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheetflow_builder() {
        let result = Sheetflow::new()
            .with_identifier("FIR 9")
            .with_title("Draft Report")
            .with_page_numbers()
            .parse("# Facts\n- Knife");

        assert_eq!(result.filename(), "ChargeSheet_FIR_9.pdf");
        assert_eq!(result.screen().title.as_deref(), Some("Draft Report"));
        assert_eq!(result.document.len(), 2);
    }

    #[test]
    fn test_builder_default_filename() {
        let result = Sheetflow::default().parse("x");
        assert_eq!(result.filename(), "ChargeSheet_Draft.pdf");
    }

    #[test]
    fn test_without_screen_signature() {
        let result = Sheetflow::new().without_screen_signature().parse("x");
        assert!(result.screen().signature.is_none());

        let pages = result.paginate().unwrap();
        let ops = pages.pages[0].text_ops();
        assert!(ops.iter().any(|op| op.text == "Signature of Officer In-Charge"));
    }

    #[test]
    fn test_export_options_drive_screen() {
        let result = Sheetflow::new()
            .with_export_options(ExportOptions::default().without_title())
            .parse("x");
        assert!(result.screen().title.is_none());
    }

    #[test]
    fn test_convenience_functions() {
        assert_eq!(to_text("# **Facts**"), "Facts");
        assert!(to_html("- a").contains("block bullet"));
        assert!(to_json("a", JsonFormat::Compact).unwrap().contains("paragraph"));
        assert_eq!(to_pdf("a").unwrap().page_count, 1);
    }

    #[test]
    fn test_parse_file_missing() {
        let result = parse_file("/nonexistent/draft.txt");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_stats() {
        let stats = Sheetflow::new().parse("# Facts\nName: **Ravi**").stats();
        assert_eq!(stats.count_of(BlockKind::Heading), 1);
        assert_eq!(stats.count_of(BlockKind::KeyValue), 1);
        assert_eq!(stats.bold_span_count, 1);
    }
}
