//! Export page types.

use image::RgbImage;
use serde::{Deserialize, Serialize};

use super::geometry::PageGeometry;
use super::metrics::FontFace;

/// Horizontal anchor of a text run relative to its `x` position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// `x` is the left edge
    #[default]
    Left,
    /// `x` is the centre
    Center,
    /// `x` is the right edge
    Right,
}

/// One positioned text run on a vector page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextOp {
    /// Text to draw
    pub text: String,
    /// Horizontal anchor in mm from the left edge
    pub x_mm: f32,
    /// Baseline in mm from the top edge
    pub y_mm: f32,
    /// Font face
    pub face: FontFace,
    /// Font size in points
    pub size_pt: f32,
    /// How `x_mm` anchors the run
    pub align: TextAlign,
}

impl TextOp {
    /// Create a left-aligned text run.
    pub fn left(text: impl Into<String>, x_mm: f32, y_mm: f32, face: FontFace, size_pt: f32) -> Self {
        Self {
            text: text.into(),
            x_mm,
            y_mm,
            face,
            size_pt,
            align: TextAlign::Left,
        }
    }

    /// Change the anchor of the run.
    pub fn aligned(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }
}

/// Placement of the shared bitmap on a raster page.
///
/// The bitmap is drawn at full page width with its top edge `offset_mm`
/// above the page's top edge; the page boundary clips the rest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RasterPlacement {
    /// Height of the bitmap already shown on earlier pages
    pub offset_mm: f64,
    /// Drawn width of the bitmap
    pub width_mm: f64,
    /// Drawn height of the whole bitmap
    pub height_mm: f64,
}

/// Content of one exported page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageContent {
    /// Positioned text runs
    Vector {
        /// Runs in drawing order
        ops: Vec<TextOp>,
    },
    /// One window onto the document bitmap
    Raster(RasterPlacement),
}

/// One fixed-size page of an export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportPage {
    /// Page number (1-indexed)
    pub number: u32,
    /// Page width in mm
    pub width_mm: f32,
    /// Page height in mm
    pub height_mm: f32,
    /// Content of the page
    pub content: PageContent,
}

impl ExportPage {
    /// Create a vector page.
    pub fn vector(number: u32, geometry: &PageGeometry, ops: Vec<TextOp>) -> Self {
        Self {
            number,
            width_mm: geometry.width_mm,
            height_mm: geometry.height_mm,
            content: PageContent::Vector { ops },
        }
    }

    /// Create a raster page.
    pub fn raster(number: u32, geometry: &PageGeometry, placement: RasterPlacement) -> Self {
        Self {
            number,
            width_mm: geometry.width_mm,
            height_mm: geometry.height_mm,
            content: PageContent::Raster(placement),
        }
    }

    /// Text runs of a vector page; empty for raster pages.
    pub fn text_ops(&self) -> &[TextOp] {
        match &self.content {
            PageContent::Vector { ops } => ops,
            PageContent::Raster(_) => &[],
        }
    }

    /// Concatenated text of the page, one run per line.
    pub fn plain_text(&self) -> String {
        self.text_ops()
            .iter()
            .map(|op| op.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A complete paginated export, ready to serialize.
#[derive(Debug, Clone, Default)]
pub struct PaginatedDocument {
    /// Pages in order
    pub pages: Vec<ExportPage>,
    /// Bitmap shared by every raster page
    pub bitmap: Option<RgbImage>,
}

impl PaginatedDocument {
    /// Create a vector-only document.
    pub fn from_pages(pages: Vec<ExportPage>) -> Self {
        Self {
            pages,
            bitmap: None,
        }
    }

    /// Get the number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_page() {
        let page = ExportPage::vector(
            1,
            &PageGeometry::A4,
            vec![
                TextOp::left("A", 15.0, 35.0, FontFace::Regular, 11.0),
                TextOp::left("B", 195.0, 50.0, FontFace::Bold, 11.0).aligned(TextAlign::Right),
            ],
        );
        assert_eq!(page.width_mm, 210.0);
        assert_eq!(page.text_ops().len(), 2);
        assert_eq!(page.text_ops()[1].align, TextAlign::Right);
        assert_eq!(page.plain_text(), "A\nB");
    }

    #[test]
    fn test_raster_page_has_no_text() {
        let placement = RasterPlacement {
            offset_mm: 297.0,
            width_mm: 210.0,
            height_mm: 700.0,
        };
        let page = ExportPage::raster(2, &PageGeometry::A4, placement);
        assert!(page.text_ops().is_empty());
        assert_eq!(page.content, PageContent::Raster(placement));
    }
}
