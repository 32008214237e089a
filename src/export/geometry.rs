//! Page geometry for A4 exports.
//!
//! All positions are in millimetres measured from the top-left corner of
//! the page, the way the layout is specified. Conversion to PDF points
//! (bottom-left origin) happens only in the PDF writer.

use serde::{Deserialize, Serialize};

/// Smallest page side accepted by [`PageGeometry::validate`].
pub const MIN_PAGE_SIDE_MM: f32 = 50.0;

/// Points per millimetre (72 pt per inch, 25.4 mm per inch).
pub const PT_PER_MM: f32 = 72.0 / 25.4;

/// Convert millimetres to PDF points.
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * PT_PER_MM
}

/// Convert PDF points to millimetres.
pub fn pt_to_mm(pt: f32) -> f32 {
    pt / PT_PER_MM
}

/// Layout constants of an exported page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageGeometry {
    /// Page width
    pub width_mm: f32,
    /// Page height
    pub height_mm: f32,
    /// Left margin for body text and headings
    pub margin_left_mm: f32,
    /// Left edge of bullet items
    pub bullet_left_mm: f32,
    /// Right edge used by right-aligned captions
    pub right_edge_mm: f32,
    /// Baseline of the document title
    pub title_y_mm: f32,
    /// Cursor start on the first page, below the title
    pub first_page_top_mm: f32,
    /// Cursor start on every later page
    pub page_top_mm: f32,
    /// A cursor beyond this forces a page break
    pub body_limit_mm: f32,
    /// Maximum width of a wrapped body line
    pub wrap_width_mm: f32,
    /// A cursor beyond this moves the signature block to a new page
    pub signature_limit_mm: f32,
    /// Baseline of the optional page-number footer
    pub footer_y_mm: f32,
    /// Advance for a blank line
    pub spacer_advance_mm: f32,
    /// Advance after a heading or section title
    pub heading_advance_mm: f32,
    /// Advance after a bullet or a wrapped body line
    pub line_advance_mm: f32,
    /// Offset of the first signature line below the cursor
    pub signature_first_offset_mm: f32,
    /// Offset of the second signature line below the cursor
    pub signature_second_offset_mm: f32,
    /// Body font size
    pub body_size_pt: f32,
    /// Heading font size
    pub heading_size_pt: f32,
    /// Title font size
    pub title_size_pt: f32,
    /// Designation caption font size
    pub caption_size_pt: f32,
    /// Page-number footer font size
    pub footer_size_pt: f32,
}

impl PageGeometry {
    /// The A4 portrait layout.
    pub const A4: PageGeometry = PageGeometry {
        width_mm: 210.0,
        height_mm: 297.0,
        margin_left_mm: 15.0,
        bullet_left_mm: 20.0,
        right_edge_mm: 195.0,
        title_y_mm: 20.0,
        first_page_top_mm: 35.0,
        page_top_mm: 20.0,
        body_limit_mm: 280.0,
        wrap_width_mm: 180.0,
        signature_limit_mm: 250.0,
        footer_y_mm: 290.0,
        spacer_advance_mm: 4.0,
        heading_advance_mm: 8.0,
        line_advance_mm: 6.0,
        signature_first_offset_mm: 15.0,
        signature_second_offset_mm: 22.0,
        body_size_pt: 11.0,
        heading_size_pt: 12.0,
        title_size_pt: 14.0,
        caption_size_pt: 9.0,
        footer_size_pt: 8.0,
    };

    /// Horizontal centre of the page.
    pub fn center_x_mm(&self) -> f32 {
        self.width_mm / 2.0
    }

    /// Number of wrapped body lines that fit on the first page.
    pub fn first_page_line_capacity(&self) -> usize {
        lines_until_break(self.first_page_top_mm, self.body_limit_mm, self.line_advance_mm)
    }

    /// Check the geometry for values that would stall or invert the layout.
    pub fn validate(&self) -> crate::Result<()> {
        let positive = [
            ("width_mm", self.width_mm),
            ("height_mm", self.height_mm),
            ("wrap_width_mm", self.wrap_width_mm),
            ("line_advance_mm", self.line_advance_mm),
            ("heading_advance_mm", self.heading_advance_mm),
            ("body_size_pt", self.body_size_pt),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(crate::Error::InvalidOptions(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        for (name, value) in [("width_mm", self.width_mm), ("height_mm", self.height_mm)] {
            if value < MIN_PAGE_SIDE_MM {
                return Err(crate::Error::InvalidOptions(format!(
                    "{} must be at least {}mm, got {}",
                    name, MIN_PAGE_SIDE_MM, value
                )));
            }
        }
        if !(self.body_limit_mm < self.height_mm) {
            return Err(crate::Error::InvalidOptions(format!(
                "body_limit_mm ({}) must be above the page bottom ({})",
                self.body_limit_mm, self.height_mm
            )));
        }
        if !(self.page_top_mm >= 0.0) || self.page_top_mm > self.body_limit_mm {
            return Err(crate::Error::InvalidOptions(format!(
                "page_top_mm ({}) must lie between 0 and body_limit_mm ({})",
                self.page_top_mm, self.body_limit_mm
            )));
        }
        Ok(())
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::A4
    }
}

/// Lines drawn from `top` in steps of `advance` before the cursor exceeds `limit`.
fn lines_until_break(top: f32, limit: f32, advance: f32) -> usize {
    let mut y = top;
    let mut count = 0;
    while y <= limit {
        count += 1;
        y += advance;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mm_pt_conversion() {
        assert!((mm_to_pt(25.4) - 72.0).abs() < 1e-4);
        assert!((pt_to_mm(72.0) - 25.4).abs() < 1e-4);
        assert!((mm_to_pt(210.0) - 595.28).abs() < 0.01);
    }

    #[test]
    fn test_first_page_capacity() {
        // Lines at 35, 41, ..., 275; the cursor then reads 281.
        assert_eq!(PageGeometry::A4.first_page_line_capacity(), 41);
    }

    #[test]
    fn test_validate() {
        assert!(PageGeometry::A4.validate().is_ok());

        let broken = PageGeometry {
            line_advance_mm: 0.0,
            ..PageGeometry::A4
        };
        assert!(broken.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_tiny_page() {
        let tiny = PageGeometry {
            height_mm: 0.001,
            ..PageGeometry::A4
        };
        assert!(matches!(tiny.validate(), Err(crate::Error::InvalidOptions(_))));

        let narrow = PageGeometry {
            width_mm: 10.0,
            ..PageGeometry::A4
        };
        assert!(narrow.validate().is_err());
    }

    #[test]
    fn test_validate_body_limit_inside_page() {
        let short = PageGeometry {
            height_mm: 200.0,
            ..PageGeometry::A4
        };
        assert!(short.validate().is_err());

        let letter = PageGeometry {
            width_mm: 215.9,
            height_mm: 279.4,
            body_limit_mm: 262.0,
            ..PageGeometry::A4
        };
        assert!(letter.validate().is_ok());
    }

    #[test]
    fn test_partial_deserialize() {
        let geometry: PageGeometry = serde_json::from_str(r#"{"wrap_width_mm": 120}"#).unwrap();
        assert_eq!(geometry.wrap_width_mm, 120.0);
        assert_eq!(geometry.height_mm, 297.0);
    }
}
