//! Export options and configuration.

use serde::{Deserialize, Serialize};

use crate::render::{RenderOptions, SignatureBlock, DEFAULT_BULLET, DEFAULT_TITLE};

use super::action::{artifact_filename, sanitize_identifier};
use super::geometry::PageGeometry;

/// Filename prefix of exported artifacts.
pub const DEFAULT_PREFIX: &str = "ChargeSheet";

/// Options shared by the vector and raster export paths.
///
/// Every field has a default, so a JSON config file only needs the
/// fields it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Filename prefix
    pub prefix: String,

    /// Case identifier used in the filename (None = "Draft")
    pub identifier: Option<String>,

    /// Title drawn at the top of the first page (None = no title)
    pub title: Option<String>,

    /// Signature block labels
    pub signature: SignatureBlock,

    /// Draw a "Page n/N" footer on every vector page
    pub page_numbers: bool,

    /// Author recorded in the PDF metadata
    pub author: Option<String>,

    /// Page geometry
    pub geometry: PageGeometry,

    /// Glyph drawn in front of bullet items
    pub bullet_glyph: char,
}

impl ExportOptions {
    /// Create new export options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a JSON document.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| crate::Error::InvalidOptions(format!("export config: {}", e)))
    }

    /// Set the filename prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the case identifier.
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Remove the document title.
    pub fn without_title(mut self) -> Self {
        self.title = None;
        self
    }

    /// Set the signature block labels.
    pub fn with_signature_labels(mut self, signature: SignatureBlock) -> Self {
        self.signature = signature;
        self
    }

    /// Enable or disable the page-number footer.
    pub fn with_page_numbers(mut self, enabled: bool) -> Self {
        self.page_numbers = enabled;
        self
    }

    /// Set the PDF author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set the page geometry.
    pub fn with_geometry(mut self, geometry: PageGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Set the bullet glyph.
    pub fn with_bullet_glyph(mut self, glyph: char) -> Self {
        self.bullet_glyph = glyph;
        self
    }

    /// Filename of the artifact these options produce.
    pub fn filename(&self) -> String {
        artifact_filename(&self.prefix, &sanitize_identifier(self.identifier.as_deref()))
    }

    /// Screen options showing the same title, labels and bullet glyph.
    pub fn render_options(&self) -> RenderOptions {
        let options = RenderOptions::new()
            .with_signature_labels(self.signature.clone())
            .with_bullet_glyph(self.bullet_glyph);
        match self.title {
            Some(ref title) => options.with_title(title.clone()),
            None => options.without_title(),
        }
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            identifier: None,
            title: Some(DEFAULT_TITLE.to_string()),
            signature: SignatureBlock::default(),
            page_numbers: false,
            author: None,
            geometry: PageGeometry::A4,
            bullet_glyph: DEFAULT_BULLET,
        }
    }
}
