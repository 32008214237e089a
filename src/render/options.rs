//! Rendering options and configuration.

use serde::{Deserialize, Serialize};

/// Title printed above generated charge sheets.
pub const DEFAULT_TITLE: &str = "FINAL REPORT UNDER SECTION 173 CrPC (CHARGE SHEET)";

/// Glyph drawn in front of bullet items.
pub const DEFAULT_BULLET: char = '•';

/// Options for the on-screen rendering of a document.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Centered title shown above the content (None = no header)
    pub title: Option<String>,

    /// Append the signature block after the content
    pub include_signature: bool,

    /// Labels used by the signature block
    pub signature: SignatureBlock,

    /// Glyph synthesized in front of bullet items
    pub bullet_glyph: char,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the header title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Remove the header title.
    pub fn without_title(mut self) -> Self {
        self.title = None;
        self
    }

    /// Enable or disable the signature block.
    pub fn with_signature(mut self, include: bool) -> Self {
        self.include_signature = include;
        self
    }

    /// Set the signature block labels.
    pub fn with_signature_labels(mut self, signature: SignatureBlock) -> Self {
        self.signature = signature;
        self
    }

    /// Set the bullet glyph.
    pub fn with_bullet_glyph(mut self, glyph: char) -> Self {
        self.bullet_glyph = glyph;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            title: Some(DEFAULT_TITLE.to_string()),
            include_signature: true,
            signature: SignatureBlock::default(),
            bullet_glyph: DEFAULT_BULLET,
        }
    }
}

/// Labels of the closing signature block.
///
/// Shared by the screen view and the vector export so both show the same
/// wording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignatureBlock {
    /// Left label on the first line
    pub date_label: String,

    /// Left label on the second line
    pub place_label: String,

    /// Right-aligned bold caption
    pub signatory: String,

    /// Smaller right-aligned caption under the signatory
    pub designation: String,
}

impl SignatureBlock {
    /// Date label followed by a blank rule.
    pub fn date_line(&self) -> String {
        format!("{} {}", self.date_label, BLANK_RULE)
    }

    /// Place label followed by a blank rule.
    pub fn place_line(&self) -> String {
        format!("{} {}", self.place_label, BLANK_RULE)
    }
}

const BLANK_RULE: &str = "_________________";

impl Default for SignatureBlock {
    fn default() -> Self {
        Self {
            date_label: "Date:".to_string(),
            place_label: "Place:".to_string(),
            signatory: "Signature of Officer In-Charge".to_string(),
            designation: "(Name, Rank & Designation)".to_string(),
        }
    }
}
