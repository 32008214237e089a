//! Inline span types.

use serde::{Deserialize, Serialize};

/// One contiguous run of inline text, tagged bold or plain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// The literal characters, with any bold markers already stripped
    pub text: String,

    /// Whether the run was enclosed in `**` markers
    pub bold: bool,
}

impl Span {
    /// Create a plain (non-bold) span.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
        }
    }

    /// Create a bold span.
    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
        }
    }

    /// Check if this span carries no text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Concatenate the text of a span sequence.
pub fn spans_text(spans: &[Span]) -> String {
    spans.iter().map(|s| s.text.as_str()).collect()
}
