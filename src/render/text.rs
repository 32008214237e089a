//! Plain text rendering.

use crate::model::Document;
use crate::parser::build_document;

/// Convert a document to plain text, markers stripped, one line per block.
pub fn to_text(doc: &Document) -> String {
    doc.plain_text().trim_end().to_string()
}

/// Classify a text blob and render it straight back to plain text.
pub fn text_to_plain(text: &str) -> String {
    to_text(&build_document(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_text() {
        let out = text_to_plain("# Title\n- **Knife**\nName: Ravi\n\n");
        assert_eq!(out, "Title\nKnife\nName: Ravi");
    }
}
