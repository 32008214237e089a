//! JSON rendering of the document model.

use crate::error::{Error, Result};
use crate::model::Document;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a document to JSON.
pub fn to_json(doc: &Document, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(doc),
        JsonFormat::Compact => serde_json::to_string(doc),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::build_document;

    #[test]
    fn test_to_json_pretty() {
        let doc = build_document("# Facts\nName: Ravi");
        let json = to_json(&doc, JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"type\": \"heading\""));
        assert!(json.contains("\"type\": \"key_value\""));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact_roundtrip() {
        let doc = build_document("- **a** b\n");
        let json = to_json(&doc, JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
        let back: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }
}
