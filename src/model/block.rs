//! Block-level types.

use super::{spans_text, Span};
use serde::{Deserialize, Serialize};

/// The kind of a classified block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// A `#`-prefixed heading
    Heading,
    /// A line ending with a colon
    SectionTitle,
    /// A `- ` bullet line
    Bullet,
    /// A short `key: value` line
    KeyValue,
    /// Any other non-blank line
    Paragraph,
    /// A blank line
    Spacer,
}

impl BlockKind {
    /// Lowercase name, used in HTML classes and CLI output.
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Heading => "heading",
            BlockKind::SectionTitle => "section_title",
            BlockKind::Bullet => "bullet",
            BlockKind::KeyValue => "key_value",
            BlockKind::Paragraph => "paragraph",
            BlockKind::Spacer => "spacer",
        }
    }
}

/// One classified unit of the source text.
///
/// Every non-blank input line maps to exactly one block and every blank
/// line maps to exactly one [`Block::Spacer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// A heading; the leading `#` run and following whitespace are stripped
    Heading {
        /// Number of leading `#` characters, clamped to 1-6
        level: u8,
        /// Heading text
        spans: Vec<Span>,
    },

    /// A section title; the trailing colon is kept
    SectionTitle {
        /// Title text including the colon
        spans: Vec<Span>,
    },

    /// A bullet item; the glyph is synthesized by renderers
    Bullet {
        /// Text after the `- ` prefix
        spans: Vec<Span>,
    },

    /// A key-value line split at the first colon
    KeyValue {
        /// Text up to and including the first colon
        key: Vec<Span>,
        /// Remainder after the colon
        value: Vec<Span>,
    },

    /// A plain paragraph, rendered justified
    Paragraph {
        /// Paragraph text
        spans: Vec<Span>,
    },

    /// A blank line
    Spacer,
}

impl Block {
    /// Get the kind of this block.
    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Heading { .. } => BlockKind::Heading,
            Block::SectionTitle { .. } => BlockKind::SectionTitle,
            Block::Bullet { .. } => BlockKind::Bullet,
            Block::KeyValue { .. } => BlockKind::KeyValue,
            Block::Paragraph { .. } => BlockKind::Paragraph,
            Block::Spacer => BlockKind::Spacer,
        }
    }

    /// Get the spans of this block.
    ///
    /// Key-value blocks keep their spans in `key` and `value`, so this
    /// returns an empty slice for them, as it does for spacers.
    pub fn spans(&self) -> &[Span] {
        match self {
            Block::Heading { spans, .. }
            | Block::SectionTitle { spans }
            | Block::Bullet { spans }
            | Block::Paragraph { spans } => spans,
            Block::KeyValue { .. } | Block::Spacer => &[],
        }
    }

    /// Get plain text of the block, with markers stripped.
    pub fn plain_text(&self) -> String {
        match self {
            Block::KeyValue { key, value } => {
                let mut text = spans_text(key);
                text.push_str(&spans_text(value));
                text
            }
            other => spans_text(other.spans()),
        }
    }

    /// Check if this block is a spacer.
    pub fn is_spacer(&self) -> bool {
        matches!(self, Block::Spacer)
    }

    /// Get the heading level, if this is a heading.
    pub fn heading_level(&self) -> Option<u8> {
        match self {
            Block::Heading { level, .. } => Some(*level),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_kind() {
        let block = Block::Bullet {
            spans: vec![Span::plain("item")],
        };
        assert_eq!(block.kind(), BlockKind::Bullet);
        assert_eq!(block.spans().len(), 1);
        assert_eq!(Block::Spacer.kind(), BlockKind::Spacer);
        assert!(Block::Spacer.spans().is_empty());
    }

    #[test]
    fn test_key_value_plain_text() {
        let block = Block::KeyValue {
            key: vec![Span::bold("Name:")],
            value: vec![Span::plain(" John Doe")],
        };
        assert!(block.spans().is_empty());
        assert_eq!(block.plain_text(), "Name: John Doe");
    }

    #[test]
    fn test_heading_level() {
        let block = Block::Heading {
            level: 2,
            spans: vec![Span::plain("Facts")],
        };
        assert_eq!(block.heading_level(), Some(2));
        assert_eq!(Block::Spacer.heading_level(), None);
    }
}
