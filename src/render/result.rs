//! Document statistics.

use crate::model::{Block, BlockKind, Document};
use serde::{Deserialize, Serialize};

/// Statistics collected from a classified document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStats {
    /// Total number of blocks (source lines)
    pub block_count: u32,

    /// Number of headings
    pub heading_count: u32,

    /// Number of section titles
    pub section_title_count: u32,

    /// Number of bullet items
    pub bullet_count: u32,

    /// Number of key-value lines
    pub key_value_count: u32,

    /// Number of paragraphs
    pub paragraph_count: u32,

    /// Number of blank lines
    pub spacer_count: u32,

    /// Number of bold spans
    pub bold_span_count: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count (excluding whitespace)
    pub char_count: u32,
}

impl DocumentStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect statistics for a whole document.
    pub fn collect(doc: &Document) -> Self {
        let mut stats = Self::new();
        for block in doc {
            stats.add_block(block);
        }
        stats
    }

    /// Count one block.
    pub fn add_block(&mut self, block: &Block) {
        self.block_count += 1;
        match block.kind() {
            BlockKind::Heading => self.heading_count += 1,
            BlockKind::SectionTitle => self.section_title_count += 1,
            BlockKind::Bullet => self.bullet_count += 1,
            BlockKind::KeyValue => self.key_value_count += 1,
            BlockKind::Paragraph => self.paragraph_count += 1,
            BlockKind::Spacer => self.spacer_count += 1,
        }

        let bold = match block {
            Block::KeyValue { key, value } => key.iter().chain(value).filter(|s| s.bold).count(),
            other => other.spans().iter().filter(|s| s.bold).count(),
        };
        self.bold_span_count += bold as u32;
        self.count_text(&block.plain_text());
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }

    /// Count of blocks of one kind.
    pub fn count_of(&self, kind: BlockKind) -> u32 {
        match kind {
            BlockKind::Heading => self.heading_count,
            BlockKind::SectionTitle => self.section_title_count,
            BlockKind::Bullet => self.bullet_count,
            BlockKind::KeyValue => self.key_value_count,
            BlockKind::Paragraph => self.paragraph_count,
            BlockKind::Spacer => self.spacer_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::build_document;

    #[test]
    fn test_collect_counts_kinds() {
        let doc = build_document("# A\nB:\n- c\nD: e\nplain **f**\n");
        let stats = DocumentStats::collect(&doc);

        assert_eq!(stats.block_count, 6);
        assert_eq!(stats.heading_count, 1);
        assert_eq!(stats.section_title_count, 1);
        assert_eq!(stats.bullet_count, 1);
        assert_eq!(stats.key_value_count, 1);
        assert_eq!(stats.paragraph_count, 1);
        assert_eq!(stats.spacer_count, 1);
        assert_eq!(stats.bold_span_count, 1);
        assert_eq!(stats.count_of(BlockKind::Bullet), 1);
    }

    #[test]
    fn test_count_text() {
        let mut stats = DocumentStats::new();
        stats.count_text("Hello, world! This is a test.");

        assert_eq!(stats.word_count, 6);
        assert_eq!(stats.char_count, 24);
    }
}
