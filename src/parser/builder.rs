//! Document model builder.

use super::{classify_line, tokenize, LineClass};
use crate::model::{Block, Document};

/// Build a [`Document`] from a text blob.
///
/// Splits on line feeds (a trailing `\r` is dropped with the rest of the
/// surrounding whitespace), classifies every line and tokenizes its text.
/// The result has exactly one block per source line.
pub fn build_document(text: &str) -> Document {
    let blocks = text
        .split('\n')
        .map(|line| block_from_class(classify_line(line)))
        .collect::<Vec<_>>();
    log::debug!("built document with {} blocks", blocks.len());
    Document::from_blocks(blocks)
}

/// Convert a classified line into a block.
pub fn block_from_class(class: LineClass<'_>) -> Block {
    match class {
        LineClass::Spacer => Block::Spacer,
        LineClass::Heading { level, text } => Block::Heading {
            level,
            spans: tokenize(text),
        },
        LineClass::SectionTitle(text) => Block::SectionTitle {
            spans: tokenize(text),
        },
        LineClass::Bullet(text) => Block::Bullet {
            spans: tokenize(text),
        },
        LineClass::KeyValue { key, value } => Block::KeyValue {
            key: tokenize(key),
            value: tokenize(value),
        },
        LineClass::Paragraph(text) => Block::Paragraph {
            spans: tokenize(text),
        },
    }
}
