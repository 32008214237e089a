//! Line classification.
//!
//! Maps one raw text line to a block kind. Rules are tried in a fixed order
//! and the first match wins, because a line can satisfy several at once
//! (a bold key-value line may also end with a colon).

use crate::model::BlockKind;

/// Keys of this many characters or more (colon included) are treated as
/// prose rather than a key-value label.
pub const KEY_MAX_CHARS: usize = 60;

/// Marker that disqualifies a key-value split when it appears before the
/// first colon, so URLs are not cut at their scheme.
const URL_MARKER: &str = "http";

/// A classified line, borrowing the display text from the source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass<'a> {
    /// Blank line
    Spacer,
    /// `#`-prefixed heading with the marker run and following whitespace removed
    Heading {
        /// Number of leading `#` characters, clamped to 1-6
        level: u8,
        /// Heading text
        text: &'a str,
    },
    /// Line ending with `:`, kept whole
    SectionTitle(&'a str),
    /// Text after the `- ` prefix
    Bullet(&'a str),
    /// Split at the first colon; the key keeps the colon
    KeyValue {
        /// Text up to and including the colon
        key: &'a str,
        /// Remainder after the colon
        value: &'a str,
    },
    /// Whole line
    Paragraph(&'a str),
}

impl<'a> LineClass<'a> {
    /// Get the block kind for this class.
    pub fn kind(&self) -> BlockKind {
        match self {
            LineClass::Spacer => BlockKind::Spacer,
            LineClass::Heading { .. } => BlockKind::Heading,
            LineClass::SectionTitle(_) => BlockKind::SectionTitle,
            LineClass::Bullet(_) => BlockKind::Bullet,
            LineClass::KeyValue { .. } => BlockKind::KeyValue,
            LineClass::Paragraph(_) => BlockKind::Paragraph,
        }
    }
}

/// Classify a single line.
///
/// Surrounding whitespace is ignored. The classifier keeps no state between
/// calls, so the same line always yields the same class.
pub fn classify_line(line: &str) -> LineClass<'_> {
    let line = line.trim();

    if line.is_empty() {
        return LineClass::Spacer;
    }

    if line.starts_with('#') {
        let rest = line.trim_start_matches('#');
        let hashes = line.len() - rest.len();
        return LineClass::Heading {
            level: hashes.clamp(1, 6) as u8,
            text: rest.trim_start(),
        };
    }

    if line.ends_with(':') {
        return LineClass::SectionTitle(line);
    }

    if let Some(text) = line.strip_prefix("- ") {
        return LineClass::Bullet(text);
    }

    if let Some((key, value)) = split_key_value(line) {
        return LineClass::KeyValue { key, value };
    }

    LineClass::Paragraph(line)
}

/// Split a line into key (colon included) and value, if it qualifies.
fn split_key_value(line: &str) -> Option<(&str, &str)> {
    let colon = line.find(':')?;
    if line[..colon].contains(URL_MARKER) {
        return None;
    }

    let (key, value) = line.split_at(colon + 1);
    if key.chars().count() >= KEY_MAX_CHARS {
        return None;
    }
    Some((key, value))
}

/// Classify every line of a text blob.
pub fn classify_lines(text: &str) -> impl Iterator<Item = LineClass<'_>> {
    text.split('\n').map(classify_line)
}
