//! Helvetica font metrics and word wrapping.
//!
//! The vector export uses the two standard PDF fonts Helvetica and
//! Helvetica-Bold, which viewers supply themselves. Their advance widths
//! are fixed by the Adobe core font metrics, so text can be measured
//! without loading any font file.

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use super::geometry::pt_to_mm;

/// One of the two standard faces used by the vector export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFace {
    /// Helvetica
    #[default]
    Regular,
    /// Helvetica-Bold
    Bold,
}

impl FontFace {
    /// PostScript name of the face.
    pub fn base_font(&self) -> &'static str {
        match self {
            FontFace::Regular => "Helvetica",
            FontFace::Bold => "Helvetica-Bold",
        }
    }

    /// Resource name used inside page content streams.
    pub fn resource_name(&self) -> &'static str {
        match self {
            FontFace::Regular => "F1",
            FontFace::Bold => "F2",
        }
    }

    fn widths(&self) -> &'static [u16; 224] {
        match self {
            FontFace::Regular => &HELVETICA,
            FontFace::Bold => &HELVETICA_BOLD,
        }
    }
}

/// Advance widths (1/1000 em) for WinAnsi codes 0x20 through 0xFF.
/// Codes with no glyph (0x7F, 0x81, 0x8D, 0x8F, 0x90, 0x9D) are 0.
#[rustfmt::skip]
const HELVETICA: [u16; 224] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, 0,
    556, 0, 222, 556, 333, 1000, 556, 556, 333, 1000, 667, 333, 1000, 0, 611, 0,
    0, 222, 222, 333, 333, 350, 556, 1000, 333, 1000, 500, 333, 944, 0, 500, 667,
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 224] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, 0,
    556, 0, 278, 556, 500, 1000, 556, 556, 333, 1000, 667, 333, 1000, 0, 611, 0,
    0, 278, 278, 500, 500, 350, 556, 1000, 333, 1000, 556, 333, 944, 0, 500, 667,
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    611, 611, 611, 611, 611, 611, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278,
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556,
];

/// Code drawn for characters with no WinAnsi code.
pub const REPLACEMENT_CODE: u8 = b'?';

/// WinAnsi code of a character, if the standard fonts can draw it.
///
/// Tabs are drawn as spaces.
pub fn win_ansi_code(ch: char) -> Option<u8> {
    let code = ch as u32;
    match code {
        0x20..=0x7e | 0xa0..=0xff => Some(code as u8),
        0x09 => Some(b' '),
        _ => Some(match ch {
            '€' => 0x80,
            '‚' => 0x82,
            'ƒ' => 0x83,
            '„' => 0x84,
            '…' => 0x85,
            '†' => 0x86,
            '‡' => 0x87,
            'ˆ' => 0x88,
            '‰' => 0x89,
            'Š' => 0x8a,
            '‹' => 0x8b,
            'Œ' => 0x8c,
            'Ž' => 0x8e,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '˜' => 0x98,
            '™' => 0x99,
            'š' => 0x9a,
            '›' => 0x9b,
            'œ' => 0x9c,
            'ž' => 0x9e,
            'Ÿ' => 0x9f,
            _ => return None,
        }),
    }
}

/// Advance of `ch` as drawn, measuring unmapped characters as the replacement.
fn advance(face: FontFace, ch: char) -> u16 {
    let code = win_ansi_code(ch).unwrap_or(REPLACEMENT_CODE);
    face.widths()[(code - 0x20) as usize]
}

/// Width of `text` in points at `size_pt`.
pub fn text_width_pt(text: &str, face: FontFace, size_pt: f32) -> f32 {
    let units: u32 = text.nfc().map(|ch| advance(face, ch) as u32).sum();
    units as f32 * size_pt / 1000.0
}

/// Width of `text` in millimetres at `size_pt`.
pub fn text_width_mm(text: &str, face: FontFace, size_pt: f32) -> f32 {
    pt_to_mm(text_width_pt(text, face, size_pt))
}

/// Greedily wrap `text` into lines no wider than `max_width_mm`.
///
/// Words are separated by single spaces; runs of spaces survive inside a
/// line, and the spaces at a break are dropped. A word wider than the limit
/// on its own is split between characters. Always returns at least one
/// line, which is empty for empty input.
pub fn split_text_to_size(text: &str, max_width_mm: f32, face: FontFace, size_pt: f32) -> Vec<String> {
    let space = text_width_mm(" ", face, size_pt);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0f32;
    let mut line_has_content = false;

    for word in text.split(' ') {
        let word_width = text_width_mm(word, face, size_pt);

        if line_has_content && current_width + space + word_width > max_width_mm {
            lines.push(std::mem::take(&mut current));
            current_width = 0.0;
            line_has_content = false;
        } else if line_has_content {
            current.push(' ');
            current_width += space;
        }

        // Extra spaces never start a line.
        if word.is_empty() && !line_has_content {
            continue;
        }

        if word_width > max_width_mm && !word.is_empty() {
            for piece in split_long_word(word, max_width_mm, face, size_pt) {
                if line_has_content {
                    lines.push(std::mem::take(&mut current));
                }
                current_width = text_width_mm(&piece, face, size_pt);
                current = piece;
                line_has_content = true;
            }
            continue;
        }

        current.push_str(word);
        current_width += word_width;
        line_has_content = true;
    }

    if line_has_content || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Split a single word into pieces that each fit `max_width_mm`.
fn split_long_word(word: &str, max_width_mm: f32, face: FontFace, size_pt: f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut width = 0.0f32;

    for ch in word.chars() {
        let w = text_width_mm(ch.encode_utf8(&mut [0u8; 4]), face, size_pt);
        if !piece.is_empty() && width + w > max_width_mm {
            pieces.push(std::mem::take(&mut piece));
            width = 0.0;
        }
        piece.push(ch);
        width += w;
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}
