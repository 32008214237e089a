//! Inline span tokenizing.
//!
//! Bold runs are written as `**text**`. Splitting uses the nearest closing
//! marker, so `**a** and **b**` yields two bold runs. A marker without a
//! partner is kept as literal text.

use crate::model::Span;
use regex::Regex;
use std::sync::OnceLock;

/// Bold marker used by the generated text.
pub const BOLD_MARKER: &str = "**";

fn bold_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\*\*.*?\*\*").expect("bold pattern is a valid literal regex")
    })
}

/// Tokenize a line into bold and plain spans.
///
/// Empty fragments are dropped, including an empty bold pair `****`.
/// Adjacent plain fragments are not merged.
pub fn tokenize(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut last = 0;

    for m in bold_pattern().find_iter(text) {
        if m.start() > last {
            spans.push(Span::plain(&text[last..m.start()]));
        }
        let inner = &m.as_str()[BOLD_MARKER.len()..m.len() - BOLD_MARKER.len()];
        if !inner.is_empty() {
            spans.push(Span::bold(inner));
        }
        last = m.end();
    }

    if last < text.len() {
        spans.push(Span::plain(&text[last..]));
    }

    spans
}

/// Remove every bold marker, for output paths that do not re-bold text.
pub fn strip_bold_markers(text: &str) -> String {
    text.replace(BOLD_MARKER, "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bold_pattern_is_shortest_match() {
        let pattern = bold_pattern();
        assert_eq!(pattern.find("**a** b **c**").map(|m| m.as_str()), Some("**a**"));
        assert!(!pattern.is_match("no markers"));
    }

    #[test]
    fn test_leading_bold() {
        assert_eq!(
            tokenize("**Bold** and plain"),
            vec![Span::bold("Bold"), Span::plain(" and plain")]
        );
    }

    #[test]
    fn test_multiple_bold_runs() {
        assert_eq!(
            tokenize("a **b** c **d**"),
            vec![
                Span::plain("a "),
                Span::bold("b"),
                Span::plain(" c "),
                Span::bold("d"),
            ]
        );
    }

    #[test]
    fn test_unmatched_marker_is_literal() {
        assert_eq!(tokenize("broken **bold"), vec![Span::plain("broken **bold")]);
    }

    #[test]
    fn test_odd_marker_count_keeps_trailing_marker() {
        assert_eq!(
            tokenize("**x** and ** tail"),
            vec![Span::bold("x"), Span::plain(" and ** tail")]
        );
    }

    #[test]
    fn test_empty_bold_pair_dropped() {
        assert_eq!(
            tokenize("a****b"),
            vec![Span::plain("a"), Span::plain("b")]
        );
        assert!(tokenize("****").is_empty());
    }

    #[test]
    fn test_plain_only() {
        assert_eq!(tokenize("no markers"), vec![Span::plain("no markers")]);
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_multibyte_text() {
        assert_eq!(
            tokenize("धारा **302** IPC"),
            vec![Span::plain("धारा "), Span::bold("302"), Span::plain(" IPC")]
        );
    }

    #[test]
    fn test_strip_bold_markers() {
        assert_eq!(strip_bold_markers("**Name:** Ravi **"), "Name: Ravi ");
    }
}
