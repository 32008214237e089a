//! Line grammar shared by every renderer.
//!
//! The screen renderer, the vector paginator and anything else that reads
//! generated text go through this module, so they cannot disagree on how a
//! line is classified or how bold runs are split.

mod builder;
mod classify;
mod inline;

pub use builder::{block_from_class, build_document};
pub use classify::{classify_line, classify_lines, LineClass, KEY_MAX_CHARS};
pub use inline::{strip_bold_markers, tokenize, BOLD_MARKER};
