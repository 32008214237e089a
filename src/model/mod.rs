//! Document model types for classified legal-document text.
//!
//! This module defines the typed block model that the screen renderer
//! consumes. A [`Document`] is built once per input text and never mutated
//! afterwards; renderers that need one build their own.

mod block;
mod document;
mod span;

pub use block::{Block, BlockKind};
pub use document::Document;
pub use span::{spans_text, Span};
