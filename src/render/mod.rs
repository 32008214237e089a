//! Rendering module for on-screen and data outputs of a document.

mod html;
mod json;
mod options;
mod result;
pub mod screen;
mod text;

pub use html::to_html;
pub use json::{to_json, JsonFormat};
pub use options::{RenderOptions, SignatureBlock, DEFAULT_BULLET, DEFAULT_TITLE};
pub use result::DocumentStats;
pub use screen::{
    render_screen, Alignment, BlockStyle, FontWeight, NodeContent, ScreenNode, ScreenRenderer,
    ScreenView, StyledRun,
};
pub use text::{text_to_plain, to_text};
