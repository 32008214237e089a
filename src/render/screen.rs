//! On-screen projection of a document.
//!
//! Each block kind maps to one fixed [`BlockStyle`], so the same document
//! always yields the same view. The view is a plain tree; [`super::to_html`]
//! serializes it for a browser, and raster capture backends can paint it.

use crate::model::{Block, BlockKind, Document, Span};
use serde::{Deserialize, Serialize};

use super::{RenderOptions, SignatureBlock};

/// Render a document into a screen view.
pub fn render_screen(doc: &Document, options: &RenderOptions) -> ScreenView {
    ScreenRenderer::new(options.clone()).render(doc)
}

/// Horizontal alignment of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left alignment (default)
    #[default]
    Left,
    /// Center alignment
    Center,
    /// Right alignment
    Right,
    /// Justified alignment
    Justify,
}

/// Font weight of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    /// Regular weight
    #[default]
    Regular,
    /// Semi-bold, used for key-value keys
    SemiBold,
    /// Bold
    Bold,
}

/// Visual style of one block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockStyle {
    /// Base weight of the block's runs
    pub weight: FontWeight,
    /// Underline the whole block
    pub underline: bool,
    /// Display the text upper-cased
    pub uppercase: bool,
    /// Font size relative to body text
    pub font_scale: f32,
    /// Left indent in em
    pub indent_em: f32,
    /// Text alignment
    pub align: Alignment,
    /// Space above in em
    pub margin_top_em: f32,
    /// Space below in em
    pub margin_bottom_em: f32,
}

impl BlockStyle {
    const BODY: BlockStyle = BlockStyle {
        weight: FontWeight::Regular,
        underline: false,
        uppercase: false,
        font_scale: 1.0,
        indent_em: 0.0,
        align: Alignment::Left,
        margin_top_em: 0.0,
        margin_bottom_em: 0.25,
    };

    /// Style for a block kind. Headings scale with their level.
    pub fn for_kind(kind: BlockKind, heading_level: u8) -> Self {
        match kind {
            BlockKind::Heading => BlockStyle {
                weight: FontWeight::Bold,
                underline: true,
                uppercase: true,
                font_scale: match heading_level {
                    1 => 1.25,
                    2 => 1.125,
                    _ => 1.0625,
                },
                margin_top_em: 1.5,
                margin_bottom_em: 0.75,
                ..Self::BODY
            },
            BlockKind::SectionTitle => BlockStyle {
                weight: FontWeight::Bold,
                underline: true,
                uppercase: true,
                margin_top_em: 1.0,
                margin_bottom_em: 0.5,
                ..Self::BODY
            },
            BlockKind::Bullet => BlockStyle {
                indent_em: 1.0,
                ..Self::BODY
            },
            BlockKind::KeyValue => Self::BODY,
            BlockKind::Paragraph => BlockStyle {
                align: Alignment::Justify,
                ..Self::BODY
            },
            BlockKind::Spacer => BlockStyle {
                margin_bottom_em: 0.0,
                ..Self::BODY
            },
        }
    }
}

/// A run of text with its resolved weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyledRun {
    /// Display text
    pub text: String,
    /// Resolved weight
    pub weight: FontWeight,
}

/// Content of a screen node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeContent {
    /// A single flow of runs
    Runs {
        /// Glyph drawn before the runs, for bullets
        marker: Option<char>,
        /// The runs
        runs: Vec<StyledRun>,
    },
    /// A key followed by its value on the same line
    Pair {
        /// Semi-bold key runs
        key: Vec<StyledRun>,
        /// Regular value runs
        value: Vec<StyledRun>,
    },
    /// Fixed vertical gap
    Gap {
        /// Gap height in em
        height_em: f32,
    },
}

/// One rendered block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenNode {
    /// Kind of the source block
    pub kind: BlockKind,
    /// Resolved style
    pub style: BlockStyle,
    /// Content
    pub content: NodeContent,
}

impl ScreenNode {
    /// Visible text of the node, upper-cased when the style asks for it.
    pub fn display_text(&self) -> String {
        let text: String = match &self.content {
            NodeContent::Runs { marker, runs } => {
                let body: String = runs.iter().map(|r| r.text.as_str()).collect();
                match marker {
                    Some(m) => format!("{} {}", m, body),
                    None => body,
                }
            }
            NodeContent::Pair { key, value } => key
                .iter()
                .chain(value.iter())
                .map(|r| r.text.as_str())
                .collect(),
            NodeContent::Gap { .. } => String::new(),
        };
        if self.style.uppercase {
            text.to_uppercase()
        } else {
            text
        }
    }
}

/// The complete on-screen view of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenView {
    /// Centered title header
    pub title: Option<String>,
    /// One node per document block
    pub nodes: Vec<ScreenNode>,
    /// Closing signature block
    pub signature: Option<SignatureBlock>,
}

impl ScreenView {
    /// Get the visible text of the view, one line per node.
    pub fn display_text(&self) -> String {
        let mut lines = Vec::with_capacity(self.nodes.len() + 2);
        if let Some(ref title) = self.title {
            lines.push(title.clone());
        }
        lines.extend(self.nodes.iter().map(|n| n.display_text()));
        if let Some(ref sig) = self.signature {
            lines.push(sig.date_line());
            lines.push(sig.place_line());
            lines.push(sig.signatory.clone());
            lines.push(sig.designation.clone());
        }
        lines.join("\n")
    }
}

/// Height of the gap a spacer block produces.
const SPACER_HEIGHT_EM: f32 = 1.0;

/// Screen renderer.
pub struct ScreenRenderer {
    options: RenderOptions,
}

impl ScreenRenderer {
    /// Create a new screen renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render a document to a screen view.
    pub fn render(&self, doc: &Document) -> ScreenView {
        let nodes = doc.blocks().iter().map(|b| self.render_block(b)).collect();
        ScreenView {
            title: self.options.title.clone(),
            nodes,
            signature: self
                .options
                .include_signature
                .then(|| self.options.signature.clone()),
        }
    }

    fn render_block(&self, block: &Block) -> ScreenNode {
        let kind = block.kind();
        let style = BlockStyle::for_kind(kind, block.heading_level().unwrap_or(1));

        let content = match block {
            Block::Spacer => NodeContent::Gap {
                height_em: SPACER_HEIGHT_EM,
            },
            Block::KeyValue { key, value } => NodeContent::Pair {
                key: runs(key, FontWeight::SemiBold),
                value: runs(value, FontWeight::Regular),
            },
            Block::Bullet { spans } => NodeContent::Runs {
                marker: Some(self.options.bullet_glyph),
                runs: runs(spans, style.weight),
            },
            other => NodeContent::Runs {
                marker: None,
                runs: runs(other.spans(), style.weight),
            },
        };

        ScreenNode {
            kind,
            style,
            content,
        }
    }
}

/// Resolve span weights against a base weight; bold spans stay bold.
fn runs(spans: &[Span], base: FontWeight) -> Vec<StyledRun> {
    spans
        .iter()
        .map(|span| StyledRun {
            text: span.text.clone(),
            weight: if span.bold { FontWeight::Bold } else { base },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::build_document;

    fn view(text: &str) -> ScreenView {
        render_screen(&build_document(text), &RenderOptions::default())
    }

    #[test]
    fn test_heading_style() {
        let v = view("# Facts");
        let node = &v.nodes[0];
        assert_eq!(node.style.weight, FontWeight::Bold);
        assert!(node.style.underline && node.style.uppercase);
        assert!(node.style.font_scale > 1.0);
        assert_eq!(node.display_text(), "FACTS");
    }

    #[test]
    fn test_bullet_marker() {
        let v = view("- Knife");
        assert_eq!(v.nodes[0].display_text(), "• Knife");
        assert!(v.nodes[0].style.indent_em > 0.0);
    }

    #[test]
    fn test_key_value_weights() {
        let v = view("Name: **Ravi**");
        match &v.nodes[0].content {
            NodeContent::Pair { key, value } => {
                assert_eq!(key[0].weight, FontWeight::SemiBold);
                assert_eq!(value[0].weight, FontWeight::Regular);
                assert_eq!(value[1].weight, FontWeight::Bold);
            }
            other => panic!("expected pair, got {:?}", other),
        }
    }

    #[test]
    fn test_paragraph_justified_and_spacer_gap() {
        let v = view("Plain text\n");
        assert_eq!(v.nodes[0].style.align, Alignment::Justify);
        assert!(matches!(v.nodes[1].content, NodeContent::Gap { .. }));
    }

    #[test]
    fn test_title_and_signature() {
        let v = view("x");
        assert!(v.title.is_some());
        assert!(v.signature.is_some());

        let bare = render_screen(
            &build_document("x"),
            &RenderOptions::new().without_title().with_signature(false),
        );
        assert!(bare.title.is_none());
        assert!(bare.signature.is_none());
        assert_eq!(bare.display_text(), "x");
    }
}
