//! Vector pagination.
//!
//! Lays raw text out onto fixed A4 pages as positioned text runs. Each
//! line is classified with the same grammar the screen path uses, then
//! handed to [`VectorPaginator::layout_line`] together with the current
//! [`LayoutState`]. The state is a plain value: each step consumes it and
//! returns the next one, so any line type can be tested in isolation.
//!
//! Pages are produced lazily by [`PageStream`]; [`VectorPaginator::paginate`]
//! collects them and applies the optional page-number footer, which needs
//! the final page count.

use std::collections::VecDeque;

use crate::parser::{classify_line, strip_bold_markers, LineClass};
use crate::render::SignatureBlock;

use super::geometry::PageGeometry;
use super::metrics::{split_text_to_size, FontFace};
use super::options::ExportOptions;
use super::page::{ExportPage, PageContent, PaginatedDocument, TextAlign, TextOp};

/// Layout accumulator threaded through every line.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutState {
    /// Number of the page being filled (1-indexed)
    pub page_number: u32,
    /// Vertical cursor in mm from the top edge
    pub y_mm: f32,
    /// Runs drawn on the current page so far
    pub ops: Vec<TextOp>,
    /// Pages finished since the state was last drained
    pub completed: Vec<ExportPage>,
}

impl LayoutState {
    /// Draw a run on the current page. Empty runs are skipped.
    fn draw(&mut self, op: TextOp) {
        if !op.text.is_empty() {
            self.ops.push(op);
        }
    }
}

/// Lays text out onto vector pages.
#[derive(Debug, Clone)]
pub struct VectorPaginator {
    geometry: PageGeometry,
    title: Option<String>,
    signature: SignatureBlock,
    bullet_glyph: char,
    page_numbers: bool,
}

impl VectorPaginator {
    /// Create a paginator from export options.
    pub fn new(options: &ExportOptions) -> Self {
        Self {
            geometry: options.geometry,
            title: options.title.clone(),
            signature: options.signature.clone(),
            bullet_glyph: options.bullet_glyph,
            page_numbers: options.page_numbers,
        }
    }

    /// Page geometry in use.
    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Initial state: page 1 with the title drawn and the cursor below it.
    pub fn start(&self) -> LayoutState {
        let g = &self.geometry;
        let mut ops = Vec::new();
        if let Some(ref title) = self.title {
            ops.push(
                TextOp::left(
                    title.clone(),
                    g.center_x_mm(),
                    g.title_y_mm,
                    FontFace::Bold,
                    g.title_size_pt,
                )
                .aligned(TextAlign::Center),
            );
        }
        LayoutState {
            page_number: 1,
            y_mm: g.first_page_top_mm,
            ops,
            completed: Vec::new(),
        }
    }

    /// Lay out one classified line.
    pub fn layout_line(&self, state: LayoutState, line: LineClass<'_>) -> LayoutState {
        let g = &self.geometry;
        let mut state = self.break_if_full(state);

        match line {
            LineClass::Spacer => {
                state.y_mm += g.spacer_advance_mm;
            }
            LineClass::Heading { text, .. } | LineClass::SectionTitle(text) => {
                let text = strip_bold_markers(text).to_uppercase();
                state.draw(TextOp::left(
                    text,
                    g.margin_left_mm,
                    state.y_mm,
                    FontFace::Bold,
                    g.heading_size_pt,
                ));
                state.y_mm += g.heading_advance_mm;
            }
            LineClass::Bullet(text) => {
                let text = format!("{} {}", self.bullet_glyph, strip_bold_markers(text));
                state.draw(TextOp::left(
                    text,
                    g.bullet_left_mm,
                    state.y_mm,
                    FontFace::Regular,
                    g.body_size_pt,
                ));
                state.y_mm += g.line_advance_mm;
            }
            LineClass::KeyValue { key, value } => {
                let text = strip_bold_markers(&format!("{}{}", key, value));
                state = self.layout_wrapped(state, &text);
            }
            LineClass::Paragraph(text) => {
                state = self.layout_wrapped(state, &strip_bold_markers(text));
            }
        }
        state
    }

    /// Draw the signature block and close the last page.
    ///
    /// Returns every page not yet drained from the state.
    pub fn finish(&self, state: LayoutState) -> Vec<ExportPage> {
        let g = &self.geometry;
        let mut state = if state.y_mm > g.signature_limit_mm {
            log::debug!(
                "signature block moved to page {} (cursor at {:.1}mm)",
                state.page_number + 1,
                state.y_mm
            );
            self.new_page(state)
        } else {
            state
        };

        let first = state.y_mm + g.signature_first_offset_mm;
        let second = state.y_mm + g.signature_second_offset_mm;
        let sig = &self.signature;
        state.ops.extend([
            TextOp::left(sig.date_line(), g.margin_left_mm, first, FontFace::Regular, g.body_size_pt),
            TextOp::left(sig.place_line(), g.margin_left_mm, second, FontFace::Regular, g.body_size_pt),
            TextOp::left(sig.signatory.clone(), g.right_edge_mm, first, FontFace::Bold, g.body_size_pt)
                .aligned(TextAlign::Right),
            TextOp::left(sig.designation.clone(), g.right_edge_mm, second, FontFace::Regular, g.caption_size_pt)
                .aligned(TextAlign::Right),
        ]);

        let mut pages = std::mem::take(&mut state.completed);
        pages.push(ExportPage::vector(state.page_number, g, state.ops));
        pages
    }

    /// Iterate over the pages of `text` as they are completed.
    pub fn pages<'a>(&'a self, text: &'a str) -> PageStream<'a> {
        PageStream {
            paginator: self,
            lines: text.split('\n'),
            state: Some(self.start()),
            pending: VecDeque::new(),
        }
    }

    /// Paginate `text` into a complete document.
    pub fn paginate(&self, text: &str) -> crate::Result<PaginatedDocument> {
        self.geometry.validate()?;

        let mut pages: Vec<ExportPage> = self.pages(text).collect();
        if self.page_numbers {
            self.apply_footer(&mut pages);
        }
        log::debug!("vector pagination produced {} page(s)", pages.len());
        Ok(PaginatedDocument::from_pages(pages))
    }

    fn apply_footer(&self, pages: &mut [ExportPage]) {
        let g = &self.geometry;
        let total = pages.len();
        for page in pages.iter_mut() {
            let footer = TextOp::left(
                format!("Page {}/{}", page.number, total),
                g.center_x_mm(),
                g.footer_y_mm,
                FontFace::Regular,
                g.footer_size_pt,
            )
            .aligned(TextAlign::Center);
            if let PageContent::Vector { ops } = &mut page.content {
                ops.push(footer);
            }
        }
    }

    fn layout_wrapped(&self, mut state: LayoutState, text: &str) -> LayoutState {
        let g = &self.geometry;
        for sub_line in split_text_to_size(text, g.wrap_width_mm, FontFace::Regular, g.body_size_pt) {
            state = self.break_if_full(state);
            state.draw(TextOp::left(
                sub_line,
                g.margin_left_mm,
                state.y_mm,
                FontFace::Regular,
                g.body_size_pt,
            ));
            state.y_mm += g.line_advance_mm;
        }
        state
    }

    fn break_if_full(&self, state: LayoutState) -> LayoutState {
        if state.y_mm > self.geometry.body_limit_mm {
            log::debug!(
                "page {} full at {:.1}mm, breaking",
                state.page_number,
                state.y_mm
            );
            self.new_page(state)
        } else {
            state
        }
    }

    fn new_page(&self, mut state: LayoutState) -> LayoutState {
        let ops = std::mem::take(&mut state.ops);
        state
            .completed
            .push(ExportPage::vector(state.page_number, &self.geometry, ops));
        state.page_number += 1;
        state.y_mm = self.geometry.page_top_mm;
        state
    }
}

impl Default for VectorPaginator {
    fn default() -> Self {
        Self::new(&ExportOptions::default())
    }
}

/// Lazy iterator over the pages of a vector layout.
///
/// Pages are yielded as soon as the layout moves past them; the last page
/// (carrying the signature block) is yielded after the input is exhausted.
/// Page-number footers are not applied here.
pub struct PageStream<'a> {
    paginator: &'a VectorPaginator,
    lines: std::str::Split<'a, char>,
    state: Option<LayoutState>,
    pending: VecDeque<ExportPage>,
}

impl<'a> PageStream<'a> {
    /// Check if every page has been yielded.
    pub fn is_done(&self) -> bool {
        self.state.is_none() && self.pending.is_empty()
    }
}

impl<'a> Iterator for PageStream<'a> {
    type Item = ExportPage;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(page) = self.pending.pop_front() {
                return Some(page);
            }

            let state = self.state.take()?;
            match self.lines.next() {
                Some(line) => {
                    let mut next = self.paginator.layout_line(state, classify_line(line));
                    self.pending.extend(next.completed.drain(..));
                    self.state = Some(next);
                }
                None => {
                    self.pending.extend(self.paginator.finish(state));
                }
            }
        }
    }
}
