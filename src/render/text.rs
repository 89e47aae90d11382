//! Text run extraction
//!
//! Pulls word-level runs out of MuPDF structured text. The backend
//! reports per-character quads in top-down page coordinates; runs are
//! converted to the bottom-left-origin user-space the rest of the
//! pipeline expects, and whitespace characters become run boundaries so
//! no run ever contains a newline.

use mupdf::TextPageOptions;

use super::safe::PdfDocument;
use super::{RenderError, RenderResult};
use crate::page::{PageRuns, TextRun};

/// Extract the ordered run list for one page.
///
/// Run order is the reading order MuPDF reports (block, then line, then
/// character), which is not guaranteed strict left-to-right across
/// lines. A page with no extractable text yields an empty run list.
pub fn extract_runs(doc: &PdfDocument, page_index: usize) -> RenderResult<PageRuns> {
    if page_index >= doc.page_count() {
        return Err(RenderError::PageOutOfRange(page_index));
    }

    doc.with_doc(|mupdf_doc| {
        let page = mupdf_doc.load_page(page_index as i32)?;
        let bounds = page.bounds()?;
        let page_width = bounds.x1 - bounds.x0;
        let page_height = bounds.y1 - bounds.y0;

        let text_page = page.to_text_page(TextPageOptions::empty())?;
        let mut runs: Vec<TextRun> = Vec::new();

        for block in text_page.blocks() {
            for line in block.lines() {
                let mut builder = RunBuilder::default();
                for ch in line.chars() {
                    if let Some(c) = ch.char() {
                        if c.is_whitespace() {
                            builder.flush(&mut runs, page_height);
                            continue;
                        }

                        let quad = ch.quad();
                        let x0 = quad.ul.x.min(quad.ll.x);
                        let x1 = quad.ur.x.max(quad.lr.x);
                        let top = quad.ul.y.min(quad.ur.y);
                        let bottom = quad.ll.y.max(quad.lr.y);
                        builder.push(c, x0, x1, top, bottom);
                    }
                }
                // Line break ends the current word
                builder.flush(&mut runs, page_height);
            }
        }

        Ok(PageRuns {
            page_index,
            page_width,
            page_height,
            runs,
        })
    })
}

/// Accumulates one word's characters and their bounding box union.
#[derive(Default)]
struct RunBuilder {
    text: String,
    x0: f32,
    x1: f32,
    top: f32,
    bottom: f32,
}

impl RunBuilder {
    fn push(&mut self, c: char, x0: f32, x1: f32, top: f32, bottom: f32) {
        if self.text.is_empty() {
            self.x0 = x0;
            self.x1 = x1;
            self.top = top;
            self.bottom = bottom;
        } else {
            self.x0 = self.x0.min(x0);
            self.x1 = self.x1.max(x1);
            self.top = self.top.min(top);
            self.bottom = self.bottom.max(bottom);
        }
        self.text.push(c);
    }

    fn flush(&mut self, runs: &mut Vec<TextRun>, page_height: f32) {
        if self.text.is_empty() {
            return;
        }
        // Top-down quad coordinates to bottom-left-origin user-space
        runs.push(TextRun {
            text: std::mem::take(&mut self.text),
            origin_x: self.x0,
            origin_y: page_height - self.bottom,
            width: (self.x1 - self.x0).max(0.0),
            height: (self.bottom - self.top).max(0.0),
            run_index: runs.len(),
        });
    }
}
