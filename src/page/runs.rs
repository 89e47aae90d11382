//! Text runs reported by the rendering backend
//!
//! A run is a contiguous fragment of text with its own position and size,
//! typically a word or sub-word piece. Runs do not line up one-to-one with
//! words in external text, and their order is whatever reading order the
//! backend reports.

use serde::Serialize;

/// A positioned text fragment in page user-space.
///
/// Origin is the bottom-left corner of the run's bounding box with Y
/// increasing upward. Immutable once produced for a given page render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRun {
    /// Fragment text. Non-empty; never contains newlines (the extraction
    /// adapter emits one run per word).
    pub text: String,
    /// X of the bottom-left corner in points.
    pub origin_x: f32,
    /// Y of the bottom-left corner in points.
    pub origin_y: f32,
    pub width: f32,
    pub height: f32,
    /// Position in the page's run sequence.
    pub run_index: usize,
}

/// Ordered run list for one rendered page, plus the unscaled page
/// dimensions needed for the raster-space transform.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRuns {
    pub page_index: usize,
    pub page_width: f32,
    pub page_height: f32,
    pub runs: Vec<TextRun>,
}

impl PageRuns {
    /// A page with no extractable text is valid, not an error.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}
