//! Rendering backend adapter
//!
//! Wraps MuPDF behind a small surface: a thread-safe document handle,
//! page rasterization at a scale, and word-level text-run extraction.
//! The backend is a black box to the rest of the crate; nothing outside
//! this module touches MuPDF types.

mod raster;
mod safe;
mod text;

pub use raster::{encode_png, render_page, PageRaster, MAX_SCALE, MIN_SCALE};
pub use safe::PdfDocument;
pub use text::extract_runs;

use thiserror::Error;

/// Errors from the rendering backend.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Uploaded bytes are not a PDF (magic byte check).
    #[error("Not a PDF document")]
    NotPdf,

    #[error("Page {0} out of range")]
    PageOutOfRange(usize),

    #[error("Render backend error: {0}")]
    Backend(String),

    #[error("Raster buffer error: {0}")]
    Buffer(String),
}

impl From<mupdf::Error> for RenderError {
    fn from(err: mupdf::Error) -> Self {
        RenderError::Backend(err.to_string())
    }
}

/// Result type alias for rendering operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;
