//! Thread-safe document wrapper for MuPDF
//!
//! MuPDF documents are not thread-safe. This wrapper stores the raw
//! bytes, opens a fresh document for each operation, and serializes
//! access through a `parking_lot::Mutex`, so no document reference ever
//! escapes a closure and every operation starts from a clean state.

use std::sync::Arc;

use mupdf::Document;
use parking_lot::Mutex;

use super::{RenderError, RenderResult};

const PDF_MIME: &str = "application/pdf";

/// Thread-safe PDF document handle.
pub struct PdfDocument {
    /// Raw document bytes; each operation reopens from these.
    data: Arc<Vec<u8>>,
    /// Cached page count.
    page_count: usize,
    /// Serializes all backend access.
    lock: Mutex<()>,
}

// SAFETY: all fields are Send + Sync (Arc<Vec<u8>>, usize, parking_lot
// Mutex), and every MuPDF access happens inside with_doc under the lock
// on a freshly opened Document that is dropped before the closure
// returns, so no backend state is shared across threads.
unsafe impl Send for PdfDocument {}
unsafe impl Sync for PdfDocument {}

impl PdfDocument {
    /// Open a document from uploaded bytes.
    ///
    /// Performs only the magic-byte check and an initial open to get the
    /// page count; structural validation stays the backend's problem.
    pub fn from_bytes(data: Vec<u8>) -> RenderResult<Self> {
        if !data.starts_with(b"%PDF") {
            return Err(RenderError::NotPdf);
        }

        let doc = Document::from_bytes(&data, PDF_MIME)?;
        let page_count = doc.page_count()? as usize;

        Ok(Self {
            data: Arc::new(data),
            page_count,
            lock: Mutex::new(()),
        })
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// The raw document bytes, for handing to the consumed services.
    pub fn bytes(&self) -> Arc<Vec<u8>> {
        Arc::clone(&self.data)
    }

    /// Execute a closure against a freshly opened document.
    pub fn with_doc<F, R>(&self, f: F) -> RenderResult<R>
    where
        F: FnOnce(&Document) -> RenderResult<R>,
    {
        let _guard = self.lock.lock();
        let doc = Document::from_bytes(&self.data, PDF_MIME)?;
        f(&doc)
    }
}
