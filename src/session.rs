//! Document view sessions
//!
//! Each uploaded document gets its own session: the parsed document plus
//! a per-page cache of reconciled text. A session's UUID is the identity
//! used for stale-result suppression: replacing a slot's document
//! installs a whole new session, so any result computed against the old
//! one fails the identity check and is dropped silently. No state is
//! shared across documents.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::matching::AcceptedMatch;
use crate::page::ReconciledPage;
use crate::render::{extract_runs, PdfDocument, RenderResult};

/// Reconciled pages kept per session. Pages are small (text only), so a
/// modest cap covers typical navigation without rebuilding.
const PAGE_TEXT_CACHE_SIZE: usize = 64;

/// Which pane a document was uploaded to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentSlot {
    /// Requirements document.
    Left,
    /// Target document whose pages get highlighted.
    Right,
}

impl DocumentSlot {
    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Reconciled text for one page plus the unscaled page dimensions the
/// viewport transform needs. Independent of render scale.
pub struct PageText {
    pub page_index: usize,
    pub page_width: f32,
    pub page_height: f32,
    pub reconciled: ReconciledPage,
}

/// One uploaded document's render session.
pub struct DocumentSession {
    id: Uuid,
    name: String,
    doc: Arc<PdfDocument>,
    pages: Mutex<LruCache<usize, Arc<PageText>>>,
}

impl DocumentSession {
    pub fn new(name: String, doc: PdfDocument) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            doc: Arc::new(doc),
            pages: Mutex::new(LruCache::new(
                NonZeroUsize::new(PAGE_TEXT_CACHE_SIZE).unwrap(),
            )),
        }
    }

    /// Session identity for stale-result checks.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn document(&self) -> &Arc<PdfDocument> {
        &self.doc
    }

    pub fn page_count(&self) -> usize {
        self.doc.page_count()
    }

    /// Reconciled text for a page, built on first use.
    ///
    /// The reconciler must complete before any locate runs against the
    /// page; building and caching here keeps that ordering.
    pub fn page_text(&self, page_index: usize) -> RenderResult<Arc<PageText>> {
        if let Some(hit) = self.pages.lock().get(&page_index) {
            return Ok(Arc::clone(hit));
        }

        let runs = extract_runs(&self.doc, page_index)?;
        let text = Arc::new(PageText {
            page_index,
            page_width: runs.page_width,
            page_height: runs.page_height,
            reconciled: ReconciledPage::from_runs(&runs.runs),
        });
        self.pages.lock().put(page_index, Arc::clone(&text));
        Ok(text)
    }
}

/// Match set computed for a specific document pair.
struct MatchSet {
    left_id: Uuid,
    right_id: Uuid,
    accepted: Vec<AcceptedMatch>,
}

#[derive(Default)]
struct Slots {
    left: Option<Arc<DocumentSession>>,
    right: Option<Arc<DocumentSession>>,
}

/// The two document slots plus the current match set.
///
/// The match set is keyed to the (left, right) session pair it was
/// computed for; replacing either document invalidates it.
#[derive(Default)]
pub struct SessionStore {
    slots: RwLock<Slots>,
    matches: RwLock<Option<MatchSet>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a document into a slot, replacing any previous session.
    /// The old session's results become stale and the match set is
    /// cleared.
    pub async fn install(&self, slot: DocumentSlot, session: DocumentSession) -> Arc<DocumentSession> {
        let session = Arc::new(session);
        {
            let mut slots = self.slots.write().await;
            match slot {
                DocumentSlot::Left => slots.left = Some(Arc::clone(&session)),
                DocumentSlot::Right => slots.right = Some(Arc::clone(&session)),
            }
        }
        *self.matches.write().await = None;
        session
    }

    pub async fn get(&self, slot: DocumentSlot) -> Option<Arc<DocumentSession>> {
        let slots = self.slots.read().await;
        match slot {
            DocumentSlot::Left => slots.left.clone(),
            DocumentSlot::Right => slots.right.clone(),
        }
    }

    pub async fn remove(&self, slot: DocumentSlot) -> bool {
        let removed = {
            let mut slots = self.slots.write().await;
            match slot {
                DocumentSlot::Left => slots.left.take().is_some(),
                DocumentSlot::Right => slots.right.take().is_some(),
            }
        };
        if removed {
            *self.matches.write().await = None;
        }
        removed
    }

    /// Whether a session is still the current one for its slot.
    pub async fn is_current(&self, slot: DocumentSlot, id: Uuid) -> bool {
        self.get(slot).await.map(|s| s.id() == id).unwrap_or(false)
    }

    /// Store a match set computed for the given session pair.
    ///
    /// Dropped silently when either document changed while the
    /// comparison was in flight; the stale result must not be applied
    /// to the new pair. Returns whether the set was stored.
    pub async fn set_matches(
        &self,
        left_id: Uuid,
        right_id: Uuid,
        accepted: Vec<AcceptedMatch>,
    ) -> bool {
        let current = {
            let slots = self.slots.read().await;
            slots.left.as_ref().map(|s| s.id()) == Some(left_id)
                && slots.right.as_ref().map(|s| s.id()) == Some(right_id)
        };
        if !current {
            tracing::debug!("Dropping stale match set for replaced document pair");
            return false;
        }

        *self.matches.write().await = Some(MatchSet {
            left_id,
            right_id,
            accepted,
        });
        true
    }

    /// The current match set, if it still belongs to the loaded pair.
    pub async fn matches(&self) -> Vec<AcceptedMatch> {
        let guard = self.matches.read().await;
        let Some(set) = guard.as_ref() else {
            return Vec::new();
        };

        let slots = self.slots.read().await;
        let still_current = slots.left.as_ref().map(|s| s.id()) == Some(set.left_id)
            && slots.right.as_ref().map(|s| s.id()) == Some(set.right_id);
        if still_current {
            set.accepted.clone()
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accepted(text: &str) -> AcceptedMatch {
        AcceptedMatch {
            requirement: "REQ".to_string(),
            matched_text: text.to_string(),
        }
    }

    #[test]
    fn test_slot_parse() {
        assert_eq!(DocumentSlot::from_str("left"), Some(DocumentSlot::Left));
        assert_eq!(DocumentSlot::from_str("right"), Some(DocumentSlot::Right));
        assert_eq!(DocumentSlot::from_str("middle"), None);
    }

    #[tokio::test]
    async fn test_stale_match_set_is_dropped() {
        let store = SessionStore::new();
        // No documents installed: any pair is stale
        let stored = store
            .set_matches(Uuid::new_v4(), Uuid::new_v4(), vec![accepted("t")])
            .await;
        assert!(!stored);
        assert!(store.matches().await.is_empty());
    }

    #[tokio::test]
    async fn test_is_current_tracks_identity() {
        let store = SessionStore::new();
        assert!(!store.is_current(DocumentSlot::Left, Uuid::new_v4()).await);
    }
}
