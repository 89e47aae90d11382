//! Highlight pipeline
//!
//! Geometry mapping from located spans to raster rectangles, and the
//! compositor that draws them over a page raster.

mod compositor;
mod geometry;

pub use compositor::{compose, HighlightStyle};
pub use geometry::{map_span, HighlightRect, ViewportTransform};

use serde::Serialize;

use crate::matching::AcceptedMatch;
use crate::page::{locate, LocateOptions, ReconciledPage};

/// All rectangles for one accepted match on one page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageHighlight {
    pub requirement: String,
    pub matched_text: String,
    pub rects: Vec<HighlightRect>,
}

/// Locate every accepted match on a reconciled page and map the hits to
/// raster rectangles.
///
/// Matches are handled one phrase at a time; a phrase with no hit on
/// this page contributes nothing, which is the correct rendering for an
/// unmatched phrase, not an error.
pub fn page_highlights(
    page: &ReconciledPage,
    transform: &ViewportTransform,
    matches: &[AcceptedMatch],
    options: &LocateOptions,
) -> Vec<PageHighlight> {
    matches
        .iter()
        .filter_map(|m| {
            let span = locate(page, &m.matched_text, options)?;
            let rects = map_span(page, span, transform);
            if rects.is_empty() {
                return None;
            }
            Some(PageHighlight {
                requirement: m.requirement.clone(),
                matched_text: m.matched_text.clone(),
                rects,
            })
        })
        .collect()
}

/// Matched text under a raster point, if any.
///
/// Backs the click callback: the host UI receives the matched text as a
/// notification and can scroll its other pane; no response is expected.
pub fn hit_test<'a>(highlights: &'a [PageHighlight], x: f32, y: f32) -> Option<&'a PageHighlight> {
    highlights
        .iter()
        .find(|h| h.rects.iter().any(|r| r.contains(x, y)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::TextRun;

    fn page() -> ReconciledPage {
        ReconciledPage::from_runs(&[
            TextRun {
                text: "The system".to_string(),
                origin_x: 10.0,
                origin_y: 700.0,
                width: 80.0,
                height: 12.0,
                run_index: 0,
            },
            TextRun {
                text: "shall verify.".to_string(),
                origin_x: 95.0,
                origin_y: 700.0,
                width: 90.0,
                height: 12.0,
                run_index: 1,
            },
        ])
    }

    fn accepted(text: &str) -> AcceptedMatch {
        AcceptedMatch {
            requirement: "REQ-1".to_string(),
            matched_text: text.to_string(),
        }
    }

    #[test]
    fn test_unmatched_phrase_contributes_nothing() {
        let transform = ViewportTransform::new(1.0, 792.0);
        let highlights = page_highlights(
            &page(),
            &transform,
            &[accepted("phrase that is absent")],
            &LocateOptions::default(),
        );
        assert!(highlights.is_empty());
    }

    #[test]
    fn test_matched_phrase_produces_highlight() {
        let transform = ViewportTransform::new(1.0, 792.0);
        let highlights = page_highlights(
            &page(),
            &transform,
            &[accepted("system shall verify")],
            &LocateOptions::default(),
        );
        assert_eq!(highlights.len(), 1);
        assert_eq!(highlights[0].rects.len(), 2);
    }

    #[test]
    fn test_hit_test_returns_matched_text() {
        let transform = ViewportTransform::new(1.0, 792.0);
        let highlights = page_highlights(
            &page(),
            &transform,
            &[accepted("system shall verify")],
            &LocateOptions::default(),
        );
        let rect = highlights[0].rects[0];
        let hit = hit_test(&highlights, rect.x + rect.width / 2.0, rect.y + rect.height / 2.0)
            .expect("point inside a rect must hit");
        assert_eq!(hit.matched_text, "system shall verify");
        assert!(hit_test(&highlights, 0.0, 0.0).is_none());
    }
}
