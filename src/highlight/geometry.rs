//! Highlight geometry
//!
//! Converts a located character span into axis-aligned rectangles in
//! raster pixel space. Page user-space has a bottom-left origin with Y
//! up; the raster has a top-left origin with Y down, so every rectangle
//! goes through the viewport transform's vertical flip. A span crossing
//! several runs legitimately produces several disjoint rectangles.

use serde::Serialize;

use crate::page::{MatchSpan, ReconciledPage};

/// Floor for run heights in page-space points so degenerate zero-height
/// runs still produce a visible rectangle.
const MIN_RUN_HEIGHT: f32 = 1.0;

/// Active render scale plus the unscaled page height, enough to convert
/// any page-space point to raster space.
///
/// A scale change invalidates every rectangle computed with the old
/// transform; rectangles are recomputed, never reused.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportTransform {
    pub scale: f32,
    pub page_height: f32,
}

impl ViewportTransform {
    pub fn new(scale: f32, page_height: f32) -> Self {
        Self { scale, page_height }
    }

    pub fn to_raster_x(&self, page_x: f32) -> f32 {
        page_x * self.scale
    }

    pub fn to_raster_y(&self, page_y: f32) -> f32 {
        (self.page_height - page_y) * self.scale
    }
}

/// Rectangle in raster pixel space, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HighlightRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl HighlightRect {
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

/// Map a located span to raster rectangles, one per overlapped run.
///
/// The intra-run sub-range is clamped to the run's own text (any trailing
/// separator filler carries no geometry) and mapped to a horizontal
/// fraction of the run width, a uniform-width approximation that holds
/// up because runs are short, typically single words. An empty span
/// yields no rectangles; zero-width or zero-length runs are skipped.
pub fn map_span(
    page: &ReconciledPage,
    span: MatchSpan,
    transform: &ViewportTransform,
) -> Vec<HighlightRect> {
    if span.is_empty() {
        return Vec::new();
    }

    let mut rects = Vec::new();
    for entry in page.entries_overlapping(span.char_start, span.char_end) {
        let run = &entry.run;
        if entry.text_char_len == 0 || run.width <= 0.0 {
            continue;
        }

        let local_start = span
            .char_start
            .saturating_sub(entry.char_start)
            .min(entry.text_char_len);
        let local_end = (span.char_end.min(entry.char_end) - entry.char_start)
            .min(entry.text_char_len);
        if local_end <= local_start {
            // Span only touches this entry's trailing filler
            continue;
        }

        let frac_start = local_start as f32 / entry.text_char_len as f32;
        let frac_end = local_end as f32 / entry.text_char_len as f32;
        let x0 = run.origin_x + frac_start * run.width;
        let x1 = run.origin_x + frac_end * run.width;
        let height = run.height.max(MIN_RUN_HEIGHT);
        let y_top = run.origin_y + height;

        rects.push(HighlightRect {
            x: transform.to_raster_x(x0),
            y: transform.to_raster_y(y_top),
            width: (x1 - x0) * transform.scale,
            height: height * transform.scale,
        });
    }
    rects
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{locate, LocateOptions, TextRun};

    fn two_run_page() -> ReconciledPage {
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

    #[test]
    fn test_two_run_span_yields_two_rects() {
        let page = two_run_page();
        let span = locate(&page, "system shall verify", &LocateOptions::default()).unwrap();
        let transform = ViewportTransform::new(1.0, 792.0);
        let rects = map_span(&page, span, &transform);

        assert_eq!(rects.len(), 2);
        assert!(rects.iter().all(|r| r.width > 0.0));
    }

    #[test]
    fn test_concrete_scenario_raster_coordinates() {
        let page = two_run_page();
        let span = locate(&page, "system shall verify", &LocateOptions::default()).unwrap();
        let scale = 1.5;
        let page_height = 792.0;
        let transform = ViewportTransform::new(scale, page_height);
        let rects = map_span(&page, span, &transform);

        // Both rects sit at the same line: raster y = (pageHeight - 712) * scale
        let expected_y = (page_height - 712.0) * scale;
        for rect in &rects {
            assert!((rect.y - expected_y).abs() < 1e-3);
        }

        // First rect starts partway into run 1 ("system" is not at its
        // start); second covers a partial width of run 2
        assert!(rects[0].x > 10.0 * scale);
        assert!(rects[1].x >= 95.0 * scale - 1e-3);
        assert!(rects[1].width < 90.0 * scale);
    }

    #[test]
    fn test_geometry_is_scale_covariant() {
        let page = two_run_page();
        let span = locate(&page, "system shall", &LocateOptions::default()).unwrap();
        let base = map_span(&page, span, &ViewportTransform::new(1.0, 792.0));
        let doubled = map_span(&page, span, &ViewportTransform::new(2.0, 792.0));

        assert_eq!(base.len(), doubled.len());
        for (a, b) in base.iter().zip(&doubled) {
            assert!((b.x - 2.0 * a.x).abs() < 1e-3);
            assert!((b.y - 2.0 * a.y).abs() < 1e-3);
            assert!((b.width - 2.0 * a.width).abs() < 1e-3);
            assert!((b.height - 2.0 * a.height).abs() < 1e-3);
        }
    }

    #[test]
    fn test_empty_span_yields_no_rects() {
        let page = two_run_page();
        let span = MatchSpan {
            char_start: 3,
            char_end: 3,
        };
        assert!(map_span(&page, span, &ViewportTransform::new(1.0, 792.0)).is_empty());
    }

    #[test]
    fn test_zero_width_run_skipped() {
        let page = ReconciledPage::from_runs(&[TextRun {
            text: "ghost".to_string(),
            origin_x: 10.0,
            origin_y: 700.0,
            width: 0.0,
            height: 12.0,
            run_index: 0,
        }]);
        let span = MatchSpan {
            char_start: 0,
            char_end: 5,
        };
        assert!(map_span(&page, span, &ViewportTransform::new(1.0, 792.0)).is_empty());
    }

    #[test]
    fn test_zero_height_run_gets_floor() {
        let page = ReconciledPage::from_runs(&[TextRun {
            text: "flat".to_string(),
            origin_x: 10.0,
            origin_y: 700.0,
            width: 40.0,
            height: 0.0,
            run_index: 0,
        }]);
        let span = MatchSpan {
            char_start: 0,
            char_end: 4,
        };
        let rects = map_span(&page, span, &ViewportTransform::new(2.0, 792.0));
        assert_eq!(rects.len(), 1);
        assert!(rects[0].height >= MIN_RUN_HEIGHT * 2.0 - 1e-3);
    }
}
