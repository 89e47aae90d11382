//! Page view endpoints
//!
//! Rendering a page raster (with highlights composited server-side for
//! the right pane), the reconciled page text, highlight rectangles as
//! JSON, and the hit test backing the highlight click callback.
//!
//! Every render request re-runs the pipeline at the requested scale:
//! rectangles computed for one scale are never reused at another, and a
//! result computed against a session that was replaced mid-flight is
//! discarded before compositing.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::highlight::{
    compose, page_highlights, HighlightStyle, PageHighlight, ViewportTransform,
};
use crate::render::{encode_png, render_page, MAX_SCALE, MIN_SCALE};
use crate::session::{DocumentSession, DocumentSlot, PageText};
use crate::state::AppState;

use super::documents::parse_slot;

/// Create the page view router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:slot/pages/:index/render", get(render_page_image))
        .route("/:slot/pages/:index/text", get(get_page_text))
        .route("/:slot/pages/:index/highlights", get(get_page_highlights))
        .route("/:slot/pages/:index/hit", get(hit_test_highlight))
}

/// Query parameters for page rendering
#[derive(Debug, Deserialize)]
pub struct RenderQuery {
    /// Scale factor (default: 1.5)
    #[serde(default = "default_scale")]
    pub scale: f32,
    /// Composite highlights over the raster (right pane only)
    #[serde(default = "default_highlights")]
    pub highlights: bool,
}

fn default_scale() -> f32 {
    1.5
}

fn default_highlights() -> bool {
    true
}

/// Query parameters for highlight geometry
#[derive(Debug, Deserialize)]
pub struct HighlightQuery {
    #[serde(default = "default_scale")]
    pub scale: f32,
}

/// Query parameters for the hit test
#[derive(Debug, Deserialize)]
pub struct HitQuery {
    pub x: f32,
    pub y: f32,
    #[serde(default = "default_scale")]
    pub scale: f32,
}

/// Reconciled page text response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageTextResponse {
    pub page_index: usize,
    pub page_width: f32,
    pub page_height: f32,
    pub flat_text: String,
    pub runs: Vec<crate::page::TextRun>,
}

/// Highlight geometry response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageHighlightsResponse {
    pub page_index: usize,
    pub scale: f32,
    pub highlights: Vec<PageHighlight>,
}

/// Hit test response: the click callback payload. A notification for
/// the host UI, which may use the matched text to scroll its other pane.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HitResponse {
    pub requirement: Option<String>,
    pub matched_text: Option<String>,
}

async fn session_for(state: &AppState, slot: DocumentSlot) -> Result<Arc<DocumentSession>> {
    state.store().get(slot).await.ok_or_else(|| {
        AppError::NotFound(format!("No document loaded in {} slot", slot.as_str()))
    })
}

async fn page_text_for(
    session: &Arc<DocumentSession>,
    page_index: usize,
) -> Result<Arc<PageText>> {
    let session = Arc::clone(session);
    tokio::task::spawn_blocking(move || session.page_text(page_index))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?
        .map_err(AppError::from)
}

/// Render a page raster, compositing highlights for the right pane.
async fn render_page_image(
    State(state): State<AppState>,
    Path((slot, index)): Path<(String, usize)>,
    Query(query): Query<RenderQuery>,
) -> Result<Response> {
    let slot = parse_slot(&slot)?;
    let session = session_for(&state, slot).await?;
    let session_id = session.id();

    let doc = Arc::clone(session.document());
    let scale = query.scale;
    let raster = tokio::task::spawn_blocking(move || render_page(&doc, index, scale))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??;

    let mut image = raster.image;
    let want_highlights = query.highlights && slot == DocumentSlot::Right;
    if want_highlights {
        let matches = state.store().matches().await;
        if !matches.is_empty() {
            let page_text = page_text_for(&session, index).await?;
            let transform = ViewportTransform::new(raster.scale, raster.page_height);
            let highlights = page_highlights(
                &page_text.reconciled,
                &transform,
                &matches,
                &state.locate_options(),
            );

            // Identity check: the document may have been replaced while
            // the pipeline ran; a stale result is discarded, not drawn.
            if !state.store().is_current(slot, session_id).await {
                tracing::debug!("Discarding stale highlight render for replaced document");
                return Ok(StatusCode::NO_CONTENT.into_response());
            }

            let rects: Vec<_> = highlights
                .iter()
                .flat_map(|h| h.rects.iter().copied())
                .collect();
            if !rects.is_empty() {
                let style = HighlightStyle {
                    alpha: state.config().highlight.alpha,
                    ..Default::default()
                };
                image = compose(&image, &rects, &style);
            }
        }
    }

    let png = encode_png(&image)?;
    let cache_control = if want_highlights {
        // Composited output depends on the current match set
        "no-store"
    } else {
        "max-age=3600"
    };

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "image/png")
        .header(header::CACHE_CONTROL, cache_control)
        .body(Body::from(png))
        .expect("hardcoded headers cannot fail");

    Ok(response)
}

/// Reconciled text and runs for one page
async fn get_page_text(
    State(state): State<AppState>,
    Path((slot, index)): Path<(String, usize)>,
) -> Result<Json<PageTextResponse>> {
    let slot = parse_slot(&slot)?;
    let session = session_for(&state, slot).await?;
    let page_text = page_text_for(&session, index).await?;

    Ok(Json(PageTextResponse {
        page_index: page_text.page_index,
        page_width: page_text.page_width,
        page_height: page_text.page_height,
        flat_text: page_text.reconciled.flat_text.clone(),
        runs: page_text
            .reconciled
            .entries
            .iter()
            .map(|e| e.run.clone())
            .collect(),
    }))
}

/// Highlight rectangles for one page at a scale, as JSON.
///
/// The scale is clamped exactly like the raster endpoint's so the
/// rectangles align with a raster rendered at the same requested scale.
async fn get_page_highlights(
    State(state): State<AppState>,
    Path((slot, index)): Path<(String, usize)>,
    Query(query): Query<HighlightQuery>,
) -> Result<Json<PageHighlightsResponse>> {
    let slot = parse_slot(&slot)?;
    let scale = query.scale.clamp(MIN_SCALE, MAX_SCALE);
    let highlights = compute_highlights(&state, slot, index, scale).await?;

    Ok(Json(PageHighlightsResponse {
        page_index: index,
        scale,
        highlights,
    }))
}

/// Matched text under a raster point, if any
async fn hit_test_highlight(
    State(state): State<AppState>,
    Path((slot, index)): Path<(String, usize)>,
    Query(query): Query<HitQuery>,
) -> Result<Json<HitResponse>> {
    let slot = parse_slot(&slot)?;
    let scale = query.scale.clamp(MIN_SCALE, MAX_SCALE);
    let highlights = compute_highlights(&state, slot, index, scale).await?;

    let hit = crate::highlight::hit_test(&highlights, query.x, query.y);
    Ok(Json(HitResponse {
        requirement: hit.map(|h| h.requirement.clone()),
        matched_text: hit.map(|h| h.matched_text.clone()),
    }))
}

/// Locate the current match set on a page and map it at the given scale.
/// Only the right pane carries highlights; other slots yield none.
async fn compute_highlights(
    state: &AppState,
    slot: DocumentSlot,
    page_index: usize,
    scale: f32,
) -> Result<Vec<PageHighlight>> {
    if slot != DocumentSlot::Right {
        return Ok(Vec::new());
    }

    let session = session_for(state, slot).await?;
    let matches = state.store().matches().await;
    if matches.is_empty() {
        return Ok(Vec::new());
    }

    let page_text = page_text_for(&session, page_index).await?;
    let transform = ViewportTransform::new(scale, page_text.page_height);
    Ok(page_highlights(
        &page_text.reconciled,
        &transform,
        &matches,
        &state.locate_options(),
    ))
}
