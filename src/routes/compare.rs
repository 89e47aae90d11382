//! Comparison endpoints
//!
//! Trigger the match orchestrator over the loaded document pair and
//! inspect the resulting match set.

use axum::{extract::State, routing::get, routing::post, Json, Router};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::matching::AcceptedMatch;
use crate::session::DocumentSlot;
use crate::state::AppState;

/// Create the compare router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/run", post(run_comparison))
        .route("/matches", get(list_matches))
}

/// Comparison run response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareResponse {
    pub total: usize,
    pub matches: Vec<AcceptedMatch>,
}

/// Current match set response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchListResponse {
    pub matches: Vec<AcceptedMatch>,
}

/// Run extraction + matching over the loaded pair and store the
/// high-confidence matches for page highlighting.
async fn run_comparison(State(state): State<AppState>) -> Result<Json<CompareResponse>> {
    let left = state.store().get(DocumentSlot::Left).await.ok_or_else(|| {
        AppError::BadRequest("Upload the left (requirements) document first".to_string())
    })?;
    let right = state.store().get(DocumentSlot::Right).await.ok_or_else(|| {
        AppError::BadRequest("Upload the right (target) document first".to_string())
    })?;

    let left_bytes = left.document().bytes();
    let right_bytes = right.document().bytes();

    let accepted = state
        .orchestrator()
        .run(&left_bytes, left.name(), &right_bytes, right.name())
        .await?;

    // If either document was replaced while the services ran, the match
    // set belongs to the old pair and is dropped rather than stored.
    let stored = state
        .store()
        .set_matches(left.id(), right.id(), accepted.clone())
        .await;
    if !stored {
        tracing::debug!("Comparison finished against a replaced document pair; result not stored");
    }

    Ok(Json(CompareResponse {
        total: accepted.len(),
        matches: accepted,
    }))
}

/// The match set currently driving page highlights
async fn list_matches(State(state): State<AppState>) -> Json<MatchListResponse> {
    Json(MatchListResponse {
        matches: state.store().matches().await,
    })
}
