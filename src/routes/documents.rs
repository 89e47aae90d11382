//! Document slot endpoints
//!
//! Upload, inspect, and remove the two compared documents. Uploads are
//! multipart; the file lands in memory for the lifetime of its session
//! and is never persisted. Replacing a slot's document invalidates the
//! current match set and any in-flight results for the old session.

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::render::{PdfDocument, RenderError};
use crate::session::{DocumentSession, DocumentSlot};
use crate::state::AppState;

/// Create the documents router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_documents))
        .route("/:slot", post(upload_document).delete(delete_document))
        // Allow up to 100MB uploads
        .layer(DefaultBodyLimit::max(100 * 1024 * 1024))
}

/// Upload response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub id: String,
    pub slot: String,
    pub name: String,
    pub page_count: usize,
}

/// Summary of one loaded slot
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotSummary {
    pub id: String,
    pub name: String,
    pub page_count: usize,
}

/// Status of both slots
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentListResponse {
    pub left: Option<SlotSummary>,
    pub right: Option<SlotSummary>,
}

pub(super) fn parse_slot(value: &str) -> Result<DocumentSlot> {
    DocumentSlot::from_str(value)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown document slot '{}'", value)))
}

/// Upload a PDF into a slot, replacing any previous document there.
async fn upload_document(
    State(state): State<AppState>,
    Path(slot): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let slot = parse_slot(&slot)?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name != "file" && name != "document" {
            continue;
        }

        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unknown.pdf".to_string());
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read file data: {}", e)))?;

        let doc = PdfDocument::from_bytes(data.to_vec()).map_err(|e| match e {
            RenderError::NotPdf => {
                AppError::BadRequest("Only PDF files are supported".to_string())
            }
            other => AppError::BadRequest(format!("Failed to parse PDF: {}", other)),
        })?;

        let page_count = doc.page_count();
        let session = state
            .store()
            .install(slot, DocumentSession::new(filename.clone(), doc))
            .await;

        tracing::info!(
            "Document '{}' loaded into {} slot with {} pages",
            filename,
            slot.as_str(),
            page_count
        );

        return Ok(Json(UploadResponse {
            id: session.id().to_string(),
            slot: slot.as_str().to_string(),
            name: filename,
            page_count,
        }));
    }

    Err(AppError::BadRequest(
        "No file provided. Use field name 'file' or 'document'".to_string(),
    ))
}

/// Status of both document slots
async fn list_documents(State(state): State<AppState>) -> Json<DocumentListResponse> {
    let summarize = |session: &std::sync::Arc<DocumentSession>| SlotSummary {
        id: session.id().to_string(),
        name: session.name().to_string(),
        page_count: session.page_count(),
    };

    Json(DocumentListResponse {
        left: state
            .store()
            .get(DocumentSlot::Left)
            .await
            .as_ref()
            .map(summarize),
        right: state
            .store()
            .get(DocumentSlot::Right)
            .await
            .as_ref()
            .map(summarize),
    })
}

/// Remove a slot's document
async fn delete_document(
    State(state): State<AppState>,
    Path(slot): Path<String>,
) -> Result<StatusCode> {
    let slot = parse_slot(&slot)?;
    if !state.store().remove(slot).await {
        return Err(AppError::NotFound(format!(
            "No document loaded in {} slot",
            slot.as_str()
        )));
    }

    tracing::info!("Document removed from {} slot", slot.as_str());
    Ok(StatusCode::NO_CONTENT)
}
