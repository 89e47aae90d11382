//! Error types for the viewer backend
//!
//! Taxonomy, per the handling rules of the pipeline: malformed input is
//! a local no-op and never reaches here; "no match" is a valid outcome,
//! not an error; upstream failures (render backend, consumed services)
//! surface as HTTP errors without automatic retry; stale results are
//! dropped before a response is built.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::matching::ServiceError;
use crate::render::RenderError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Upstream service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::Render(e) => match e {
                RenderError::NotPdf => (
                    StatusCode::BAD_REQUEST,
                    "bad_request",
                    "Only PDF files are supported".to_string(),
                ),
                RenderError::PageOutOfRange(page) => (
                    StatusCode::NOT_FOUND,
                    "not_found",
                    format!("Page {} out of range", page),
                ),
                _ => {
                    tracing::error!("Render backend error: {}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "render_error",
                        "Failed to render the document".to_string(),
                    )
                }
            },
            AppError::Service(e) => {
                tracing::error!("Upstream service error: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "service_error",
                    "An external service failed; the comparison was not completed".to_string(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
        });

        (status, body).into_response()
    }
}
