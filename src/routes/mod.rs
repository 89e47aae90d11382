//! HTTP API routes

use axum::Router;

use crate::state::AppState;

pub mod compare;
pub mod documents;
pub mod pages;

/// Assemble the API router. Shared between the server binary and the
/// route tests.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/api/v1/documents", documents::router())
        .nest("/api/v1/view", pages::router())
        .nest("/api/v1/compare", compare::router())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::matching::{
        ExtractionService, MatchRecord, MatchingService, RequirementRecord, ServiceError,
    };
    use crate::state::AppState;
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use std::sync::Arc;

    struct EmptyExtraction;

    #[async_trait]
    impl ExtractionService for EmptyExtraction {
        async fn extract_requirements(
            &self,
            _pdf: &[u8],
            _filename: &str,
        ) -> Result<Vec<RequirementRecord>, ServiceError> {
            Ok(Vec::new())
        }
    }

    struct EmptyMatching;

    #[async_trait]
    impl MatchingService for EmptyMatching {
        async fn match_requirements(
            &self,
            _pdf: &[u8],
            _filename: &str,
            _requirements: &[RequirementRecord],
        ) -> Result<Vec<MatchRecord>, ServiceError> {
            Ok(Vec::new())
        }
    }

    fn test_server() -> TestServer {
        let state = AppState::with_services(
            Config::default(),
            Arc::new(EmptyExtraction),
            Arc::new(EmptyMatching),
        );
        TestServer::new(api_router().with_state(state)).unwrap()
    }

    #[tokio::test]
    async fn test_document_list_starts_empty() {
        let server = test_server();
        let response = server.get("/api/v1/documents").await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let body: serde_json::Value = response.json();
        assert!(body["left"].is_null());
        assert!(body["right"].is_null());
    }

    #[tokio::test]
    async fn test_compare_requires_both_documents() {
        let server = test_server();
        let response = server.post("/api/v1/compare/run").await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_match_list_starts_empty() {
        let server = test_server();
        let response = server.get("/api/v1/compare/matches").await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let body: serde_json::Value = response.json();
        assert_eq!(body["matches"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_unknown_slot_rejected() {
        let server = test_server();
        let response = server.delete("/api/v1/documents/middle").await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_view_requires_loaded_document() {
        let server = test_server();
        let response = server.get("/api/v1/view/right/pages/0/text").await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    }
}
