//! Extraction and matching service clients
//!
//! The viewer consumes two external HTTP services: one extracts
//! requirement passages from the left document, the other locates
//! matching passages in the right document and labels each match with a
//! confidence. Both sit behind traits so the orchestrator can be
//! exercised with mocks; neither is retried automatically: a failed
//! call is surfaced to the caller.

use async_trait::async_trait;
use thiserror::Error;

use super::types::{
    decode_records, ExtractionResponse, MatchRecord, MatchingResponse, RequirementRecord,
};

/// Errors from the consumed services.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Service request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Service returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to encode requirements payload: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Requirement extraction over the left document.
#[async_trait]
pub trait ExtractionService: Send + Sync {
    async fn extract_requirements(
        &self,
        pdf: &[u8],
        filename: &str,
    ) -> Result<Vec<RequirementRecord>, ServiceError>;
}

/// Requirement matching over the right document.
#[async_trait]
pub trait MatchingService: Send + Sync {
    async fn match_requirements(
        &self,
        pdf: &[u8],
        filename: &str,
        requirements: &[RequirementRecord],
    ) -> Result<Vec<MatchRecord>, ServiceError>;
}

/// HTTP extraction client: POST the PDF as multipart, JSON back.
pub struct HttpExtractionService {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpExtractionService {
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
        }
    }
}

#[async_trait]
impl ExtractionService for HttpExtractionService {
    async fn extract_requirements(
        &self,
        pdf: &[u8],
        filename: &str,
    ) -> Result<Vec<RequirementRecord>, ServiceError> {
        let part = reqwest::multipart::Part::bytes(pdf.to_vec())
            .file_name(filename.to_string())
            .mime_str("application/pdf")?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?;
        let envelope: ExtractionResponse = read_json(response).await?;
        Ok(decode_records(envelope.requirements, "requirement"))
    }
}

/// HTTP matching client: POST the PDF plus the requirement set, JSON back.
pub struct HttpMatchingService {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpMatchingService {
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
        }
    }
}

#[async_trait]
impl MatchingService for HttpMatchingService {
    async fn match_requirements(
        &self,
        pdf: &[u8],
        filename: &str,
        requirements: &[RequirementRecord],
    ) -> Result<Vec<MatchRecord>, ServiceError> {
        let part = reqwest::multipart::Part::bytes(pdf.to_vec())
            .file_name(filename.to_string())
            .mime_str("application/pdf")?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("requirements", serde_json::to_string(requirements)?);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?;
        let envelope: MatchingResponse = read_json(response).await?;
        Ok(decode_records(envelope.matched_requirements, "match"))
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ServiceError> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(ServiceError::Status { status, body });
    }
    Ok(response.json().await?)
}
