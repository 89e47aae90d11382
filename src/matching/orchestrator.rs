//! Match orchestration
//!
//! Thin sequencing over the two consumed services: extract requirements
//! from the left document, match them against the right document, keep
//! only high-confidence records. All text-geometry work stays in the
//! page and highlight modules; this component only drives them, one
//! target phrase at a time.

use std::sync::Arc;

use super::client::{ExtractionService, MatchingService, ServiceError};
use super::types::AcceptedMatch;

pub struct MatchOrchestrator {
    extraction: Arc<dyn ExtractionService>,
    matching: Arc<dyn MatchingService>,
}

impl MatchOrchestrator {
    pub fn new(extraction: Arc<dyn ExtractionService>, matching: Arc<dyn MatchingService>) -> Self {
        Self {
            extraction,
            matching,
        }
    }

    /// Run both service calls and apply the confidence filter.
    ///
    /// Only records whose confidence equals HIGH (case-insensitive)
    /// survive. Upstream failures are returned to the caller; nothing is
    /// retried here.
    pub async fn run(
        &self,
        left_pdf: &[u8],
        left_name: &str,
        right_pdf: &[u8],
        right_name: &str,
    ) -> Result<Vec<AcceptedMatch>, ServiceError> {
        let requirements = self
            .extraction
            .extract_requirements(left_pdf, left_name)
            .await?;
        tracing::info!(
            "Extraction service returned {} requirements",
            requirements.len()
        );
        if requirements.is_empty() {
            return Ok(Vec::new());
        }

        let records = self
            .matching
            .match_requirements(right_pdf, right_name, &requirements)
            .await?;
        let total = records.len();

        let accepted: Vec<AcceptedMatch> = records
            .into_iter()
            .filter(|record| record.confidence().is_high())
            .map(|record| AcceptedMatch {
                requirement: record.requirement,
                matched_text: record.matched_text,
            })
            .collect();

        tracing::info!("Accepted {}/{} matches at high confidence", accepted.len(), total);
        Ok(accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::types::{MatchRecord, RequirementRecord};
    use async_trait::async_trait;

    struct FixedExtraction {
        records: Vec<RequirementRecord>,
    }

    #[async_trait]
    impl ExtractionService for FixedExtraction {
        async fn extract_requirements(
            &self,
            _pdf: &[u8],
            _filename: &str,
        ) -> Result<Vec<RequirementRecord>, ServiceError> {
            Ok(self.records.clone())
        }
    }

    struct FixedMatching {
        records: Vec<MatchRecord>,
    }

    #[async_trait]
    impl MatchingService for FixedMatching {
        async fn match_requirements(
            &self,
            _pdf: &[u8],
            _filename: &str,
            _requirements: &[RequirementRecord],
        ) -> Result<Vec<MatchRecord>, ServiceError> {
            Ok(self.records.clone())
        }
    }

    fn requirement(text: &str) -> RequirementRecord {
        RequirementRecord {
            requirement: text.to_string(),
            source_text: text.to_string(),
        }
    }

    fn record(req: &str, confidence: &str) -> MatchRecord {
        MatchRecord {
            requirement: req.to_string(),
            matched_text: format!("{} matched", req),
            confidence: confidence.to_string(),
        }
    }

    #[tokio::test]
    async fn test_only_high_confidence_records_pass() {
        let orchestrator = MatchOrchestrator::new(
            Arc::new(FixedExtraction {
                records: vec![requirement("r1"), requirement("r2"), requirement("r3")],
            }),
            Arc::new(FixedMatching {
                records: vec![
                    record("r1", "HIGH"),
                    record("r2", "low"),
                    record("r3", "High"),
                ],
            }),
        );

        let accepted = orchestrator.run(b"left", "l.pdf", b"right", "r.pdf").await.unwrap();
        assert_eq!(accepted.len(), 2);
        assert_eq!(accepted[0].requirement, "r1");
        assert_eq!(accepted[1].requirement, "r3");
    }

    #[tokio::test]
    async fn test_no_requirements_short_circuits_matching() {
        let orchestrator = MatchOrchestrator::new(
            Arc::new(FixedExtraction { records: vec![] }),
            Arc::new(FixedMatching {
                records: vec![record("ghost", "HIGH")],
            }),
        );

        let accepted = orchestrator.run(b"left", "l.pdf", b"right", "r.pdf").await.unwrap();
        assert!(accepted.is_empty());
    }
}
