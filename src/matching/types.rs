//! Match service record types
//!
//! Strict tagged types for the records returned by the external
//! extraction and matching services. The services are dynamically typed
//! at their boundary, so records are decoded one by one: an entry with
//! missing or mistyped fields is dropped with a warning instead of
//! failing the whole response.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Confidence label attached to a match record by the matching service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
    Unknown,
}

impl Confidence {
    /// Case-insensitive parse; anything unrecognized maps to `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "high" => Self::High,
            "medium" => Self::Medium,
            "low" => Self::Low,
            _ => Self::Unknown,
        }
    }

    pub fn is_high(self) -> bool {
        matches!(self, Self::High)
    }
}

/// One requirement extracted from the left document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequirementRecord {
    pub requirement: String,
    /// Source passage the requirement was extracted from.
    #[serde(rename = "req_file_txt")]
    pub source_text: String,
}

/// One match located by the matching service in the right document.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchRecord {
    pub requirement: String,
    pub matched_text: String,
    pub confidence: String,
}

impl MatchRecord {
    pub fn confidence(&self) -> Confidence {
        Confidence::from_label(&self.confidence)
    }
}

/// A match that survived the confidence filter and is eligible for
/// highlighting on the right document's pages.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptedMatch {
    pub requirement: String,
    pub matched_text: String,
}

/// Wire envelope of the extraction service.
#[derive(Debug, Deserialize)]
pub struct ExtractionResponse {
    #[serde(default)]
    pub requirements: Vec<serde_json::Value>,
}

/// Wire envelope of the matching service.
#[derive(Debug, Deserialize)]
pub struct MatchingResponse {
    #[serde(default)]
    pub matched_requirements: Vec<serde_json::Value>,
}

/// Decode raw boundary records leniently: invalid entries are dropped
/// with a warning, never surfaced as a failure.
pub fn decode_records<T: DeserializeOwned>(raw: Vec<serde_json::Value>, what: &str) -> Vec<T> {
    let mut records = Vec::with_capacity(raw.len());
    for value in raw {
        match serde_json::from_value::<T>(value) {
            Ok(record) => records.push(record),
            Err(e) => tracing::warn!("Dropping malformed {} record: {}", what, e),
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_confidence_parse_is_case_insensitive() {
        assert_eq!(Confidence::from_label("HIGH"), Confidence::High);
        assert_eq!(Confidence::from_label("High"), Confidence::High);
        assert_eq!(Confidence::from_label("high"), Confidence::High);
        assert_eq!(Confidence::from_label(" medium "), Confidence::Medium);
        assert_eq!(Confidence::from_label("LOW"), Confidence::Low);
        assert_eq!(Confidence::from_label("banana"), Confidence::Unknown);
    }

    #[test]
    fn test_confidence_filter_scenario() {
        let records = vec![
            MatchRecord {
                requirement: "r1".into(),
                matched_text: "t1".into(),
                confidence: "HIGH".into(),
            },
            MatchRecord {
                requirement: "r2".into(),
                matched_text: "t2".into(),
                confidence: "low".into(),
            },
            MatchRecord {
                requirement: "r3".into(),
                matched_text: "t3".into(),
                confidence: "High".into(),
            },
        ];

        let accepted: Vec<&MatchRecord> =
            records.iter().filter(|r| r.confidence().is_high()).collect();
        assert_eq!(accepted.len(), 2);
        assert_eq!(accepted[0].requirement, "r1");
        assert_eq!(accepted[1].requirement, "r3");
    }

    #[test]
    fn test_malformed_records_are_dropped_not_fatal() {
        let raw = vec![
            json!({"requirement": "r1", "matched_text": "t1", "confidence": "HIGH"}),
            json!({"requirement": "r2"}),
            json!("not even an object"),
            json!({"requirement": "r3", "matched_text": "t3", "confidence": "LOW"}),
        ];
        let records: Vec<MatchRecord> = decode_records(raw, "match");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].requirement, "r1");
        assert_eq!(records[1].requirement, "r3");
    }

    #[test]
    fn test_requirement_record_wire_field_name() {
        let value = json!({"requirement": "The system shall verify.", "req_file_txt": "source"});
        let record: RequirementRecord = serde_json::from_value(value).unwrap();
        assert_eq!(record.source_text, "source");
    }
}
