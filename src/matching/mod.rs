//! Match orchestration boundary
//!
//! Record types, HTTP clients for the consumed extraction/matching
//! services, and the orchestrator that sequences them and applies the
//! confidence filter.

mod client;
mod orchestrator;
mod types;

pub use client::{
    ExtractionService, HttpExtractionService, HttpMatchingService, MatchingService, ServiceError,
};
pub use orchestrator::MatchOrchestrator;
pub use types::{
    decode_records, AcceptedMatch, Confidence, ExtractionResponse, MatchRecord, MatchingResponse,
    RequirementRecord,
};
