//! Data Transfer Objects for the HTTP API.
//!
//! Request/response shapes for the REST surface. Result types computed by
//! the engine and services already derive Serialize/Deserialize and are
//! re-exported rather than duplicated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Re-export the computed shapes the API serializes directly.
pub use crate::compliance::{ComplianceReport, DailyComplianceRecord, TierResult};
pub use crate::llm::{LlmReply, StructuredReply};
pub use crate::models::Sample;
pub use crate::services::{FeatureSummary, InsightContext, RangeAnalysis};

use super::error::AppError;
use crate::models::TimeRange;

/// Query parameters shared by all range endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct RangeQuery {
    /// Range start, RFC 3339 (e.g. 2026-03-10T00:00:00Z)
    pub start: String,
    /// Range end, RFC 3339
    pub end: String,
}

/// Query parameters for the Q&A endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AskQuery {
    pub start: String,
    pub end: String,
    /// Free-text question answered against the computed context
    pub question: String,
}

impl RangeQuery {
    /// Validate the query into a [`TimeRange`].
    ///
    /// Invalid datetimes and inverted ranges are client errors.
    pub fn parse(&self) -> Result<TimeRange, AppError> {
        let start = parse_rfc3339(&self.start)?;
        let end = parse_rfc3339(&self.end)?;

        TimeRange::new(start, end).ok_or_else(|| {
            AppError::BadRequest(format!(
                "start must be before end (got {} .. {})",
                self.start, self.end
            ))
        })
    }
}

impl AskQuery {
    pub fn parse(&self) -> Result<TimeRange, AppError> {
        RangeQuery {
            start: self.start.clone(),
            end: self.end.clone(),
        }
        .parse()
    }
}

fn parse_rfc3339(s: &str) -> Result<DateTime<Utc>, AppError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::BadRequest(format!("Invalid RFC 3339 datetime: {}", s)))
}

/// Response for GET /health.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Measurement store connectivity ("connected", "disconnected", "error: ...")
    pub store: String,
    /// Whether the explanation client is configured
    pub llm_configured: bool,
}

/// Response for GET /v1/data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataResponse {
    /// Raw samples in the queried range, ascending
    pub rows: Vec<Sample>,
    /// Computed analysis (count, features, compliance)
    #[serde(flatten)]
    pub analysis: RangeAnalysis,
}

/// Response for GET /v1/insight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightResponse {
    /// Number of samples analyzed
    pub count: usize,
    /// The authoritative context handed to the model
    pub context: InsightContext,
    /// Model reply in its original shape
    pub llm: LlmReply,
    /// Reply flattened to a single display string
    pub llm_text: String,
}

/// Response for GET /v1/ask.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    pub count: usize,
    /// Question echoed back
    pub question: String,
    pub context: InsightContext,
    pub llm: LlmReply,
    pub llm_text: String,
}
