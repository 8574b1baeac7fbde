//! Public API surface for the LightWell backend.
//!
//! This file consolidates the value types serialized by the HTTP API and
//! consumed by library users. All types derive Serialize/Deserialize for
//! JSON serialization.

pub use crate::compliance::ComplianceReport;
pub use crate::compliance::ContinuousRun;
pub use crate::compliance::DailyComplianceRecord;
pub use crate::compliance::TierEvaluation;
pub use crate::compliance::TierResult;
pub use crate::compliance::WindowCriteria;
pub use crate::compliance::WindowScan;
pub use crate::config::EngineConfig;
pub use crate::config::TierDefinition;
pub use crate::llm::LlmReply;
pub use crate::llm::StructuredReply;
pub use crate::models::Sample;
pub use crate::models::SampleSeries;
pub use crate::models::SeriesError;
pub use crate::models::TimeRange;
pub use crate::services::FeatureSummary;
pub use crate::services::InsightContext;
pub use crate::services::RangeAnalysis;
