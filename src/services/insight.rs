//! Insight context assembly.
//!
//! Packages already-finalized analysis results into the read-only context the
//! explanation endpoint forwards to the LLM. The LLM consumes this value and
//! never feeds anything back into the engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::analysis::RangeAnalysis;
use crate::models::TimeRange;

/// Queried range echoed back into the context.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeEcho {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Authoritative, computed context handed to the text-generation
/// collaborator. Raw rows are deliberately excluded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightContext {
    pub range: RangeEcho,
    #[serde(flatten)]
    pub analysis: RangeAnalysis,
}

/// Build the LLM context from a finalized analysis.
pub fn build_insight_context(range: &TimeRange, analysis: RangeAnalysis) -> InsightContext {
    InsightContext {
        range: RangeEcho {
            start: range.start,
            end: range.end,
        },
        analysis,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::models::SampleSeries;
    use crate::services::analysis::analyze_range;
    use chrono::TimeZone;

    #[test]
    fn test_context_serializes_without_rows() {
        let range = TimeRange::new(
            Utc.with_ymd_and_hms(2026, 3, 10, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 11, 0, 0, 0).unwrap(),
        )
        .unwrap();
        let analysis = analyze_range(&SampleSeries::empty(), &EngineConfig::default());

        let context = build_insight_context(&range, analysis);
        let json = serde_json::to_value(&context).unwrap();

        assert!(json["range"]["start"].is_string());
        assert!(json["features_global"].is_object());
        assert!(json["compliance"]["global"].is_object());
        assert!(json.get("rows").is_none());
    }
}
