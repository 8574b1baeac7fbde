//! Range analysis orchestration.
//!
//! Pure assembly of everything the API reports for a queried range: the
//! compliance report plus global and per-day feature summaries. Stateless and
//! synchronous; callers that sit on an async runtime wrap it in
//! `spawn_blocking`.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::features::{compute_features, compute_features_by_day, FeatureSummary};
use crate::compliance::{build_compliance_report, ComplianceReport};
use crate::config::EngineConfig;
use crate::models::SampleSeries;

/// Everything computed for one queried range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeAnalysis {
    /// Number of samples analyzed.
    pub count: usize,
    /// Features over the full range.
    pub features_global: FeatureSummary,
    /// Features per local day.
    pub features_by_day: BTreeMap<NaiveDate, FeatureSummary>,
    /// Tier compliance, global and per local day.
    pub compliance: ComplianceReport,
}

/// Analyze a series under the given engine configuration.
pub fn analyze_range(series: &SampleSeries, config: &EngineConfig) -> RangeAnalysis {
    RangeAnalysis {
        count: series.len(),
        features_global: compute_features(series),
        features_by_day: compute_features_by_day(series, config.local_offset()),
        compliance: build_compliance_report(series, config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sample;
    use chrono::{DateTime, FixedOffset, TimeZone, Utc};

    fn local(h: u32, m: u32) -> DateTime<Utc> {
        FixedOffset::west_opt(5 * 3600)
            .unwrap()
            .with_ymd_and_hms(2026, 3, 10, h, m, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_empty_range_analysis() {
        let analysis = analyze_range(&SampleSeries::empty(), &EngineConfig::default());
        assert_eq!(analysis.count, 0);
        assert_eq!(analysis.features_global.count, 0);
        assert!(analysis.features_by_day.is_empty());
        assert!(analysis.compliance.by_day.is_empty());
    }

    #[test]
    fn test_day_keys_agree_between_features_and_compliance() {
        let samples = (0..=270)
            .step_by(5)
            .map(|m| Sample::new(local(6, 0) + chrono::Duration::minutes(m), 300.0))
            .collect();
        let series = SampleSeries::new(samples).unwrap();

        let analysis = analyze_range(&series, &EngineConfig::default());
        assert_eq!(analysis.count, series.len());

        let feature_days: Vec<_> = analysis.features_by_day.keys().collect();
        let compliance_days: Vec<_> = analysis.compliance.by_day.keys().collect();
        assert_eq!(feature_days, compliance_days);
    }
}
