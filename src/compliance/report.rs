//! Compliance report builder.
//!
//! Top of the engine: one tier evaluation over the full queried range, plus
//! independent per-local-day evaluations via the partitioner. The report is a
//! plain value owned by the caller; nothing is cached or shared between
//! requests.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::partition::partition_by_local_day;
use super::tier::{evaluate_tiers, TierEvaluation};
use crate::config::EngineConfig;
use crate::models::SampleSeries;

/// Per-local-day evaluation of every configured tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyComplianceRecord {
    /// Local calendar date in the configured offset.
    pub local_date: NaiveDate,
    /// Tier results keyed by tier name.
    #[serde(flatten)]
    pub tiers: TierEvaluation,
}

/// Full evaluation of a queried range.
///
/// Days with zero samples are omitted from `by_day`: absence of a key means
/// no data was queried for that day, which is distinct from a present record
/// with `compliant = false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    /// Evaluation over the full range without day partitioning.
    pub global: TierEvaluation,
    /// Independent evaluation per local calendar day.
    pub by_day: BTreeMap<NaiveDate, DailyComplianceRecord>,
}

/// Build the complete report for a series.
pub fn build_compliance_report(series: &SampleSeries, config: &EngineConfig) -> ComplianceReport {
    let global = evaluate_tiers(series, config);

    let by_day = partition_by_local_day(series, config.local_offset())
        .into_iter()
        .map(|(local_date, day_series)| {
            let record = DailyComplianceRecord {
                local_date,
                tiers: evaluate_tiers(&day_series, config),
            };
            (local_date, record)
        })
        .collect();

    ComplianceReport { global, by_day }
}
