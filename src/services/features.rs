//! Descriptive statistics over an EDI series.
//!
//! A simple reduction feeding the API payload and the LLM context; it is not
//! part of the compliance engine and enforces no tier rules.

use std::collections::BTreeMap;

use chrono::{FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::compliance::partition_by_local_day;
use crate::models::SampleSeries;

/// Compact numerical features of a series.
///
/// The shape is stable for an empty series: `count` and `duration_s` are
/// zero and every statistic is null rather than the fields being absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSummary {
    pub count: usize,
    /// Span between first and last sample in seconds.
    pub duration_s: f64,
    pub edi_min: Option<f64>,
    pub edi_max: Option<f64>,
    pub edi_mean: Option<f64>,
    pub edi_median: Option<f64>,
    pub edi_std: Option<f64>,
    pub edi_p10: Option<f64>,
    pub edi_p90: Option<f64>,
    /// Chronologically last value (current state).
    pub edi_last: Option<f64>,
    pub edi_delta_vs_median: Option<f64>,
}

impl FeatureSummary {
    fn empty() -> Self {
        Self {
            count: 0,
            duration_s: 0.0,
            edi_min: None,
            edi_max: None,
            edi_mean: None,
            edi_median: None,
            edi_std: None,
            edi_p10: None,
            edi_p90: None,
            edi_last: None,
            edi_delta_vs_median: None,
        }
    }
}

/// Compute features over a whole series.
pub fn compute_features(series: &SampleSeries) -> FeatureSummary {
    if series.is_empty() {
        return FeatureSummary::empty();
    }

    let mut values: Vec<f64> = series.samples().iter().map(|s| s.edi).collect();
    let last = *values.last().expect("non-empty");
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;
    let median = median_of_sorted(&values);
    let std = sample_std(&values, mean);

    FeatureSummary {
        count,
        duration_s: series.span_seconds(),
        edi_min: Some(values[0]),
        edi_max: Some(values[count - 1]),
        edi_mean: Some(mean),
        edi_median: Some(median),
        edi_std: Some(std),
        edi_p10: Some(percentile_of_sorted(&values, 10.0)),
        edi_p90: Some(percentile_of_sorted(&values, 90.0)),
        edi_last: Some(last),
        edi_delta_vs_median: Some(last - median),
    }
}

/// Compute the same features grouped per local day.
///
/// Uses the engine's partitioner so day keys always agree with the
/// compliance report.
pub fn compute_features_by_day(
    series: &SampleSeries,
    offset: FixedOffset,
) -> BTreeMap<NaiveDate, FeatureSummary> {
    partition_by_local_day(series, offset)
        .into_iter()
        .map(|(day, day_series)| (day, compute_features(&day_series)))
        .collect()
}

fn median_of_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}

/// Sample standard deviation (n - 1), 0.0 for a single value.
fn sample_std(values: &[f64], mean: f64) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let sum_sq: f64 = values.iter().map(|v| (v - mean) * (v - mean)).sum();
    (sum_sq / (n - 1) as f64).sqrt()
}

/// Percentile by linear interpolation between closest ranks.
fn percentile_of_sorted(sorted: &[f64], p: f64) -> f64 {
    let k = (sorted.len() - 1) as f64 * (p / 100.0);
    let f = k.floor() as usize;
    let c = (f + 1).min(sorted.len() - 1);

    if f == c {
        return sorted[f];
    }
    sorted[f] + (sorted[c] - sorted[f]) * (k - f as f64)
}
