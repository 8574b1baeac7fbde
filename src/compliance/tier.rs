//! Tier evaluator.
//!
//! Runs the continuous-window detector once per configured tier against the
//! same series and assembles the per-tier result. Thresholds and required
//! durations are copied from static configuration, never inferred from data,
//! and tiers are evaluated independently: failing tier_1 does not exempt the
//! series from a tier_2 evaluation.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::window::{scan_continuous_windows, WindowCriteria};
use crate::config::{EngineConfig, TierDefinition};
use crate::models::{local_time_of_day, SampleSeries};

/// Evaluation outcome for one tier over one series.
///
/// `window_start`/`window_end` are `Some` exactly when `compliant` is true;
/// no other field combination signals non-compliance. Reasons for failure
/// travel in `notes`, never by omission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierResult {
    /// Stable tier key ("tier_1", "tier_2").
    pub tier: String,
    /// Human-readable tier label.
    pub label: String,
    /// Whether a qualifying continuous window exists.
    pub compliant: bool,
    /// Threshold copied from the tier definition.
    pub threshold_edi: f64,
    /// Required duration copied from the tier definition, in minutes.
    pub required_minutes: i64,
    /// Start of the evidence window (first qualifying run), when compliant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_start: Option<DateTime<Utc>>,
    /// End of the evidence window, when compliant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_end: Option<DateTime<Utc>>,
    /// Duration of the longest continuous run observed, compliant or not.
    pub best_continuous_minutes: f64,
    /// Shortfall against the requirement: `max(0, required - best)`.
    pub missing_minutes: f64,
    /// Largest gap between adjacent samples in the scanned series.
    pub max_gap_minutes: f64,
    /// Diagnostic notes (insufficient data, cutoff failures, marginal
    /// windows).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

/// Evaluate one tier against a series.
pub fn evaluate_tier(
    series: &SampleSeries,
    tier: &TierDefinition,
    config: &EngineConfig,
) -> TierResult {
    let criteria = WindowCriteria {
        threshold_edi: tier.threshold_edi,
        required: tier.required_duration(),
        max_gap: config.max_gap(),
        cutoff: Some(config.noon_cutoff),
        local_offset: config.local_offset(),
    };

    let scan = scan_continuous_windows(series, &criteria);

    let best_continuous_minutes = scan
        .best
        .map(|run| minutes(run.duration()))
        .unwrap_or(0.0);
    let missing_minutes = (tier.required_minutes as f64 - best_continuous_minutes).max(0.0);

    let mut notes = Vec::new();
    if series.is_empty() {
        notes.push("no samples in range; compliance cannot be established".to_string());
    }

    if scan.evidence.is_none() {
        if let Some(best) = scan.best {
            // A run met the duration but ended too late: a time-of-day
            // failure, reported distinctly from a duration failure.
            if best.duration() >= tier.required_duration() {
                let end_local = local_time_of_day(best.end, config.local_offset());
                notes.push(format!(
                    "continuous run of {:.0} min meets the duration requirement but ends at {} local, after the {} cutoff",
                    minutes(best.duration()),
                    end_local.format("%H:%M"),
                    config.noon_cutoff.format("%H:%M"),
                ));
            }
        }
    } else if let Some(evidence) = scan.evidence {
        let margin = minutes(evidence.duration()) - tier.required_minutes as f64;
        if margin <= config.marginal_window_minutes as f64 {
            notes.push(format!(
                "evidence window exceeds the required duration by only {:.0} min",
                margin
            ));
        }
    }

    TierResult {
        tier: tier.name.clone(),
        label: tier.label.clone(),
        compliant: scan.evidence.is_some(),
        threshold_edi: tier.threshold_edi,
        required_minutes: tier.required_minutes,
        window_start: scan.evidence.map(|run| run.start),
        window_end: scan.evidence.map(|run| run.end),
        best_continuous_minutes,
        missing_minutes,
        max_gap_minutes: minutes(scan.max_gap),
        notes,
    }
}

/// Evaluation of every configured tier, keyed by tier name.
pub type TierEvaluation = BTreeMap<String, TierResult>;

/// Evaluate all configured tiers against a series.
pub fn evaluate_tiers(series: &SampleSeries, config: &EngineConfig) -> TierEvaluation {
    config
        .tiers
        .iter()
        .map(|tier| (tier.name.clone(), evaluate_tier(series, tier, config)))
        .collect()
}

fn minutes(duration: chrono::Duration) -> f64 {
    duration.num_milliseconds() as f64 / 60_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sample;
    use chrono::{FixedOffset, TimeZone};

    fn config() -> EngineConfig {
        EngineConfig::default()
    }

    fn tier_1() -> TierDefinition {
        config().tiers[0].clone()
    }

    /// Series of above-threshold samples every 5 minutes across the given
    /// local Bogota wall-clock span.
    fn bright_span(start_min: i64, end_min: i64, edi: f64) -> SampleSeries {
        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        let base = offset
            .with_ymd_and_hms(2026, 3, 10, 0, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        let samples = (start_min..=end_min)
            .step_by(5)
            .map(|m| Sample::new(base + chrono::Duration::minutes(m), edi))
            .collect();
        SampleSeries::new(samples).unwrap()
    }

    #[test]
    fn test_empty_series_result() {
        let result = evaluate_tier(&SampleSeries::empty(), &tier_1(), &config());

        assert!(!result.compliant);
        assert!(result.window_start.is_none());
        assert!(result.window_end.is_none());
        assert_eq!(result.best_continuous_minutes, 0.0);
        assert_eq!(result.missing_minutes, 240.0);
        assert_eq!(result.max_gap_minutes, 0.0);
        assert_eq!(result.notes.len(), 1);
        assert!(result.notes[0].contains("no samples"));
    }

    #[test]
    fn test_compliant_window_pairing_invariant() {
        // 06:00-10:30 local, comfortably qualifying.
        let series = bright_span(6 * 60, 10 * 60 + 30, 300.0);
        let result = evaluate_tier(&series, &tier_1(), &config());

        assert!(result.compliant);
        assert!(result.window_start.is_some());
        assert!(result.window_end.is_some());
        assert_eq!(result.missing_minutes, 0.0);
        assert_eq!(result.threshold_edi, 136.0);
        assert_eq!(result.required_minutes, 240);
    }

    #[test]
    fn test_missing_minutes_derivation() {
        // Three continuous hours: 60 minutes short.
        let series = bright_span(6 * 60, 9 * 60, 300.0);
        let result = evaluate_tier(&series, &tier_1(), &config());

        assert!(!result.compliant);
        assert_eq!(result.best_continuous_minutes, 180.0);
        assert_eq!(result.missing_minutes, 60.0);
        assert!(result.window_start.is_none() && result.window_end.is_none());
    }

    #[test]
    fn test_cutoff_failure_is_noted_distinctly() {
        // 08:00-13:00 local: long enough, too late.
        let series = bright_span(8 * 60, 13 * 60, 300.0);
        let result = evaluate_tier(&series, &tier_1(), &config());

        assert!(!result.compliant);
        assert!(result.best_continuous_minutes >= 240.0);
        assert_eq!(result.missing_minutes, 0.0);
        assert!(result.notes.iter().any(|n| n.contains("cutoff")));
    }

    #[test]
    fn test_marginal_window_is_noted() {
        // 245 minutes: exceeds the 240-minute requirement by 5.
        let series = bright_span(6 * 60, 10 * 60 + 5, 300.0);
        let result = evaluate_tier(&series, &tier_1(), &config());

        assert!(result.compliant);
        assert!(result.notes.iter().any(|n| n.contains("only 5 min")));
    }

    #[test]
    fn test_tiers_evaluated_independently() {
        // 200 EDI passes tier_1 (136) but not tier_2 (250).
        let series = bright_span(6 * 60, 10 * 60 + 30, 200.0);
        let evaluation = evaluate_tiers(&series, &config());

        assert!(evaluation["tier_1"].compliant);
        assert!(!evaluation["tier_2"].compliant);
        // tier_2 still gets full diagnostics rather than being skipped.
        assert_eq!(evaluation["tier_2"].best_continuous_minutes, 0.0);
        assert_eq!(evaluation["tier_2"].missing_minutes, 240.0);
    }

    #[test]
    fn test_raising_threshold_never_helps() {
        let series = bright_span(6 * 60, 10 * 60 + 30, 200.0);
        let low = evaluate_tier(&series, &tier_1(), &config());

        let mut strict = tier_1();
        strict.threshold_edi = 250.0;
        let high = evaluate_tier(&series, &strict, &config());

        assert!(high.best_continuous_minutes <= low.best_continuous_minutes);
        assert!(!high.compliant || low.compliant);
    }

    #[test]
    fn test_idempotent_evaluation() {
        let series = bright_span(6 * 60, 9 * 60, 300.0);
        let a = evaluate_tier(&series, &tier_1(), &config());
        let b = evaluate_tier(&series, &tier_1(), &config());
        assert_eq!(a, b);
    }
}
