//! End-to-end scenarios for the compliance window engine.
//!
//! These tests pin the boundary semantics of the engine: run duration as the
//! span between first and last sample, the inclusive noon cutoff judged on
//! the closed run, gap-driven continuity breaks, and local-day partitioning
//! of a UTC-stored dataset.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Utc};

use lightwell::api::{EngineConfig, Sample, SampleSeries};
use lightwell::compliance::{build_compliance_report, evaluate_tier, partition_by_local_day};

fn bogota() -> FixedOffset {
    FixedOffset::west_opt(5 * 3600).unwrap()
}

/// Timestamp at the given Bogota wall-clock time on 2026-03-10 + `day_offset`.
fn local(day_offset: u32, h: u32, m: u32) -> DateTime<Utc> {
    bogota()
        .with_ymd_and_hms(2026, 3, 10 + day_offset, h, m, 0)
        .unwrap()
        .with_timezone(&Utc)
}

fn series(samples: Vec<Sample>) -> SampleSeries {
    SampleSeries::new(samples).unwrap()
}

/// Default configuration with a widened gap tolerance, for scenarios whose
/// sampling cadence is coarser than the production default.
fn config_with_gap(max_gap_minutes: i64) -> EngineConfig {
    let config = EngineConfig {
        max_gap_minutes,
        ..EngineConfig::default()
    };
    config.validate().expect("test config must be valid");
    config
}

// ============================================================================
// Scenario A: hourly samples 06:00..09:00 span three hours, not four
// ============================================================================

#[test]
fn morning_span_short_of_requirement_is_not_compliant() {
    // Four samples at 06:00, 07:00, 08:00, 09:00 local, all bright. The run
    // spans 09:00 - 06:00 = 3 h: the duration is the span between first and
    // last sample, so the day misses the 4 h requirement by an hour.
    let config = config_with_gap(60);
    let s = series(
        (6..=9)
            .map(|h| Sample::new(local(0, h, 0), 300.0))
            .collect(),
    );

    let result = evaluate_tier(&s, &config.tiers[0], &config);

    assert!(!result.compliant);
    assert_eq!(result.best_continuous_minutes, 180.0);
    assert_eq!(result.missing_minutes, 60.0);
    assert!(result.window_start.is_none());
    assert!(result.window_end.is_none());
}

#[test]
fn morning_span_reaching_four_hours_is_compliant() {
    // Extending the same sampling to 10:00 closes the 4 h span.
    let config = config_with_gap(60);
    let s = series(
        (6..=10)
            .map(|h| Sample::new(local(0, h, 0), 300.0))
            .collect(),
    );

    let result = evaluate_tier(&s, &config.tiers[0], &config);

    assert!(result.compliant);
    assert_eq!(result.window_start, Some(local(0, 6, 0)));
    assert_eq!(result.window_end, Some(local(0, 10, 0)));
}

// ============================================================================
// Scenario B: a 20-minute hole breaks continuity under a 10-minute tolerance
// ============================================================================

#[test]
fn oversized_gap_splits_run_and_is_reported() {
    // Bright every 5 minutes from 05:00 to 09:30 local, except nothing
    // between 07:00 and 07:20.
    let mut samples = Vec::new();
    let mut minute = 5 * 60;
    while minute <= 9 * 60 + 30 {
        let skip_in_hole = minute > 7 * 60 && minute < 7 * 60 + 20;
        if !skip_in_hole {
            samples.push(Sample::new(
                local(0, (minute / 60) as u32, (minute % 60) as u32),
                300.0,
            ));
        }
        minute += 5;
    }

    let config = EngineConfig::default();
    let result = evaluate_tier(&series(samples), &config.tiers[0], &config);

    // Sub-runs are 05:00..07:00 (120 min) and 07:20..09:30 (130 min).
    assert!(!result.compliant);
    assert_eq!(result.best_continuous_minutes, 130.0);
    assert_eq!(result.max_gap_minutes, 20.0);
}

// ============================================================================
// Scenario C: duration met, cutoff missed
// ============================================================================

#[test]
fn run_ending_after_noon_fails_with_cutoff_note() {
    // Bright every 5 minutes from 08:30 to 13:00 local: 270 continuous
    // minutes, but the run ends an hour past the cutoff.
    let samples = (0..=54)
        .map(|i| {
            let minute = 8 * 60 + 30 + i * 5;
            Sample::new(local(0, (minute / 60) as u32, (minute % 60) as u32), 300.0)
        })
        .collect();

    let config = EngineConfig::default();
    let result = evaluate_tier(&series(samples), &config.tiers[0], &config);

    assert!(!result.compliant);
    assert!(result.best_continuous_minutes >= 240.0);
    assert_eq!(result.missing_minutes, 0.0);
    // The failure reason is the time of day, reported distinctly from a
    // duration shortfall.
    assert!(result.notes.iter().any(|n| n.contains("cutoff")));
    assert!(result.window_start.is_none() && result.window_end.is_none());
}

// ============================================================================
// Scenario D: UTC range straddling local midnight
// ============================================================================

#[test]
fn samples_straddling_local_midnight_split_cleanly() {
    // 04:30 and 05:30 UTC on March 11 are 23:30 March 10 and 00:30 March 11
    // in Bogota.
    let s = series(vec![
        Sample::new(Utc.with_ymd_and_hms(2026, 3, 11, 4, 30, 0).unwrap(), 50.0),
        Sample::new(Utc.with_ymd_and_hms(2026, 3, 11, 5, 30, 0).unwrap(), 60.0),
    ]);

    let days = partition_by_local_day(&s, bogota());

    assert_eq!(days.len(), 2);
    let march_10 = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
    let march_11 = NaiveDate::from_ymd_opt(2026, 3, 11).unwrap();
    assert_eq!(days[&march_10].len(), 1);
    assert_eq!(days[&march_11].len(), 1);
    assert_eq!(days[&march_10].samples()[0].edi, 50.0);

    let total: usize = days.values().map(|d| d.len()).sum();
    assert_eq!(total, s.len());
}

#[test]
fn two_day_report_evaluates_each_local_day_independently() {
    // Day one qualifies for tier_1 only, day two for both tiers.
    let mut samples: Vec<Sample> = (0..=54)
        .map(|i| Sample::new(local(0, 6, 0) + Duration::minutes(i * 5), 150.0))
        .collect();
    samples.extend(
        (0..=54).map(|i| Sample::new(local(1, 6, 0) + Duration::minutes(i * 5), 400.0)),
    );

    let config = EngineConfig::default();
    let report = build_compliance_report(&series(samples), &config);

    let day_1 = &report.by_day[&NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()];
    let day_2 = &report.by_day[&NaiveDate::from_ymd_opt(2026, 3, 11).unwrap()];

    assert!(day_1.tiers["tier_1"].compliant);
    assert!(!day_1.tiers["tier_2"].compliant);
    assert!(day_2.tiers["tier_1"].compliant);
    assert!(day_2.tiers["tier_2"].compliant);
}

// ============================================================================
// Cross-cutting properties
// ============================================================================

#[test]
fn compliant_windows_satisfy_duration_and_cutoff() {
    let config = EngineConfig::default();
    let samples = (0..=54)
        .map(|i| Sample::new(local(0, 6, 0) + Duration::minutes(i * 5), 400.0))
        .collect();
    let s = series(samples);

    let report = build_compliance_report(&s, &config);

    for result in report.global.values().chain(
        report
            .by_day
            .values()
            .flat_map(|record| record.tiers.values()),
    ) {
        if result.compliant {
            let start = result.window_start.expect("compliant implies window");
            let end = result.window_end.expect("compliant implies window");
            assert!(end - start >= Duration::minutes(result.required_minutes));
            assert!(end.with_timezone(&bogota()).time() <= config.noon_cutoff);
        } else {
            assert!(result.window_start.is_none());
            assert!(result.window_end.is_none());
        }
    }
}

#[test]
fn empty_series_degrades_to_non_compliance() {
    let config = EngineConfig::default();
    let result = evaluate_tier(&SampleSeries::empty(), &config.tiers[1], &config);

    assert!(!result.compliant);
    assert_eq!(result.best_continuous_minutes, 0.0);
    assert_eq!(result.missing_minutes, 240.0);
    assert!(result.window_start.is_none() && result.window_end.is_none());
    assert!(!result.notes.is_empty());
}

#[test]
fn raising_threshold_is_monotone() {
    // 05:30..11:30 local alternating between 200 and 300 EDI.
    let samples: Vec<Sample> = (0..=72)
        .map(|i| {
            let edi = if i % 2 == 0 { 300.0 } else { 200.0 };
            Sample::new(local(0, 5, 30) + Duration::minutes(i * 5), edi)
        })
        .collect();
    let s = series(samples);
    let config = EngineConfig::default();

    let mut previous_best = f64::INFINITY;
    let mut previous_compliant = true;
    for threshold in [136.0, 200.0, 250.0, 301.0] {
        let mut tier = config.tiers[0].clone();
        tier.threshold_edi = threshold;
        let result = evaluate_tier(&s, &tier, &config);

        assert!(result.best_continuous_minutes <= previous_best);
        // A non-compliant threshold never becomes compliant when raised.
        assert!(previous_compliant || !result.compliant);

        previous_best = result.best_continuous_minutes;
        previous_compliant = result.compliant;
    }
}

#[test]
fn repeated_evaluation_is_bit_identical() {
    let samples = (0..=54)
        .map(|i| Sample::new(local(0, 6, 0) + Duration::minutes(i * 5), 250.0))
        .collect();
    let s = series(samples);
    let config = EngineConfig::default();

    let a = build_compliance_report(&s, &config);
    let b = build_compliance_report(&s, &config);

    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}
