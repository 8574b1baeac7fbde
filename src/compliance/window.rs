//! Continuous-window detector.
//!
//! The central algorithm of the engine: a single left-to-right scan over an
//! ascending sample series that finds gap-tolerant continuous runs at or
//! above a threshold and summarizes them for one tier.
//!
//! A run's duration is the span between its first and last sample. A run
//! qualifies when that span reaches the required duration and the run's end
//! falls at or before the local cutoff time-of-day; qualification is judged
//! on the closed maximal run, so a run that keeps extending past the cutoff
//! does not qualify on the strength of its pre-cutoff prefix.

use chrono::{DateTime, Duration, FixedOffset, NaiveTime, Utc};

use crate::models::{local_time_of_day, SampleSeries};

/// Detection parameters for one tier evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowCriteria {
    /// Minimum melanopic EDI a sample must reach to extend a run.
    pub threshold_edi: f64,
    /// Required run span.
    pub required: Duration,
    /// Largest gap between consecutive in-run samples that preserves
    /// continuity.
    pub max_gap: Duration,
    /// Local time-of-day the qualifying run must end at or before.
    /// `None` disables the constraint.
    pub cutoff: Option<NaiveTime>,
    /// Offset used to derive local time-of-day from UTC run ends.
    pub local_offset: FixedOffset,
}

/// A contiguous sub-sequence of samples at or above the threshold.
///
/// Ephemeral: recomputed on every evaluation, never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContinuousRun {
    /// Timestamp of the first sample in the run.
    pub start: DateTime<Utc>,
    /// Timestamp of the last sample in the run.
    pub end: DateTime<Utc>,
    /// Number of samples forming the run.
    pub sample_count: usize,
}

impl ContinuousRun {
    /// Span between first and last sample. A single-sample run has
    /// duration zero.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// Summary of one scan over a series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowScan {
    /// First qualifying run encountered (earliest by start time), reported
    /// as the evidence window. Compliance is about existence of *a* valid
    /// window; taking the first keeps results deterministic.
    pub evidence: Option<ContinuousRun>,
    /// Longest run observed, whether or not it qualifies. Diagnostic only.
    pub best: Option<ContinuousRun>,
    /// Largest gap between any two temporally adjacent samples in the whole
    /// series, independent of run continuity.
    pub max_gap: Duration,
}

impl WindowScan {
    fn empty() -> Self {
        Self {
            evidence: None,
            best: None,
            max_gap: Duration::zero(),
        }
    }
}

/// Scan a series for continuous runs against one tier's criteria.
///
/// O(n) in the series length. Raises no errors: empty or degenerate input
/// yields an empty summary.
pub fn scan_continuous_windows(series: &SampleSeries, criteria: &WindowCriteria) -> WindowScan {
    let mut scan = WindowScan::empty();
    let mut open_run: Option<ContinuousRun> = None;
    let mut prev_timestamp: Option<DateTime<Utc>> = None;

    for sample in series.samples() {
        let gap = prev_timestamp.map(|prev| sample.timestamp - prev);
        if let Some(gap) = gap {
            if gap > scan.max_gap {
                scan.max_gap = gap;
            }
        }

        if sample.edi >= criteria.threshold_edi {
            match open_run.as_mut() {
                // Gap within tolerance: the run keeps going.
                Some(run) if gap.is_some_and(|g| g <= criteria.max_gap) => {
                    run.end = sample.timestamp;
                    run.sample_count += 1;
                }
                // Oversized gap breaks continuity even above threshold.
                Some(_) => {
                    close_run(&mut scan, open_run.take(), criteria);
                    open_run = Some(single_sample_run(sample.timestamp));
                }
                None => {
                    open_run = Some(single_sample_run(sample.timestamp));
                }
            }
        } else {
            // Below threshold: any open run ends at the previous sample.
            close_run(&mut scan, open_run.take(), criteria);
        }

        prev_timestamp = Some(sample.timestamp);
    }

    close_run(&mut scan, open_run.take(), criteria);
    scan
}

fn single_sample_run(timestamp: DateTime<Utc>) -> ContinuousRun {
    ContinuousRun {
        start: timestamp,
        end: timestamp,
        sample_count: 1,
    }
}

/// Score a closed run: update the best-run diagnostic and record it as the
/// evidence window when it is the first to qualify.
fn close_run(scan: &mut WindowScan, run: Option<ContinuousRun>, criteria: &WindowCriteria) {
    let Some(run) = run else {
        return;
    };

    if scan.best.is_none_or(|best| run.duration() > best.duration()) {
        scan.best = Some(run);
    }

    if scan.evidence.is_some() {
        return;
    }

    let meets_duration = run.duration() >= criteria.required;
    let ends_in_time = criteria
        .cutoff
        .is_none_or(|cutoff| local_time_of_day(run.end, criteria.local_offset) <= cutoff);

    if meets_duration && ends_in_time {
        scan.evidence = Some(run);
    }
}
