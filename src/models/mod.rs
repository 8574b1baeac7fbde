//! Core domain values: melanopic-EDI samples, validated sample series, and
//! query time ranges.
//!
//! The compliance engine operates on [`SampleSeries`] values only. All
//! ingestion concerns (ordering, duplicate timestamps, non-finite readings)
//! are settled here, so downstream code can assume a clean, ascending series.

pub mod time;

pub use time::{local_date, local_time_of_day};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single melanopic-EDI reading.
///
/// Timestamps are stored in UTC; sub-second precision is carried but not
/// required. EDI values are non-negative by construction of [`SampleSeries`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Measurement instant (UTC).
    pub timestamp: DateTime<Utc>,
    /// Melanopic equivalent daylight illuminance estimate.
    pub edi: f64,
}

impl Sample {
    pub fn new(timestamp: DateTime<Utc>, edi: f64) -> Self {
        Self { timestamp, edi }
    }
}

/// Error raised when raw rows cannot be ingested into a [`SampleSeries`].
///
/// These are ingestion-layer rejections: series that pass construction never
/// produce errors inside the compliance engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SeriesError {
    #[error("non-finite EDI value at {timestamp}")]
    NonFiniteEdi { timestamp: DateTime<Utc> },

    #[error("negative EDI value {edi} at {timestamp}")]
    NegativeEdi { timestamp: DateTime<Utc>, edi: f64 },

    #[error("duplicate timestamp {timestamp}")]
    DuplicateTimestamp { timestamp: DateTime<Utc> },
}

/// Ordered, validated sequence of samples for a queried time range.
///
/// Immutable once constructed. The upstream store returns rows already sorted,
/// but [`SampleSeries::new`] sorts defensively rather than trusting that. An
/// empty series is a valid value and evaluates to zero compliance and zero
/// statistics everywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSeries {
    samples: Vec<Sample>,
}

impl SampleSeries {
    /// Build a series from raw samples: sort ascending by timestamp and
    /// reject non-finite values, negative values, and duplicate timestamps.
    pub fn new(mut samples: Vec<Sample>) -> Result<Self, SeriesError> {
        for s in &samples {
            if !s.edi.is_finite() {
                return Err(SeriesError::NonFiniteEdi {
                    timestamp: s.timestamp,
                });
            }
            if s.edi < 0.0 {
                return Err(SeriesError::NegativeEdi {
                    timestamp: s.timestamp,
                    edi: s.edi,
                });
            }
        }

        samples.sort_by_key(|s| s.timestamp);

        for pair in samples.windows(2) {
            if pair[0].timestamp == pair[1].timestamp {
                return Err(SeriesError::DuplicateTimestamp {
                    timestamp: pair[0].timestamp,
                });
            }
        }

        Ok(Self { samples })
    }

    /// An empty series.
    pub fn empty() -> Self {
        Self {
            samples: Vec::new(),
        }
    }

    /// Wrap samples already known to be sorted, unique and finite.
    ///
    /// Used by the local-day partitioner, which only ever splits an existing
    /// validated series.
    pub(crate) fn from_validated(samples: Vec<Sample>) -> Self {
        debug_assert!(samples.windows(2).all(|p| p[0].timestamp < p[1].timestamp));
        Self { samples }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// First sample, if any.
    pub fn first(&self) -> Option<&Sample> {
        self.samples.first()
    }

    /// Last sample, if any.
    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// Span between the first and last sample in seconds (0.0 when fewer
    /// than two samples exist).
    pub fn span_seconds(&self) -> f64 {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => {
                (last.timestamp - first.timestamp).num_milliseconds() as f64 / 1000.0
            }
            _ => 0.0,
        }
    }
}

/// Inclusive query time range, matching the store's gte/lte filtering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Range start (inclusive, UTC).
    pub start: DateTime<Utc>,
    /// Range end (inclusive, UTC).
    pub end: DateTime<Utc>,
}

impl TimeRange {
    /// Create a range, requiring `start < end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        if start < end {
            Some(Self { start, end })
        } else {
            None
        }
    }
}
