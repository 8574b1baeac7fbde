//! Local-day partitioner.
//!
//! Groups a UTC sample series into per-calendar-day sub-series using the
//! configured fixed local offset. A sample belongs to exactly one local day:
//! the day of its offset-shifted instant. Samples are never duplicated or
//! dropped, and sub-series preserve the original ascending order.

use std::collections::BTreeMap;

use chrono::{FixedOffset, NaiveDate};

use crate::models::{local_date, Sample, SampleSeries};

/// Partition a series into per-local-date sub-series.
///
/// Days with zero samples are simply absent from the map; callers can tell
/// "no data queried for that day" apart from "data existed but failed the
/// tier" by key presence.
pub fn partition_by_local_day(
    series: &SampleSeries,
    offset: FixedOffset,
) -> BTreeMap<NaiveDate, SampleSeries> {
    let mut buckets: BTreeMap<NaiveDate, Vec<Sample>> = BTreeMap::new();

    for sample in series.samples() {
        let day = local_date(sample.timestamp, offset);
        buckets.entry(day).or_default().push(*sample);
    }

    buckets
        .into_iter()
        .map(|(day, samples)| (day, SampleSeries::from_validated(samples)))
        .collect()
}
