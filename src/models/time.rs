//! Local-time helpers for a single configured UTC offset.
//!
//! Measurements are stored in UTC; occupants experience days in local time.
//! Both helpers shift the instant by the fixed offset first and derive the
//! calendar component from the shifted instant, never from the raw UTC value.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};

/// Local calendar date of a UTC instant under a fixed offset.
pub fn local_date(timestamp: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    timestamp.with_timezone(&offset).date_naive()
}

/// Local wall-clock time-of-day of a UTC instant under a fixed offset.
pub fn local_time_of_day(timestamp: DateTime<Utc>, offset: FixedOffset) -> NaiveTime {
    timestamp.with_timezone(&offset).time()
}
