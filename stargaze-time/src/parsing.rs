//! Parsing user-entered dates and converting epoch values.
//!
//! The time-travel dialog accepts a date with or without a time of day; all
//! accepted forms resolve to Unix epoch milliseconds in UTC, the unit every
//! clock in this crate speaks.

use crate::errors::{Result, TimeError};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parses a UTC date/time string to epoch milliseconds.
///
/// Accepted forms: `2021-06-01 22:00:00`, `2021-06-01 22:00` and a bare
/// `2021-06-01` (midnight).
pub fn parse_datetime(text: &str) -> Result<i64> {
    let trimmed = text.trim();

    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc().timestamp_millis());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc().timestamp_millis());
        }
    }

    Err(TimeError::UnparseableDate(trimmed.to_string()))
}

/// Converts epoch milliseconds to a chrono UTC instant.
///
/// # Errors
///
/// Returns [`TimeError::TimestampOutOfRange`] for values chrono cannot
/// represent (roughly beyond +/-262,000 years).
pub fn datetime_from_epoch_millis(epoch_millis: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(epoch_millis)
        .ok_or(TimeError::TimestampOutOfRange(epoch_millis))
}
