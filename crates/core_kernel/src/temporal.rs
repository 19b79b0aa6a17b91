//! Timestamp parsing and serde helpers
//!
//! Policy start dates travel over HTTP both in JSON bodies and in query
//! strings. Clients send full RFC 3339 timestamps, naive date-times, or bare
//! calendar dates; all of them are normalised to `DateTime<Utc>`, with naive
//! values interpreted as UTC and bare dates pinned to midnight.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Unrecognised timestamp: {0}")]
    InvalidTimestamp(String),
}

const NAIVE_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Parses a timestamp in any of the accepted wire formats
///
/// # Arguments
///
/// * `input` - RFC 3339 timestamp, naive date-time, or `YYYY-MM-DD` date
///
/// # Example
///
/// ```rust
/// use core_kernel::temporal::parse_timestamp;
///
/// let ts = parse_timestamp("2024-01-01").unwrap();
/// assert_eq!(ts.to_rfc3339(), "2024-01-01T00:00:00+00:00");
/// ```
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>, TemporalError> {
    let trimmed = input.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ts.with_timezone(&Utc));
    }

    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| TemporalError::InvalidTimestamp(input.to_string()))
}

/// Midnight UTC on the given calendar day
///
/// Returns `None` for dates chrono cannot represent.
pub fn utc_midnight(year: i32, month: u32, day: u32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).single()
}

/// Serde adapter accepting every format understood by [`parse_timestamp`]
///
/// Use with `#[serde(deserialize_with = "core_kernel::temporal::lenient::deserialize")]`.
pub mod lenient {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw).map_err(serde::de::Error::custom)
    }

    /// Optional variant; `null` and a missing field both yield `None`
    pub mod option {
        use super::*;

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) => parse_timestamp(&raw)
                    .map(Some)
                    .map_err(serde::de::Error::custom),
                None => Ok(None),
            }
        }
    }
}
