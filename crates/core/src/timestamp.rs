//! Timestamp normalisation and parsing
//!
//! Ledger producers write ISO-8601 instants in a few shapes:
//! `2025-11-24T15:00:10Z`, `2025-11-24T15:00:10.123+02:00`,
//! `2025-11-24 15:00:10`. A trailing `Z` is rewritten to `+00:00` before any
//! parsing, and instants without an offset are read as UTC.

use crate::error::{Error, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::borrow::Cow;

const OFFSET_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Rewrite a trailing `Z`/`z` as an explicit `+00:00` offset
pub fn normalize_timestamp(raw: &str) -> Cow<'_, str> {
    let trimmed = raw.trim();
    match trimmed.strip_suffix('Z').or_else(|| trimmed.strip_suffix('z')) {
        Some(base) => Cow::Owned(format!("{}+00:00", base)),
        None => Cow::Borrowed(trimmed),
    }
}

/// Parse an ISO-8601 instant into a comparable offset datetime
pub fn parse_timestamp(raw: &str) -> Result<DateTime<FixedOffset>> {
    let normalized = normalize_timestamp(raw);
    let text = normalized.as_ref();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Ok(parsed);
    }
    for format in OFFSET_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(text, format) {
            return Ok(parsed);
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(Utc.from_utc_datetime(&naive).into());
        }
    }
    if let Some(midnight) = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(Utc.from_utc_datetime(&midnight).into());
    }

    Err(Error::InvalidTimestamp {
        value: raw.to_string(),
        reason: "not an ISO-8601 date-time".to_string(),
    })
}

/// Current instant as RFC 3339 text, used for verification and write times
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}
