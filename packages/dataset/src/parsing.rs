//! Shared field parsing for both ingestion paths.
//!
//! Date and casualty coercion live here so that the delimited and JSON
//! sources converge on identical [`Incident`](incident_dashboard_incident_models::Incident)
//! values for identical input text.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use thiserror::Error;

/// Date-only formats, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d %b %Y", "%d %B %Y"];

/// Datetime formats whose time part is discarded, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Error returned when a casualty value is not a non-negative whole number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("expected a non-negative whole number")]
pub struct InvalidCount;

/// Parses a calendar date from the textual forms found in incident sources.
///
/// Any time-of-day component is dropped. Returns `None` if the text is not
/// a valid calendar date in any supported form.
#[must_use]
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    let naive = s.strip_suffix('Z').unwrap_or(s);
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, format) {
            return Some(dt.date());
        }
    }

    None
}

/// Converts milliseconds since the Unix epoch into a UTC calendar date.
#[must_use]
pub fn date_from_millis(millis: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(millis).map(|dt| dt.date_naive())
}

/// Coerces casualty text into a count.
///
/// Blank, `null` and `NaN` cells are absent (`Ok(None)`). Floats with no
/// fractional part (`"5.0"`) are accepted.
///
/// # Errors
///
/// Returns [`InvalidCount`] for negative, fractional, or non-numeric text.
pub fn parse_casualties(s: &str) -> Result<Option<u32>, InvalidCount> {
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("null") || s.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }

    if let Ok(n) = s.parse::<u32>() {
        return Ok(Some(n));
    }

    let value = s.parse::<f64>().map_err(|_| InvalidCount)?;
    count_from_f64(value).map(Some)
}

/// Accepts a float only if it is a whole number that fits in a `u32`.
///
/// # Errors
///
/// Returns [`InvalidCount`] otherwise.
pub fn count_from_f64(value: f64) -> Result<u32, InvalidCount> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= f64::from(u32::MAX) {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Ok(value as u32)
    } else {
        Err(InvalidCount)
    }
}
