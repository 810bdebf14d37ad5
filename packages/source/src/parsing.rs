//! Shared parsing utilities for raw incident fields.
//!
//! Every helper returns `None` for input it cannot interpret. The loader
//! decides whether an absent value is acceptable or a [`crate::SourceError`].

use chrono::{NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// Parses a discovery or containment timestamp.
///
/// Accepts ISO dates with or without a time component and US-style
/// `MM/DD/YYYY` dates. Date-only values resolve to midnight.
#[must_use]
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Parses a finite floating point number.
#[must_use]
pub fn parse_f64(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Returns the trimmed value if the optional cell holds any text.
#[must_use]
pub fn non_empty(cell: Option<&String>) -> Option<&str> {
    cell.map(|s| s.trim()).filter(|s| !s.is_empty())
}

/// Whole calendar days between two timestamps, ignoring time of day.
#[must_use]
pub fn days_between(from: NaiveDateTime, to: NaiveDateTime) -> i64 {
    (to.date() - from.date()).num_days()
}
