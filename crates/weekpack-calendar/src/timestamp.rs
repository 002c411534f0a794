//! Lenient timestamp parsing
//!
//! Calendar providers and the web frontend hand us timestamps in several
//! shapes. All of them are reduced to the wall-clock [`NaiveDateTime`] in
//! the timestamp's own offset; offsets are never converted, so an event at
//! `08:00Z` lands in the 08:00 row.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Offset-aware formats tried after RFC 3339.
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Naive formats, most specific first.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    // iCalendar basic format
    "%Y%m%dT%H%M%SZ",
    "%Y%m%dT%H%M%S",
];

/// Parse a timestamp string into its wall-clock date and time.
///
/// Accepts, in order:
/// - RFC 3339 / ISO-8601 with `Z` or a numeric offset, with or without
///   fractional seconds (`2025-07-14T08:00:00Z`, `2025-07-14T08:00:00.000+02:00`)
/// - ISO-8601 without an offset (`2025-07-14T08:00:00`, `2025-07-14T08:00`)
/// - the plain `YYYY-MM-DD HH:MM:SS` fallback
/// - iCalendar basic format (`20250714T080000Z`)
/// - a bare date, read as midnight
///
/// Returns `None` for anything else; callers count these as skipped.
///
/// # Examples
///
/// ```
/// use weekpack_calendar::parse_timestamp;
///
/// let ts = parse_timestamp("2025-07-14T08:00:00Z").unwrap();
/// assert_eq!(ts.format("%H:%M").to_string(), "08:00");
/// assert!(parse_timestamp("not-a-date").is_none());
/// ```
#[must_use]
pub fn parse_timestamp(input: &str) -> Option<NaiveDateTime> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.naive_local());
        }
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    parse_plain_date(s).and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Parse a date, accepting either `YYYY-MM-DD`, `YYYYMMDD` or any full
/// timestamp understood by [`parse_timestamp`] (its date part is used).
///
/// Week bounds arrive in both shapes: the web client sends
/// `2025-07-14` as often as `2025-07-14T00:00:00.000Z`.
#[must_use]
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let s = input.trim();
    parse_plain_date(s).or_else(|| parse_timestamp(s).map(|dt| dt.date()))
}

fn parse_plain_date(s: &str) -> Option<NaiveDate> {
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if s.len() == 8 {
        return NaiveDate::parse_from_str(s, "%Y%m%d").ok();
    }
    None
}
