//! iCalendar import
//!
//! Reads `VEVENT`s from an `.ics` file into [`RawEvent`]s so they can go
//! through the same normalizer as events from the web application.
//!
//! ## Example
//!
//! ```no_run
//! use weekpack_calendar::{normalize_events, parse_ics, Week};
//!
//! let events = parse_ics("schedule.ics")?;
//! let week = Week::from_bounds("2025-07-14", "2025-07-20")?;
//! let normalized = normalize_events(events, &week);
//! println!("{} events this week", normalized.events.len());
//! # Ok::<(), weekpack_calendar::CalendarError>(())
//! ```

use crate::error::{CalendarError, Result};
use crate::event::RawEvent;
use chrono::Duration;
use ical::parser::ical::component::IcalEvent;
use ical::property::Property;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Source label given to imported events
pub const ICS_SOURCE: &str = "ICS";

/// Events read from one iCalendar file, plus what was left out
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IcsImport {
    /// Timed events, in file order
    pub events: Vec<RawEvent>,
    /// All-day events (`DTSTART;VALUE=DATE`), which have no place on the grid
    pub skipped_all_day: usize,
    /// `VEVENT`s without a `DTSTART`
    pub skipped_undated: usize,
}

impl IcsImport {
    /// `VEVENT`s that did not become events
    #[must_use]
    pub const fn skipped(&self) -> usize {
        self.skipped_all_day + self.skipped_undated
    }
}

/// Parse an ICS file into raw event records, counting the `VEVENT`s that
/// were left out.
///
/// Property mapping: `SUMMARY` → title, `DTSTART` → start, `UID` → id,
/// `DESCRIPTION` → description. The end comes from `DTEND`, or from
/// `DTSTART` plus `DURATION` when there is no `DTEND`. All-day events and
/// `VEVENT`s without a `DTSTART` are skipped and counted; everything else
/// is left to the normalizer.
///
/// # Errors
///
/// Returns `CalendarError` if the file cannot be read or is not a valid
/// iCalendar stream.
pub fn import_ics<P: AsRef<Path>>(path: P) -> Result<IcsImport> {
    let path = path.as_ref();

    let file = File::open(path).map_err(|e| CalendarError::read_error(path, e))?;
    let import = read_ics(BufReader::new(file))
        .map_err(|message| CalendarError::invalid_format(path, message))?;

    log::debug!(
        "Imported {} events from {} ({} all-day, {} undated skipped)",
        import.events.len(),
        path.display(),
        import.skipped_all_day,
        import.skipped_undated
    );
    Ok(import)
}

/// Parse an ICS file into raw event records; see [`import_ics`].
///
/// # Errors
///
/// Returns `CalendarError` if the file cannot be read or is not a valid
/// iCalendar stream.
#[must_use = "this function returns parsed events that should be processed"]
pub fn parse_ics<P: AsRef<Path>>(path: P) -> Result<Vec<RawEvent>> {
    import_ics(path).map(|import| import.events)
}

fn read_ics<B: BufRead>(reader: B) -> std::result::Result<IcsImport, String> {
    let parser = ical::IcalParser::new(reader);
    let mut import = IcsImport::default();

    for calendar_result in parser {
        let calendar = calendar_result.map_err(|e| format!("ICS parse error: {e}"))?;
        for event in &calendar.events {
            match convert_event(event) {
                Converted::Timed(raw) => import.events.push(raw),
                Converted::AllDay => import.skipped_all_day += 1,
                Converted::Undated => import.skipped_undated += 1,
            }
        }
    }

    Ok(import)
}

enum Converted {
    Timed(RawEvent),
    AllDay,
    Undated,
}

/// Convert one VEVENT
fn convert_event(event: &IcalEvent) -> Converted {
    let mut raw = RawEvent {
        source: Some(ICS_SOURCE.to_string()),
        ..RawEvent::default()
    };
    let mut duration = None;

    for property in &event.properties {
        match property.name.as_str() {
            "SUMMARY" => {
                raw.title = property.value.as_deref().map(unescape);
            }
            "UID" => {
                raw.id.clone_from(&property.value);
            }
            "DTSTART" => {
                if is_date_only(property) {
                    log::debug!("Skipping all-day event {:?}", raw.title);
                    return Converted::AllDay;
                }
                raw.start_time.clone_from(&property.value);
            }
            "DTEND" => {
                raw.end_time.clone_from(&property.value);
            }
            "DURATION" => {
                duration = property.value.as_deref().and_then(parse_duration);
            }
            "DESCRIPTION" => {
                raw.description = property.value.as_deref().map(unescape);
            }
            _ => {}
        }
    }

    let Some(start) = raw.start_time.as_deref() else {
        return Converted::Undated;
    };
    if raw.end_time.is_none() {
        raw.end_time = duration
            .zip(crate::parse_timestamp(start))
            .map(|(length, start)| (start + length).format("%Y-%m-%dT%H:%M:%S").to_string());
    }
    Converted::Timed(raw)
}

/// `DTSTART;VALUE=DATE:20250714`, or a bare 8-digit date
fn is_date_only(property: &Property) -> bool {
    let date_param = property.params.as_ref().is_some_and(|params| {
        params.iter().any(|(name, values)| {
            name.eq_ignore_ascii_case("VALUE") && values.iter().any(|v| v.eq_ignore_ascii_case("DATE"))
        })
    });
    let date_value = property
        .value
        .as_deref()
        .is_some_and(|v| v.len() == 8 && v.bytes().all(|b| b.is_ascii_digit()));
    date_param || date_value
}

/// RFC 5545 duration: `[+-]P[nW][nD][T[nH][nM][nS]]`
fn parse_duration(value: &str) -> Option<Duration> {
    let (negative, rest) = match value.trim().as_bytes().first() {
        Some(b'-') => (true, &value.trim()[1..]),
        Some(b'+') => (false, &value.trim()[1..]),
        _ => (false, value.trim()),
    };
    let rest = rest.strip_prefix('P')?;

    let mut total = Duration::zero();
    let mut number = String::new();
    let mut in_time = false;
    let mut any_part = false;
    for c in rest.chars() {
        match c {
            '0'..='9' => number.push(c),
            'T' if number.is_empty() && !in_time => in_time = true,
            unit => {
                let n: i64 = number.parse().ok()?;
                number.clear();
                total = total + match (unit, in_time) {
                    ('W', false) => Duration::weeks(n),
                    ('D', false) => Duration::days(n),
                    ('H', true) => Duration::hours(n),
                    ('M', true) => Duration::minutes(n),
                    ('S', true) => Duration::seconds(n),
                    _ => return None,
                };
                any_part = true;
            }
        }
    }

    (any_part && number.is_empty()).then_some(if negative { -total } else { total })
}

/// Undo RFC 5545 text escaping (`\n`, `\,`, `\;`, `\\`)
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n' | 'N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_nonexistent_ics() {
        let result = parse_ics("nonexistent.ics");
        assert!(matches!(result, Err(CalendarError::ReadError { .. })));
    }

    /// Helper to create a temp ICS file with given content
    fn create_temp_ics(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_parse_simple_event() {
        let ics_content = r"BEGIN:VCALENDAR
VERSION:2.0
PRODID:-//Test//Test//EN
BEGIN:VEVENT
SUMMARY:Team Meeting
DTSTART:20250714T100000Z
DTEND:20250714T110000Z
DESCRIPTION:Weekly sync meeting\nBring the roadmap
UID:test-123@example.com
END:VEVENT
END:VCALENDAR";

        let temp_file = create_temp_ics(ics_content);
        let events = parse_ics(temp_file.path()).unwrap();
        assert_eq!(events.len(), 1);

        let event = &events[0];
        assert_eq!(event.title.as_deref(), Some("Team Meeting"));
        assert_eq!(event.start_time.as_deref(), Some("20250714T100000Z"));
        assert_eq!(event.end_time.as_deref(), Some("20250714T110000Z"));
        assert_eq!(event.id.as_deref(), Some("test-123@example.com"));
        assert_eq!(event.source.as_deref(), Some(ICS_SOURCE));
        assert_eq!(
            event.description.as_deref(),
            Some("Weekly sync meeting\nBring the roadmap")
        );
    }

    #[test]
    fn test_event_without_start_is_dropped() {
        let ics_content = r"BEGIN:VCALENDAR
VERSION:2.0
BEGIN:VEVENT
SUMMARY:Floating
END:VEVENT
BEGIN:VEVENT
SUMMARY:Anchored
DTSTART:20250715T090000
DTEND:20250715T093000
END:VEVENT
END:VCALENDAR";

        let temp_file = create_temp_ics(ics_content);
        let events = parse_ics(temp_file.path()).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title.as_deref(), Some("Anchored"));
    }

    #[test]
    fn test_imported_events_normalize() {
        let ics_content = r"BEGIN:VCALENDAR
VERSION:2.0
BEGIN:VEVENT
SUMMARY:Standup
DTSTART:20250716T090000Z
DTEND:20250716T091500Z
END:VEVENT
END:VCALENDAR";

        let temp_file = create_temp_ics(ics_content);
        let events = parse_ics(temp_file.path()).unwrap();
        let week = crate::Week::from_bounds("2025-07-14", "2025-07-20").unwrap();
        let normalized = crate::normalize_events(events, &week);
        assert_eq!(normalized.events.len(), 1);
        assert_eq!(normalized.events[0].source.kind, crate::SourceKind::Ics);
        assert_eq!(normalized.events[0].start_clock(), "09:00");
    }

    #[test]
    fn test_description_lines_become_notes() {
        let ics_content = r"BEGIN:VCALENDAR
VERSION:2.0
BEGIN:VEVENT
SUMMARY:Review
DTSTART:20250717T140000
DTEND:20250717T150000
DESCRIPTION:Bring the roadmap\n\nCheck the budget
END:VEVENT
END:VCALENDAR";

        let temp_file = create_temp_ics(ics_content);
        let week = crate::Week::from_bounds("2025-07-14", "2025-07-20").unwrap();
        let normalized = crate::normalize_events(parse_ics(temp_file.path()).unwrap(), &week);
        assert_eq!(
            normalized.events[0].notes,
            vec!["Bring the roadmap".to_string(), "Check the budget".to_string()]
        );
    }

    #[test]
    fn test_duration_sets_end_without_dtend() {
        let ics_content = r"BEGIN:VCALENDAR
VERSION:2.0
BEGIN:VEVENT
SUMMARY:Workshop
DTSTART:20250715T090000
DURATION:PT1H30M
END:VEVENT
BEGIN:VEVENT
SUMMARY:Explicit end wins
DTSTART:20250715T130000
DTEND:20250715T140000
DURATION:PT3H
END:VEVENT
END:VCALENDAR";

        let temp_file = create_temp_ics(ics_content);
        let events = parse_ics(temp_file.path()).unwrap();
        assert_eq!(events[0].end_time.as_deref(), Some("2025-07-15T10:30:00"));
        assert_eq!(events[1].end_time.as_deref(), Some("20250715T140000"));

        let week = crate::Week::from_bounds("2025-07-14", "2025-07-20").unwrap();
        let normalized = crate::normalize_events(events, &week);
        assert_eq!(normalized.events[0].duration_minutes(), 90);
        assert_eq!(normalized.events[1].duration_minutes(), 60);
    }

    #[test]
    fn test_all_day_events_are_counted_not_imported() {
        let ics_content = r"BEGIN:VCALENDAR
VERSION:2.0
BEGIN:VEVENT
SUMMARY:Holiday
DTSTART;VALUE=DATE:20250714
DTEND;VALUE=DATE:20250715
END:VEVENT
BEGIN:VEVENT
SUMMARY:Conference
DTSTART:20250716
DTEND:20250718
END:VEVENT
BEGIN:VEVENT
SUMMARY:Floating
END:VEVENT
BEGIN:VEVENT
SUMMARY:Standup
DTSTART:20250716T090000
DTEND:20250716T091500
END:VEVENT
END:VCALENDAR";

        let temp_file = create_temp_ics(ics_content);
        let import = import_ics(temp_file.path()).unwrap();
        assert_eq!(import.events.len(), 1);
        assert_eq!(import.events[0].title.as_deref(), Some("Standup"));
        assert_eq!(import.skipped_all_day, 2);
        assert_eq!(import.skipped_undated, 1);
        assert_eq!(import.skipped(), 3);
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("PT1H30M"), Some(Duration::minutes(90)));
        assert_eq!(parse_duration("PT45M"), Some(Duration::minutes(45)));
        assert_eq!(parse_duration("P1D"), Some(Duration::days(1)));
        assert_eq!(parse_duration("P1W"), Some(Duration::weeks(1)));
        assert_eq!(parse_duration("P1DT2H"), Some(Duration::hours(26)));
        assert_eq!(parse_duration("-PT15M"), Some(Duration::minutes(-15)));
        assert_eq!(parse_duration("PT"), None);
        assert_eq!(parse_duration("P1H"), None);
        assert_eq!(parse_duration("PT5"), None);
        assert_eq!(parse_duration("1H"), None);
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r"a\, b\; c\\d"), r"a, b; c\d");
        assert_eq!(unescape(r"line\nnext"), "line\nnext");
        assert_eq!(unescape("trailing\\"), "trailing\\");
    }
}
