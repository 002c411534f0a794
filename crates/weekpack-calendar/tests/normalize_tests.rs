//! Integration tests for request decoding, normalization and ICS import

use chrono::NaiveDate;
use std::fs;
use tempfile::TempDir;
use weekpack_calendar::{
    normalize_records, parse_ics, CalendarError, ExportRequest, SourceKind, Week,
};

fn july_14() -> Week {
    Week::starting(NaiveDate::from_ymd_opt(2025, 7, 14).unwrap())
}

// ============================================================================
// Timestamp shapes
// ============================================================================

#[test]
fn test_every_timestamp_shape_lands_on_wall_clock() {
    let records: Vec<serde_json::Value> = [
        "2025-07-14T08:00:00Z",
        "2025-07-14T08:00:00.000Z",
        "2025-07-14T08:00:00-04:00",
        "2025-07-14T08:00",
        "2025-07-14 08:00:00",
        "20250714T080000Z",
    ]
    .iter()
    .map(|start| {
        serde_json::json!({
            "title": start,
            "startTime": start,
            "endTime": "2025-07-14T09:30:00"
        })
    })
    .collect();

    let week = normalize_records(&records, &july_14());
    assert_eq!(week.report.parsed, records.len());
    for event in &week.events {
        assert_eq!(event.start_clock(), "08:00", "{}", event.title);
    }
}

#[test]
fn test_bare_date_is_midnight() {
    let records = vec![serde_json::json!({
        "title": "All day",
        "startTime": "2025-07-16",
        "endTime": "2025-07-17"
    })];
    let week = normalize_records(&records, &july_14());
    assert_eq!(week.events.len(), 1);
    assert_eq!(week.events[0].start_clock(), "00:00");
    assert_eq!(week.week.day_index(week.events[0].date()), Some(2));
}

// ============================================================================
// Filtering and counting
// ============================================================================

#[test]
fn test_last_day_is_inclusive() {
    let records = vec![
        serde_json::json!({"title": "Late Sunday", "startTime": "2025-07-20T23:30:00", "endTime": "2025-07-20T23:59:00"}),
        serde_json::json!({"title": "Monday after", "startTime": "2025-07-21T00:00:00", "endTime": "2025-07-21T01:00:00"}),
        serde_json::json!({"title": "Sunday before", "startTime": "2025-07-13T22:00:00", "endTime": "2025-07-13T23:00:00"}),
    ];
    let week = normalize_records(&records, &july_14());
    assert_eq!(week.events.len(), 1);
    assert_eq!(week.events[0].title, "Late Sunday");
    assert_eq!(week.report.outside_week, 2);
}

#[test]
fn test_bad_records_are_counted_not_fatal() {
    let records = vec![
        serde_json::json!("not an object"),
        serde_json::json!({"title": "No start", "endTime": "2025-07-14T09:00:00"}),
        serde_json::json!({"title": "Backwards", "startTime": "2025-07-14T10:00:00", "endTime": "2025-07-14T09:00:00"}),
        serde_json::json!({"title": "Zero length", "startTime": "2025-07-14T10:00:00", "endTime": "2025-07-14T10:00:00"}),
        serde_json::json!({"startTime": "2025-07-14T11:00:00", "endTime": "2025-07-14T12:00:00"}),
    ];
    let week = normalize_records(&records, &july_14());
    assert_eq!(week.report.received, 5);
    assert_eq!(week.report.skipped_unparseable, 2);
    assert_eq!(week.report.skipped_invalid_range, 2);
    assert_eq!(week.events.len(), 1);
    assert_eq!(week.events[0].title, "Untitled");
    assert_eq!(week.events[0].source.kind, SourceKind::Manual);
}

#[test]
fn test_notes_accept_string_or_list() {
    let records = vec![serde_json::json!({
        "title": "Session",
        "startTime": "2025-07-15T10:00:00",
        "endTime": "2025-07-15T11:00:00",
        "eventNotes": "Single note",
        "actionItems": ["One", "Two"]
    })];
    let week = normalize_records(&records, &july_14());
    let event = &week.events[0];
    assert_eq!(event.notes, vec!["Single note".to_string()]);
    assert_eq!(event.action_items.len(), 2);
    assert!(event.has_details());
}

// ============================================================================
// Request envelope
// ============================================================================

#[test]
fn test_request_requires_seven_day_week() {
    let request = ExportRequest::from_json(
        r#"{"events": [], "weekStart": "2025-07-14", "weekEnd": "2025-07-21"}"#,
    )
    .unwrap();
    assert!(matches!(request.normalize(), Err(CalendarError::InvalidWeek(_))));
}

#[test]
fn test_request_rejects_non_array_events() {
    let err = ExportRequest::from_json(
        r#"{"events": {}, "weekStart": "2025-07-14", "weekEnd": "2025-07-20"}"#,
    )
    .unwrap_err();
    assert!(matches!(err, CalendarError::InvalidRequest(_)));
}

#[test]
fn test_request_from_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("week.json");
    fs::write(
        &path,
        r#"{"events": [], "weekStart": "2025-07-14", "weekEnd": "2025-07-20"}"#,
    )
    .unwrap();
    let week = ExportRequest::from_path(&path).unwrap().normalize().unwrap();
    assert_eq!(week.week, july_14());
    assert!(week.events.is_empty());
}

// ============================================================================
// iCalendar import
// ============================================================================

#[test]
fn test_ics_import_feeds_normalizer() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("calendar.ics");
    fs::write(
        &path,
        "BEGIN:VCALENDAR\r\n\
         VERSION:2.0\r\n\
         PRODID:-//weekpack//tests//EN\r\n\
         BEGIN:VEVENT\r\n\
         UID:evt-1\r\n\
         SUMMARY:Coffee with Nora\r\n\
         DTSTART:20250714T080000Z\r\n\
         DTEND:20250714T090000Z\r\n\
         END:VEVENT\r\n\
         END:VCALENDAR\r\n",
    )
    .unwrap();

    let raws = parse_ics(&path).unwrap();
    assert_eq!(raws.len(), 1);
    assert_eq!(raws[0].title.as_deref(), Some("Coffee with Nora"));

    let records: Vec<serde_json::Value> = raws
        .iter()
        .map(|raw| serde_json::to_value(raw).unwrap())
        .collect();
    let week = normalize_records(&records, &july_14());
    assert_eq!(week.events.len(), 1);
    assert_eq!(week.events[0].start_clock(), "08:00");
    assert_eq!(week.events[0].source.kind, SourceKind::Ics);
}

#[test]
fn test_ics_missing_file() {
    let err = parse_ics("/nonexistent/calendar.ics").unwrap_err();
    assert!(matches!(err, CalendarError::ReadError { .. }));
}
