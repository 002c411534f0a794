//! End-to-end export tests
//!
//! Each test runs the whole pipeline into a temporary directory and reads
//! the written package back with lopdf.

use lopdf::{Document, Object, ObjectId};
use tempfile::TempDir;
use weekpack_core::{export, ExportOptions, ExportRequest, PlannerError};

const COFFEE_WEEK: &str = r#"{
    "events": [{
        "title": "Coffee with Nora",
        "startTime": "2025-07-14T08:00:00Z",
        "endTime": "2025-07-14T09:00:00Z",
        "source": "GOOGLE CALENDAR"
    }],
    "weekStart": "2025-07-14",
    "weekEnd": "2025-07-20"
}"#;

fn pages(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().into_values().collect()
}

/// `(target page index, rect)` for each link on a page
fn links(doc: &Document, page: ObjectId) -> Vec<(usize, Vec<f64>)> {
    let order = pages(doc);
    let annots = match doc.get_dictionary(page).unwrap().get(b"Annots") {
        Ok(Object::Array(items)) => items.clone(),
        _ => return Vec::new(),
    };
    annots
        .iter()
        .map(|annot| {
            let dict = doc
                .get_dictionary(annot.as_reference().unwrap())
                .unwrap();
            assert_eq!(dict.get(b"Subtype").unwrap().as_name().unwrap(), b"Link");
            let dest = dict.get(b"Dest").unwrap().as_array().unwrap();
            let target = dest[0].as_reference().unwrap();
            let rect = dict
                .get(b"Rect")
                .unwrap()
                .as_array()
                .unwrap()
                .iter()
                .map(|o| match o {
                    Object::Integer(i) => *i as f64,
                    Object::Real(r) => f64::from(*r),
                    other => panic!("unexpected rect value {other:?}"),
                })
                .collect();
            (order.iter().position(|id| *id == target).unwrap(), rect)
        })
        .collect()
}

/// Text shown on a page, decoded from its content stream
fn page_text(doc: &Document, page: ObjectId) -> String {
    let content = doc.get_and_decode_page_content(page).unwrap();
    content
        .operations
        .iter()
        .filter(|op| op.operator == "Tj")
        .filter_map(|op| op.operands.first())
        .filter_map(|o| o.as_str().ok())
        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
        .collect::<Vec<_>>()
        .join("\n")
}

fn export_json(json: &str, dir: &TempDir) -> (weekpack_core::ExportOutcome, Document) {
    let request = ExportRequest::from_json(json).unwrap();
    let outcome = export(&request, &ExportOptions::to_path(dir.path())).unwrap();
    let doc = Document::load(&outcome.path).unwrap();
    (outcome, doc)
}

// ============================================================================
// Package structure
// ============================================================================

#[test]
fn test_package_has_eight_pages_in_order() {
    let dir = TempDir::new().unwrap();
    let (outcome, doc) = export_json(COFFEE_WEEK, &dir);

    assert_eq!(
        outcome.path.file_name().unwrap(),
        "bidirectional_weekly_planner_2025-07-14.pdf"
    );
    let ids = pages(&doc);
    assert_eq!(ids.len(), 8);

    assert!(page_text(&doc, ids[0]).contains("WEEKLY PLANNER"));
    let days = [
        "Monday, July 14, 2025",
        "Tuesday, July 15, 2025",
        "Wednesday, July 16, 2025",
        "Thursday, July 17, 2025",
        "Friday, July 18, 2025",
        "Saturday, July 19, 2025",
        "Sunday, July 20, 2025",
    ];
    for (i, day) in days.iter().enumerate() {
        assert!(page_text(&doc, ids[i + 1]).contains(day), "page {} is {day}", i + 1);
    }
}

#[test]
fn test_package_has_26_bidirectional_links() {
    let dir = TempDir::new().unwrap();
    let (outcome, doc) = export_json(COFFEE_WEEK, &dir);
    assert_eq!(outcome.links, 26);

    let ids = pages(&doc);
    let mut edges = Vec::new();
    for (from, id) in ids.iter().enumerate() {
        for (to, _) in links(&doc, *id) {
            edges.push((from, to));
        }
    }
    assert_eq!(edges.len(), 26);

    let mut weekly_targets: Vec<usize> = edges.iter().filter(|e| e.0 == 0).map(|e| e.1).collect();
    weekly_targets.sort_unstable();
    assert_eq!(weekly_targets, (1..=7).collect::<Vec<_>>());

    for &(from, to) in &edges {
        assert!(edges.contains(&(to, from)), "{from} -> {to} has no way back");
    }
}

#[test]
fn test_daily_link_rectangles_in_pdf_space() {
    let dir = TempDir::new().unwrap();
    let (_, doc) = export_json(COFFEE_WEEK, &dir);
    let ids = pages(&doc);

    let tuesday = links(&doc, ids[2]);
    let back = tuesday.iter().find(|(to, _)| *to == 0).unwrap();
    let expected = [50.0, 667.0, 150.0, 692.0];
    for (a, e) in back.1.iter().zip(expected) {
        assert!((a - e).abs() < 1e-3, "weekly button rect {:?}", back.1);
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_coffee_only_on_monday() {
    let dir = TempDir::new().unwrap();
    let (outcome, doc) = export_json(COFFEE_WEEK, &dir);
    assert_eq!(outcome.report.parsed, 1);

    let ids = pages(&doc);
    assert!(page_text(&doc, ids[0]).contains("08:00 Coffee with Nora"));
    assert!(page_text(&doc, ids[1]).contains("Coffee with Nora"));
    assert!(page_text(&doc, ids[1]).contains("1 appointment"));
    for id in &ids[2..] {
        assert!(!page_text(&doc, *id).contains("Coffee with Nora"));
    }
}

#[test]
fn test_event_outside_week_is_excluded() {
    let json = r#"{
        "events": [
            {"title": "In range", "startTime": "2025-07-20T21:00:00", "endTime": "2025-07-20T22:00:00"},
            {"title": "Next week", "startTime": "2025-07-21T08:00:00", "endTime": "2025-07-21T09:00:00"}
        ],
        "weekStart": "2025-07-14",
        "weekEnd": "2025-07-20"
    }"#;
    let dir = TempDir::new().unwrap();
    let (outcome, doc) = export_json(json, &dir);
    assert_eq!(outcome.report.outside_week, 1);

    let all: String = pages(&doc).iter().map(|id| page_text(&doc, *id)).collect();
    assert!(all.contains("In range"));
    assert!(!all.contains("Next week"));
}

#[test]
fn test_malformed_start_time_is_skipped() {
    let json = r#"{
        "events": [
            {"title": "Broken", "startTime": "not-a-date", "endTime": "2025-07-14T09:00:00"},
            {"title": "Fine", "startTime": "2025-07-15T09:00:00", "endTime": "2025-07-15T10:00:00"}
        ],
        "weekStart": "2025-07-14",
        "weekEnd": "2025-07-20"
    }"#;
    let dir = TempDir::new().unwrap();
    let (outcome, doc) = export_json(json, &dir);
    assert_eq!(outcome.report.skipped_unparseable, 1);
    assert_eq!(outcome.report.parsed, 1);
    assert_eq!(pages(&doc).len(), 8);
}

#[test]
fn test_notes_and_action_items_rendered() {
    let json = r#"{
        "events": [{
            "title": "Call with Blake",
            "startTime": "2025-07-16T10:00:00",
            "endTime": "2025-07-16T10:50:00",
            "source": "SimplePractice",
            "notes": "Received the receipt",
            "actionItems": ["Client follow-up", "Send invoice"]
        }],
        "weekStart": "2025-07-14",
        "weekEnd": "2025-07-20"
    }"#;
    let dir = TempDir::new().unwrap();
    let (_, doc) = export_json(json, &dir);
    let wednesday = page_text(&doc, pages(&doc)[3]);
    assert!(wednesday.contains("Notes"));
    assert!(wednesday.contains("Action Items"));
    assert!(wednesday.contains("- Send invoice"));
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_missing_week_bounds_write_nothing() {
    let dir = TempDir::new().unwrap();
    let request = ExportRequest::from_json(r#"{"events": []}"#).unwrap();
    let err = export(&request, &ExportOptions::to_path(dir.path())).unwrap_err();
    assert!(err.is_input_error());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_unwritable_destination_leaves_no_file() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("no-such-dir").join("planner.pdf");
    let request = ExportRequest::from_json(COFFEE_WEEK).unwrap();
    let err = export(&request, &ExportOptions::to_path(&target)).unwrap_err();
    assert!(matches!(err, PlannerError::Write { .. }));
    assert!(!target.exists());
}
