//! Sample week used by `weekpack sample`

use serde_json::json;
use weekpack_calendar::ExportRequest;

/// First day of the sample week
pub const SAMPLE_WEEK_START: &str = "2025-07-14";

/// Last day of the sample week
pub const SAMPLE_WEEK_END: &str = "2025-07-20";

/// A request covering the week of 2025-07-14 with three appointments.
#[must_use]
pub fn sample_request() -> ExportRequest {
    let events = [
        json!({
            "id": "evt_001",
            "title": "Coffee with Nora",
            "startTime": "2025-07-14T08:00:00Z",
            "endTime": "2025-07-14T09:00:00Z",
            "source": "GOOGLE CALENDAR",
            "notes": ["Fully's Revenue update and LMHC"],
            "actionItems": ["See if she's interested in the Commack Office?"]
        }),
        json!({
            "id": "evt_002",
            "title": "Call with Blake",
            "startTime": "2025-07-14T10:00:00Z",
            "endTime": "2025-07-14T10:50:00Z",
            "source": "GOOGLE CALENDAR",
            "notes": ["Received the receipt for the Pfizer"],
            "actionItems": ["Client follow-up", "Schedule next session"]
        }),
        json!({
            "id": "evt_003",
            "title": "Vivian Meador Appointment",
            "startTime": "2025-07-15T19:00:00Z",
            "endTime": "2025-07-15T20:00:00Z",
            "source": "SimplePractice",
            "notes": ["Review notes prior to our session"],
            "actionItems": ["Send the follow-up email"]
        }),
    ];
    ExportRequest::with_events(events, SAMPLE_WEEK_START, SAMPLE_WEEK_END)
}

/// The sample request as pretty-printed JSON
///
/// # Errors
///
/// Only if serialization fails, which it does not for this fixed value.
pub fn sample_json() -> serde_json::Result<String> {
    serde_json::to_string_pretty(&sample_request())
}
