//! # weekpack-calendar
//!
//! Event input for the weekpack planner: the request envelope, lenient
//! timestamp parsing, the 7-day week window and the Event Normalizer.
//!
//! ## Quick Start
//!
//! ```
//! use weekpack_calendar::ExportRequest;
//!
//! let request = ExportRequest::from_json(r#"{
//!     "events": [{
//!         "title": "Coffee with Nora",
//!         "startTime": "2025-07-14T08:00:00Z",
//!         "endTime": "2025-07-14T09:00:00Z",
//!         "source": "GOOGLE CALENDAR"
//!     }],
//!     "weekStart": "2025-07-14",
//!     "weekEnd": "2025-07-20"
//! }"#)?;
//!
//! let normalized = request.normalize()?;
//! assert_eq!(normalized.events.len(), 1);
//! assert_eq!(normalized.report.received, 1);
//! # Ok::<(), weekpack_calendar::CalendarError>(())
//! ```
//!
//! ## Accepted Timestamps
//!
//! | Shape | Example |
//! |-------|---------|
//! | ISO-8601 with `Z` | `2025-07-14T08:00:00Z` |
//! | ISO-8601 with offset | `2025-07-14T08:00:00+02:00` |
//! | Fractional seconds | `2025-07-14T08:00:00.000Z` |
//! | Naive ISO | `2025-07-14T08:00:00`, `2025-07-14T08:00` |
//! | Plain | `2025-07-14 08:00:00` |
//! | iCalendar basic | `20250714T080000Z` |
//! | Date only | `2025-07-14` (midnight) |
//!
//! The wall-clock time is kept as written; offsets are not converted.
//!
//! ## Error Handling
//!
//! Only problems with the request as a whole are errors ([`CalendarError`]).
//! Individual events that cannot be used are counted in the
//! [`NormalizeReport`] and skipped:
//!
//! | Condition | Outcome |
//! |-----------|---------|
//! | Record is not an object, or a field has the wrong type | `skipped_unparseable` |
//! | Missing or unparseable `startTime` / `endTime` | `skipped_unparseable` |
//! | `endTime` not after `startTime` | `skipped_invalid_range` |
//! | Start date outside the week | `outside_week` |
//! | Missing `weekStart`/`weekEnd`, span not 7 days | [`CalendarError::InvalidWeek`] |
//! | Top level not an object, `events` not an array | [`CalendarError::InvalidRequest`] |

pub mod error;
pub mod event;
pub mod ics;
pub mod normalize;
pub mod request;
pub mod timestamp;
pub mod week;

pub use error::{CalendarError, Result};
pub use event::{
    Event, EventSource, RawEvent, Rejection, SourceKind, TextItems, DEFAULT_SOURCE, UNTITLED,
};
pub use ics::{import_ics, parse_ics, IcsImport, ICS_SOURCE};
pub use normalize::{normalize_events, normalize_records, NormalizeReport, NormalizedWeek};
pub use request::ExportRequest;
pub use timestamp::{parse_date, parse_timestamp};
pub use week::{Week, DAYS_PER_WEEK};
