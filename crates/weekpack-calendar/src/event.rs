//! Event records: the raw wire form and the canonical in-memory form

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Title used when a record carries none.
pub const UNTITLED: &str = "Untitled";

/// Source label used when a record carries none.
pub const DEFAULT_SOURCE: &str = "MANUAL";

/// Notes and action items arrive either as a list or as a single string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextItems {
    /// A single free-form string, treated as one item
    One(String),
    /// An ordered list of items
    Many(Vec<String>),
}

impl TextItems {
    /// Flatten into trimmed, non-empty items, preserving order
    #[must_use]
    pub fn into_items(self) -> Vec<String> {
        let items = match self {
            Self::One(s) => vec![s],
            Self::Many(v) => v,
        };
        items
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// An event record as sent by the web application.
///
/// Every field is optional at this stage; [`Event::from_raw`] decides what
/// is required. Aliases cover the field names used by older exporters
/// (`eventNotes`, `actions`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    /// Stable identifier from the source calendar
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Event title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Start timestamp, any format accepted by [`parse_timestamp`](crate::parse_timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,

    /// End timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,

    /// Calendar provider label, e.g. `GOOGLE CALENDAR`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Free-form notes
    #[serde(default, alias = "eventNotes", skip_serializing_if = "Option::is_none")]
    pub notes: Option<TextItems>,

    /// Follow-up items
    #[serde(default, alias = "actions", skip_serializing_if = "Option::is_none")]
    pub action_items: Option<TextItems>,

    /// Longer description; its lines are shown as notes when `notes` is empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RawEvent {
    /// Decode one record from a JSON value.
    ///
    /// Returns `None` when the value is not an object or a field has the
    /// wrong type; the normalizer counts that as a skipped record.
    #[must_use]
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        Self::deserialize(value).ok()
    }
}

/// Calendar provider, classified from the free-form source label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Google Calendar
    Google,
    /// Microsoft Outlook
    Outlook,
    /// Apple Calendar
    Apple,
    /// Entered by hand in the planner
    #[default]
    Manual,
    /// Imported from an `.ics` file
    Ics,
    /// Anything else
    Other,
}

impl SourceKind {
    /// Classify a source label (case-insensitive)
    #[must_use]
    pub fn classify(label: &str) -> Self {
        match label.trim().to_uppercase().as_str() {
            "GOOGLE CALENDAR" | "GOOGLE" => Self::Google,
            "OUTLOOK" | "OUTLOOK CALENDAR" => Self::Outlook,
            "APPLE CALENDAR" | "APPLE" | "ICLOUD" => Self::Apple,
            "MANUAL" | "" => Self::Manual,
            "ICS" | "ICAL" | "ICALENDAR" => Self::Ics,
            _ => Self::Other,
        }
    }
}

impl std::fmt::Display for SourceKind {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Google => "google",
            Self::Outlook => "outlook",
            Self::Apple => "apple",
            Self::Manual => "manual",
            Self::Ics => "ics",
            Self::Other => "other",
        };
        write!(f, "{s}")
    }
}

/// Where an event came from: the label as shown, plus its classification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventSource {
    /// Label as received, upper-cased for display
    pub label: String,
    /// Provider class (drives block colour)
    pub kind: SourceKind,
}

impl EventSource {
    /// Build from a raw label
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let label = if label.trim().is_empty() {
            DEFAULT_SOURCE.to_string()
        } else {
            label.trim().to_uppercase()
        };
        Self {
            kind: SourceKind::classify(&label),
            label,
        }
    }
}

impl Default for EventSource {
    fn default() -> Self {
        Self::from_label(DEFAULT_SOURCE)
    }
}

/// Canonical event. `start < end` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Identifier (synthesised as `event-<n>` when absent)
    pub id: String,
    /// Display title
    pub title: String,
    /// Wall-clock start
    pub start: NaiveDateTime,
    /// Wall-clock end
    pub end: NaiveDateTime,
    /// Provider
    pub source: EventSource,
    /// Notes, in input order
    pub notes: Vec<String>,
    /// Action items, in input order
    pub action_items: Vec<String>,
}

/// Why a raw record could not become an [`Event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// Missing or unparseable start/end timestamp
    Unparseable,
    /// End is not after start
    InvalidRange,
}

impl Event {
    /// Convert a raw record. `position` is used to synthesise an id.
    ///
    /// # Errors
    ///
    /// Returns a [`Rejection`] for records that must be skipped. These are
    /// data-quality conditions, never fatal to an export.
    pub fn from_raw(raw: RawEvent, position: usize) -> std::result::Result<Self, Rejection> {
        let start = raw
            .start_time
            .as_deref()
            .and_then(crate::parse_timestamp)
            .ok_or(Rejection::Unparseable)?;
        let end = raw
            .end_time
            .as_deref()
            .and_then(crate::parse_timestamp)
            .ok_or(Rejection::Unparseable)?;
        if end <= start {
            return Err(Rejection::InvalidRange);
        }

        let title = raw
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| UNTITLED.to_string());

        let mut notes = raw.notes.map(TextItems::into_items).unwrap_or_default();
        if notes.is_empty() {
            if let Some(description) = raw.description {
                notes = TextItems::Many(description.lines().map(str::to_string).collect()).into_items();
            }
        }

        Ok(Self {
            id: raw
                .id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| format!("event-{position}")),
            title,
            start,
            end,
            source: EventSource::from_label(raw.source.as_deref().unwrap_or_default()),
            notes,
            action_items: raw
                .action_items
                .map(TextItems::into_items)
                .unwrap_or_default(),
        })
    }

    /// Calendar date the event belongs to (its start date)
    #[inline]
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }

    /// Duration in whole minutes (always positive)
    #[inline]
    #[must_use]
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Start as a 24-hour `HH:MM` clock string
    #[must_use]
    pub fn start_clock(&self) -> String {
        format!("{:02}:{:02}", self.start.hour(), self.start.minute())
    }

    /// End as a 24-hour `HH:MM` clock string
    #[must_use]
    pub fn end_clock(&self) -> String {
        format!("{:02}:{:02}", self.end.hour(), self.end.minute())
    }

    /// Whether the event carries notes or action items
    #[inline]
    #[must_use]
    pub fn has_details(&self) -> bool {
        !self.notes.is_empty() || !self.action_items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(start: &str, end: &str) -> RawEvent {
        RawEvent {
            title: Some("Coffee with Nora".to_string()),
            start_time: Some(start.to_string()),
            end_time: Some(end.to_string()),
            source: Some("google calendar".to_string()),
            ..RawEvent::default()
        }
    }

    #[test]
    fn test_from_raw_basic() {
        let event = Event::from_raw(raw("2025-07-14T08:00:00Z", "2025-07-14T09:00:00Z"), 0).unwrap();
        assert_eq!(event.title, "Coffee with Nora");
        assert_eq!(event.id, "event-0");
        assert_eq!(event.duration_minutes(), 60);
        assert_eq!(event.start_clock(), "08:00");
        assert_eq!(event.end_clock(), "09:00");
        assert_eq!(event.source.label, "GOOGLE CALENDAR");
        assert_eq!(event.source.kind, SourceKind::Google);
        assert!(!event.has_details());
    }

    #[test]
    fn test_description_fills_empty_notes() {
        let described = RawEvent {
            description: Some("Agenda\n\n  Budget  ".to_string()),
            ..raw("2025-07-14T08:00:00", "2025-07-14T09:00:00")
        };
        let event = Event::from_raw(described.clone(), 0).unwrap();
        assert_eq!(event.notes, vec!["Agenda".to_string(), "Budget".to_string()]);
        assert!(event.has_details());

        let with_notes = RawEvent {
            notes: Some(TextItems::One("Own note".to_string())),
            ..described
        };
        let event = Event::from_raw(with_notes, 0).unwrap();
        assert_eq!(event.notes, vec!["Own note".to_string()]);
    }

    #[test]
    fn test_from_raw_rejections() {
        assert_eq!(
            Event::from_raw(raw("not-a-date", "2025-07-14T09:00:00Z"), 0),
            Err(Rejection::Unparseable)
        );
        assert_eq!(
            Event::from_raw(raw("2025-07-14T09:00:00Z", "2025-07-14T09:00:00Z"), 0),
            Err(Rejection::InvalidRange)
        );
        let mut missing_end = raw("2025-07-14T09:00:00Z", "");
        missing_end.end_time = None;
        assert_eq!(Event::from_raw(missing_end, 0), Err(Rejection::Unparseable));
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let mut r = raw("2025-07-14T08:00:00Z", "2025-07-14T08:30:00Z");
        r.title = Some("   ".to_string());
        r.source = None;
        let event = Event::from_raw(r, 7).unwrap();
        assert_eq!(event.title, UNTITLED);
        assert_eq!(event.source.label, DEFAULT_SOURCE);
        assert_eq!(event.source.kind, SourceKind::Manual);
        assert_eq!(event.id, "event-7");
    }

    #[test]
    fn test_raw_event_aliases_and_single_string_items() {
        let value = json!({
            "title": "Call with Blake",
            "startTime": "2025-07-14T10:00:00Z",
            "endTime": "2025-07-14T10:50:00Z",
            "eventNotes": "Received the receipt",
            "actions": ["Client follow-up", "", "Schedule next session"]
        });
        let raw = RawEvent::from_value(&value).unwrap();
        let event = Event::from_raw(raw, 0).unwrap();
        assert_eq!(event.notes, vec!["Received the receipt".to_string()]);
        assert_eq!(
            event.action_items,
            vec![
                "Client follow-up".to_string(),
                "Schedule next session".to_string()
            ]
        );
        assert!(event.has_details());
    }

    #[test]
    fn test_raw_event_wrong_shape() {
        assert!(RawEvent::from_value(&json!("just a string")).is_none());
        assert!(RawEvent::from_value(&json!({"startTime": 42})).is_none());
    }

    #[test]
    fn test_source_classification() {
        assert_eq!(SourceKind::classify("OUTLOOK"), SourceKind::Outlook);
        assert_eq!(SourceKind::classify("Apple Calendar"), SourceKind::Apple);
        assert_eq!(SourceKind::classify("ics"), SourceKind::Ics);
        assert_eq!(SourceKind::classify("SimplePractice"), SourceKind::Other);
        assert_eq!(SourceKind::Google.to_string(), "google");
    }
}
