//! The export request envelope: `{events, weekStart, weekEnd}`

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CalendarError, Result};
use crate::normalize::{normalize_records, NormalizedWeek};
use crate::week::Week;

/// An export request as sent by the web backend.
///
/// `events` is kept as raw JSON so that a single malformed record is
/// counted and skipped by the normalizer instead of failing the whole
/// request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    /// Raw event records
    #[serde(default)]
    pub events: Vec<Value>,

    /// First day of the week (`YYYY-MM-DD` or ISO timestamp)
    #[serde(default)]
    pub week_start: Option<String>,

    /// Last day of the week, inclusive
    #[serde(default)]
    pub week_end: Option<String>,
}

impl ExportRequest {
    /// Decode a request from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidRequest`] if the top level is not an
    /// object or `events` is not an array.
    pub fn from_json(input: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(input)?;
        Self::from_value(value)
    }

    /// Decode a request from any reader (stdin for the CLI).
    ///
    /// # Errors
    ///
    /// Same as [`ExportRequest::from_json`], plus I/O failures.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let value: Value = serde_json::from_reader(reader)?;
        Self::from_value(value)
    }

    /// Read a request from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::ReadError`] if the file cannot be read and
    /// the decoding errors of [`ExportRequest::from_json`] otherwise.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| CalendarError::read_error(path, e))?;
        Self::from_json(&content)
    }

    /// Build a request from decoded events and week bounds.
    #[must_use]
    pub fn with_events<I, E>(events: I, week_start: &str, week_end: &str) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Serialize,
    {
        Self {
            events: events
                .into_iter()
                .filter_map(|e| serde_json::to_value(e).ok())
                .collect(),
            week_start: Some(week_start.to_string()),
            week_end: Some(week_end.to_string()),
        }
    }

    fn from_value(value: Value) -> Result<Self> {
        let Value::Object(ref map) = value else {
            return Err(CalendarError::InvalidRequest(
                "top level must be a JSON object".to_string(),
            ));
        };
        if let Some(events) = map.get("events") {
            if !events.is_array() && !events.is_null() {
                return Err(CalendarError::InvalidRequest(
                    "'events' must be an array".to_string(),
                ));
            }
        }
        // Week bounds with the wrong type are a shape error, not "missing".
        for key in ["weekStart", "weekEnd"] {
            if let Some(bound) = map.get(key) {
                if !bound.is_string() && !bound.is_null() {
                    return Err(CalendarError::InvalidRequest(format!(
                        "'{key}' must be a date string"
                    )));
                }
            }
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Resolve the week bounds.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidWeek`] when a bound is missing,
    /// unparseable, or the range is not exactly seven days.
    pub fn week(&self) -> Result<Week> {
        Week::from_bounds(
            self.week_start.as_deref().unwrap_or_default(),
            self.week_end.as_deref().unwrap_or_default(),
        )
    }

    /// Resolve the week and normalize the events against it.
    ///
    /// # Errors
    ///
    /// Only the week bounds can fail; bad events are counted in the report.
    pub fn normalize(&self) -> Result<NormalizedWeek> {
        let week = self.week()?;
        Ok(normalize_records(&self.events, &week))
    }
}
