//! Error types for event loading and week handling

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for calendar operations
pub type Result<T> = std::result::Result<T, CalendarError>;

/// Error type for calendar input operations
///
/// Only shape problems of the request as a whole end up here. Individual
/// events that fail to parse are counted in a
/// [`NormalizeReport`](crate::NormalizeReport) instead.
#[derive(Error, Debug)]
pub enum CalendarError {
    /// Failed to read an input file from disk
    #[error("Failed to read calendar file {path}: {source}")]
    ReadError {
        /// Path to the file that failed to read
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Calendar file has invalid format or structure
    #[error("Invalid calendar format in {path}: {message}")]
    InvalidFormat {
        /// Path to the file with invalid format
        path: PathBuf,
        /// Description of the format error
        message: String,
    },

    /// The export request itself is malformed (not an object, bad JSON)
    #[error("Invalid export request: {0}")]
    InvalidRequest(String),

    /// Week bounds are missing, unparseable or not a 7-day span
    #[error("Invalid week range: {0}")]
    InvalidWeek(String),

    /// JSON decoding error for the request envelope
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CalendarError {
    /// Create a read error
    #[inline]
    #[must_use = "returns CalendarError for file read failures"]
    pub fn read_error<P: AsRef<Path>>(path: P, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create an invalid format error
    #[inline]
    #[must_use = "returns CalendarError for invalid format"]
    pub fn invalid_format<P: AsRef<Path>>(path: P, message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    /// Create an invalid week error
    #[inline]
    #[must_use = "returns CalendarError for a bad week range"]
    pub fn invalid_week(message: impl Into<String>) -> Self {
        Self::InvalidWeek(message.into())
    }
}
