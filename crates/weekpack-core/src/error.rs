//! Error types for planner package export.
//!
//! Errors fall into the categories the export pipeline distinguishes:
//!
//! | Category | Variants | Effect |
//! |----------|----------|--------|
//! | Input shape | [`PlannerError::InvalidInput`], [`PlannerError::Calendar`] | abort before anything is written |
//! | I/O | [`PlannerError::Read`], [`PlannerError::Write`], [`PlannerError::Io`] | abort, cause surfaced |
//! | Wiring integrity | [`PlannerError::Wiring`] | abort, no document |
//! | Output | [`PlannerError::Pdf`], [`PlannerError::Font`] | abort |
//!
//! Data-quality problems with individual events are never errors; they are
//! counted in a [`NormalizeReport`](weekpack_calendar::NormalizeReport).

use std::path::{Path, PathBuf};
use thiserror::Error;
use weekpack_calendar::CalendarError;

/// Error type for building and writing planner packages.
///
/// # Examples
///
/// ```
/// use weekpack_core::{wire_links, NavRegions, PlannerError};
///
/// // Seven pages instead of eight: wiring refuses to run.
/// let pages = vec![NavRegions::default(); 7];
/// match wire_links(&pages) {
///     Err(PlannerError::Wiring(msg)) => assert!(msg.contains("8 pages")),
///     other => panic!("expected wiring error, got {other:?}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum PlannerError {
    /// Malformed request, wrong page count or bad argument
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Request envelope or week range rejected by the calendar layer
    #[error(transparent)]
    Calendar(#[from] CalendarError),

    /// Failed to read a required input file
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Path that failed
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Failed to write the output document
    #[error("Failed to write {path}: {source}")]
    Write {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Other I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Link graph does not match the fixed page adjacency
    #[error("Link wiring error: {0}")]
    Wiring(String),

    /// PDF construction or parsing failed
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// Font file could not be loaded
    #[error("Font error: {0}")]
    Font(String),
}

impl PlannerError {
    /// Create an invalid input error
    #[inline]
    #[must_use = "returns PlannerError for invalid input"]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create a wiring error
    #[inline]
    #[must_use = "returns PlannerError for a broken link graph"]
    pub fn wiring(message: impl Into<String>) -> Self {
        Self::Wiring(message.into())
    }

    /// Create a read error
    #[inline]
    #[must_use = "returns PlannerError for file read failures"]
    pub fn read_error<P: AsRef<Path>>(path: P, source: std::io::Error) -> Self {
        Self::Read {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a write error
    #[inline]
    #[must_use = "returns PlannerError for file write failures"]
    pub fn write_error<P: AsRef<Path>>(path: P, source: std::io::Error) -> Self {
        Self::Write {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Whether the error is an input-shape problem (nothing was written)
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::Calendar(_))
    }
}

/// Type alias for [`Result<T, PlannerError>`].
pub type Result<T> = std::result::Result<T, PlannerError>;
