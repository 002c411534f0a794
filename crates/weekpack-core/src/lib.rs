//! # weekpack-core - Bidirectional Weekly Planner Packages
//!
//! Turns one week of calendar events into a single PDF: a landscape weekly
//! overview followed by seven portrait daily pages, with internal links in
//! both directions between them.
//!
//! ## Quick Start
//!
//! ```no_run
//! use weekpack_core::{export, ExportOptions, ExportRequest};
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
//! let outcome = export(&request, &ExportOptions::to_path("planner.pdf"))?;
//! assert_eq!(outcome.pages, 8);
//! assert_eq!(outcome.links, 26);
//! # Ok::<(), weekpack_core::PlannerError>(())
//! ```
//!
//! ## Pipeline
//!
//! | Stage | Module | Output |
//! |-------|--------|--------|
//! | Event Normalizer | [`weekpack_calendar::normalize`] | [`NormalizedWeek`] |
//! | Layout Calculator | [`layout`] | slot indices, block rectangles |
//! | Page Renderer | [`render`] | one [`RenderedPage`] per page |
//! | Link Wiring | [`links`] | a verified [`LinkGraph`] |
//! | Document Assembler | [`assemble`] | the PDF, written atomically |
//!
//! [`export`] runs all five. [`link_existing_package`] wires the same
//! navigation into eight PDFs rendered elsewhere.
//!
//! ## Page Order
//!
//! | Page | Content | Size |
//! |------|---------|------|
//! | 0 | Weekly overview | US Letter landscape |
//! | 1..=7 | Daily pages, first day of the week to last | US Letter portrait |
//!
//! ## Coordinates
//!
//! Layout works in points with the origin at the top-left of the page;
//! conversion to PDF space happens once, when content and link rectangles
//! are written.
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T>`](error::Result). Individual
//! events that cannot be used never fail an export; they are counted in the
//! [`NormalizeReport`]. See [`PlannerError`] for the categories that do.

pub mod assemble;
pub mod error;
pub mod export;
pub mod font;
pub mod geometry;
pub mod layout;
pub mod links;
pub mod package;
pub mod render;
pub mod text;

// Re-exports for convenience
pub use assemble::{assemble, write_atomic, write_new_atomic};
pub use error::{PlannerError, Result};
pub use export::{
    default_file_name, export, export_week, render_to_bytes, ExportOptions, ExportOutcome,
};
pub use font::{FontConfig, ResolvedFont, TextMeasure};
pub use geometry::{BoundingBox, CoordOrigin, Size};
pub use layout::{slot_index, DailyGeometry, DayStats, WeeklyGeometry};
pub use links::{wire_links, LinkEdge, LinkGraph, NavRegions, PageId};
pub use package::{link_existing_package, LinkedPackage};
pub use render::{render_daily, render_package, render_weekly, RenderedPage};

pub use weekpack_calendar::{Event, ExportRequest, NormalizeReport, NormalizedWeek, Week};
