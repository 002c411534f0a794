//! The export pipeline: request in, linked planner package on disk
//!
//! ```text
//! ExportRequest ─▶ normalize ─▶ render 8 pages ─▶ wire links ─▶ assemble ─▶ write (atomic)
//! ```
//!
//! Every step either succeeds completely or the export fails; the output
//! path only ever holds a complete package.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use weekpack_calendar::{ExportRequest, NormalizeReport, NormalizedWeek, Week};

use crate::assemble::{assemble, to_bytes, write_atomic, write_new_atomic};
use crate::error::Result;
use crate::font::{FontConfig, ResolvedFont};
use crate::links::wire_links;
use crate::render::{page_regions, render_package};

/// Prefix of generated file names
pub const FILE_PREFIX: &str = "bidirectional_weekly_planner_";

/// `bidirectional_weekly_planner_2025-07-14.pdf`
#[must_use]
pub fn default_file_name(week: &Week) -> String {
    format!("{FILE_PREFIX}{}.pdf", week.start().format("%Y-%m-%d"))
}

/// Where and how to write a package
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOptions {
    /// Output file, or a directory to place the default file name in
    pub output: Option<PathBuf>,
    /// Directory for the default file name when `output` is not set
    pub output_dir: Option<PathBuf>,
    /// Keep an existing file at the output path and fail instead
    pub no_clobber: bool,
    /// Fonts to try before the built-in Helvetica
    pub fonts: FontConfig,
}

impl ExportOptions {
    /// Options writing to `path`
    #[must_use]
    pub fn to_path<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            output: Some(path.into()),
            ..Self::default()
        }
    }

    /// Fail instead of replacing an existing output file
    #[must_use]
    pub const fn with_no_clobber(mut self, no_clobber: bool) -> Self {
        self.no_clobber = no_clobber;
        self
    }

    /// Use these fonts
    #[must_use]
    pub fn with_fonts(mut self, fonts: FontConfig) -> Self {
        self.fonts = fonts;
        self
    }

    /// Resolve the output path for a week.
    ///
    /// An explicit `output` that is an existing directory gets the default
    /// file name appended; otherwise it is used as is. Without `output`, the
    /// default name goes into `output_dir` or the current directory.
    #[must_use]
    pub fn output_path(&self, week: &Week) -> PathBuf {
        match (&self.output, &self.output_dir) {
            (Some(output), _) if output.is_dir() => output.join(default_file_name(week)),
            (Some(output), _) => output.clone(),
            (None, Some(dir)) => dir.join(default_file_name(week)),
            (None, None) => PathBuf::from(default_file_name(week)),
        }
    }
}

/// Result of a successful export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportOutcome {
    /// Written file
    pub path: PathBuf,
    /// Normalizer diagnostics
    pub report: NormalizeReport,
    /// Pages written
    pub pages: usize,
    /// Link annotations written
    pub links: usize,
    /// `/BaseFont` of the font used
    pub font: String,
}

/// Run the full pipeline for a request.
///
/// # Errors
///
/// Returns [`PlannerError::Calendar`](crate::PlannerError::Calendar) for a
/// bad request envelope or week range,
/// [`PlannerError::InvalidInput`](crate::PlannerError::InvalidInput) if the
/// output exists and `no_clobber` is set, and any rendering, wiring or
/// write error. An existing file is replaced otherwise. Nothing is written
/// unless every step succeeds.
///
/// # Examples
///
/// ```no_run
/// use weekpack_core::{export, ExportOptions, ExportRequest};
///
/// let request = ExportRequest::from_path("week.json")?;
/// let outcome = export(&request, &ExportOptions::to_path("planner.pdf"))?;
/// println!("{}", outcome.path.display());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn export(request: &ExportRequest, options: &ExportOptions) -> Result<ExportOutcome> {
    let normalized = request.normalize()?;
    export_week(&normalized, options)
}

/// Run the pipeline from rendering onward for an already-normalized week.
///
/// # Errors
///
/// See [`export`].
pub fn export_week(week: &NormalizedWeek, options: &ExportOptions) -> Result<ExportOutcome> {
    let path = options.output_path(&week.week);
    log::info!("{}", week.report);

    let font = options.fonts.resolve();
    let (mut doc, pages, links) = build(week, &font)?;
    if options.no_clobber {
        write_new_atomic(&mut doc, &path)?;
    } else {
        write_atomic(&mut doc, &path)?;
    }

    Ok(ExportOutcome {
        path,
        report: week.report,
        pages,
        links,
        font: font.base_font_name().to_string(),
    })
}

/// Render a package to PDF bytes without touching the filesystem.
///
/// # Errors
///
/// Any rendering, wiring or serialization error.
pub fn render_to_bytes(week: &NormalizedWeek, fonts: &FontConfig) -> Result<Vec<u8>> {
    let font = fonts.resolve();
    let (mut doc, _, _) = build(week, &font)?;
    to_bytes(&mut doc)
}

fn build(week: &NormalizedWeek, font: &ResolvedFont) -> Result<(lopdf::Document, usize, usize)> {
    let pages = render_package(week, font)?;
    let graph = wire_links(&page_regions(&pages))?;
    let title = format!("Weekly Planner {}", week.week);
    let doc = assemble(&pages, &graph, font, &title)?;
    Ok((doc, pages.len(), graph.len()))
}
