//! Command-line interface for weekpack planner exports
//!
//! This crate provides the `weekpack` command-line tool. It turns one week
//! of calendar events into a single PDF: a weekly overview followed by seven
//! daily pages, linked to each other in both directions.
//!
//! # Installation
//!
//! ```bash
//! # From source
//! cargo install --path crates/weekpack-cli
//!
//! # Or build the binary
//! cargo build --release -p weekpack-cli
//! ```
//!
//! # Quick Start
//!
//! ```bash
//! # Export the sample week
//! weekpack sample | weekpack export
//!
//! # Export a request file to a chosen path
//! weekpack export --input week.json -o planner.pdf
//!
//! # Export an iCalendar file for the week starting 2025-07-14
//! weekpack export --ics calendar.ics --week-start 2025-07-14
//!
//! # Check the links of a written package
//! weekpack inspect planner.pdf
//! ```
//!
//! # Commands
//!
//! ## `export` - Build a Package
//!
//! Reads an export request (`{events, weekStart, weekEnd}`) from `--input`
//! or stdin and writes the package. Only the resolved output path is
//! printed on stdout; diagnostics go to stderr. Exit code is 0 on success
//! and 1 on any error. An existing package at the output path is replaced
//! unless `--no-clobber` is given.
//!
//! ```bash
//! cat week.json | weekpack export -o planners/ --no-clobber
//! ```
//!
//! ## `link` - Wire Existing PDFs
//!
//! Merges a weekly PDF and seven daily PDFs into one linked package:
//!
//! ```bash
//! weekpack link weekly.pdf mon.pdf tue.pdf wed.pdf thu.pdf fri.pdf sat.pdf sun.pdf -o week.pdf
//! ```
//!
//! ## `sample` and `inspect`
//!
//! `sample` prints a ready-to-use request. `inspect` prints the page count
//! and the internal links of every page of a PDF.
//!
//! ## `config` - Configuration Files
//!
//! ```bash
//! weekpack config init      # create ./.weekpack.toml
//! weekpack config show      # effective configuration
//! weekpack config path --all
//! ```
//!
//! # Configuration
//!
//! | File | Scope |
//! |------|-------|
//! | `~/.weekpack.toml` | user |
//! | `./.weekpack.toml` | project, overrides user |
//!
//! ```toml
//! [fonts]
//! primary_font_path = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"
//!
//! [output]
//! directory = "planners"
//! no_clobber = false
//! ```
//!
//! # Logging
//!
//! Log output goes to stderr. The default level is `warn`; `-v` raises it to
//! `info` and `-q` lowers it to `error`. `RUST_LOG` overrides both.

pub mod config;
pub mod sample;

pub use config::Config;
pub use sample::{sample_json, sample_request};
