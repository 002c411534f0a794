#![allow(
    clippy::needless_pass_by_value,    // clap requires owned strings
    clippy::unnecessary_wraps,         // consistent Result return for CLI handlers
    clippy::must_use_candidate,        // CLI functions don't need must_use
)]

//! Weekpack CLI - bidirectional weekly planner export
//!
//! Subprocess entry point for the web backend: reads an export request and
//! prints the path of the written package.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use lopdf::{Document, Object, ObjectId};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use weekpack_calendar::{import_ics, normalize_events, parse_date, ExportRequest, Week};
use weekpack_cli::config::{Config, CONFIG_FILE_NAME, DEFAULT_TEMPLATE};
use weekpack_cli::sample_json;
use weekpack_core::{export, export_week, link_existing_package, ExportOutcome};

/// Verbosity level for output control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Verbosity {
    /// Suppress all output except errors
    Quiet,
    /// Normal output (default)
    Normal,
    /// Verbose output with extra details
    Verbose,
}

impl Verbosity {
    /// Create from CLI flags
    const fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }

    /// Check if output should be shown (not quiet)
    const fn should_show_output(self) -> bool {
        !matches!(self, Self::Quiet)
    }

    /// Check if verbose output is requested
    const fn is_verbose(self) -> bool {
        matches!(self, Self::Verbose)
    }

    /// Default `env_logger` filter for this level
    const fn log_filter(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "info",
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "weekpack",
    about = "Export bidirectional weekly planner PDFs",
    long_about = "Export one week of calendar events as a single PDF: a weekly overview\n\
                  followed by seven daily pages, linked to each other in both directions.",
    version
)]
struct Args {
    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Show detailed processing information
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Export a planner package from an export request
    #[command(long_about = "Export a planner package from an export request.\n\
                      \n\
                      The request is JSON: {\"events\": [...], \"weekStart\": \"YYYY-MM-DD\", \"weekEnd\": \"YYYY-MM-DD\"}.\n\
                      It is read from --input, or from stdin when --input is absent or '-'.\n\
                      Only the path of the written file is printed on stdout.")]
    Export {
        /// Request file, or '-' for stdin
        #[arg(short, long, value_name = "FILE", conflicts_with = "ics")]
        input: Option<PathBuf>,

        /// Import events from an iCalendar file instead of a JSON request
        #[arg(long, value_name = "FILE", requires = "week_start")]
        ics: Option<PathBuf>,

        /// First day of the week when importing from --ics
        #[arg(long, value_name = "DATE", requires = "ics")]
        week_start: Option<String>,

        /// Output file or directory (default: bidirectional_weekly_planner_<weekStart>.pdf)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Fail instead of replacing an existing output file
        #[arg(long)]
        no_clobber: bool,
    },

    /// Link a weekly PDF and seven daily PDFs into one package
    Link {
        /// Weekly overview PDF (its first page is used)
        #[arg(value_name = "WEEKLY")]
        weekly: PathBuf,

        /// Daily PDFs, first day of the week to last
        #[arg(value_name = "DAY", num_args = 7, required = true)]
        days: Vec<PathBuf>,

        /// Output file
        #[arg(short, long, value_name = "OUTPUT")]
        output: PathBuf,
    },

    /// Print a sample export request
    Sample,

    /// Show the pages and internal links of a PDF
    Inspect {
        /// PDF file to inspect
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration files
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Create a new .weekpack.toml configuration file
    Init {
        /// Create in user home directory (~/.weekpack.toml) instead of current directory
        #[arg(long)]
        global: bool,

        /// Overwrite existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Display the current effective configuration
    Show {
        /// Output as JSON instead of TOML
        #[arg(long)]
        json: bool,
    },

    /// Show the path(s) to configuration file(s)
    Path {
        /// Show all config file paths (user and project)
        #[arg(long)]
        all: bool,
    },
}

fn main() {
    let args = Args::parse();
    let verbosity = Verbosity::from_flags(args.quiet, args.verbose);

    let env = env_logger::Env::default().default_filter_or(verbosity.log_filter());
    env_logger::Builder::from_env(env)
        .target(env_logger::Target::Stderr)
        .init();

    if let Err(e) = run(args.command, verbosity) {
        eprintln!("{} {e:#}", "Error:".red().bold());
        std::process::exit(1);
    }
}

fn run(command: Commands, verbosity: Verbosity) -> Result<()> {
    match command {
        Commands::Export {
            input,
            ics,
            week_start,
            output,
            no_clobber,
        } => {
            let config = Config::load();
            export_command(input, ics, week_start, output, no_clobber, &config, verbosity)
        }
        Commands::Link {
            weekly,
            days,
            output,
        } => link_command(&weekly, &days, &output, verbosity),
        Commands::Sample => sample_command(),
        Commands::Inspect { input, json } => inspect_command(&input, json),
        Commands::Config { action } => config_command(action, verbosity),
        Commands::Completions { shell } => completion_command(shell),
    }
}

fn export_command(
    input: Option<PathBuf>,
    ics: Option<PathBuf>,
    week_start: Option<String>,
    output: Option<PathBuf>,
    no_clobber: bool,
    config: &Config,
    verbosity: Verbosity,
) -> Result<()> {
    let options = config.export_options(output, no_clobber);

    let outcome = if let Some(ics) = ics {
        let start = week_start
            .as_deref()
            .and_then(parse_date)
            .with_context(|| {
                format!("--week-start is not a date: {}", week_start.unwrap_or_default())
            })?;
        let import = import_ics(&ics)
            .with_context(|| format!("Failed to import {}", ics.display()))?;
        if import.skipped() > 0 && verbosity.should_show_output() {
            eprintln!(
                "{} {} calendar entries not imported ({} all-day, {} without a start)",
                "Warning:".yellow().bold(),
                import.skipped(),
                import.skipped_all_day,
                import.skipped_undated
            );
        }
        let normalized = normalize_events(import.events, &Week::starting(start));
        export_week(&normalized, &options)?
    } else {
        let request = read_request(input.as_deref())?;
        export(&request, &options)?
    };

    report_outcome(&outcome, verbosity);
    println!("{}", outcome.path.display());
    Ok(())
}

/// Read a request from a file, or from stdin for `None` and `-`
fn read_request(input: Option<&Path>) -> Result<ExportRequest> {
    match input {
        Some(path) if path != Path::new("-") => ExportRequest::from_path(path)
            .with_context(|| format!("Failed to read request from {}", path.display())),
        _ => ExportRequest::from_reader(io::stdin().lock()).context("Failed to read request from stdin"),
    }
}

fn report_outcome(outcome: &ExportOutcome, verbosity: Verbosity) {
    let report = &outcome.report;
    if verbosity.is_verbose() {
        eprintln!(
            "{} {} pages, {} links, font {}",
            "Exported:".green().bold(),
            outcome.pages,
            outcome.links,
            outcome.font
        );
        eprintln!("{} {report}", "Events:".bright_black());
    } else if report.dropped() > 0 && verbosity.should_show_output() {
        eprintln!(
            "{} {} of {} events not included ({report})",
            "Warning:".yellow().bold(),
            report.dropped(),
            report.received
        );
    }
}

fn link_command(weekly: &Path, days: &[PathBuf], output: &Path, verbosity: Verbosity) -> Result<()> {
    let linked = link_existing_package(weekly, days, output)
        .with_context(|| format!("Failed to link package into {}", output.display()))?;

    if verbosity.is_verbose() {
        eprintln!(
            "{} {} pages, {} links",
            "Linked:".green().bold(),
            linked.pages,
            linked.links
        );
    }
    println!("{}", linked.path.display());
    Ok(())
}

fn sample_command() -> Result<()> {
    println!("{}", sample_json()?);
    Ok(())
}

/// Internal links of one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct PageLinks {
    /// 1-based page number
    page: u32,
    /// 1-based page numbers the page links to, in annotation order
    targets: Vec<u32>,
}

/// Page count and links of a PDF
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct PackageInfo {
    file: String,
    pages: usize,
    links: usize,
    per_page: Vec<PageLinks>,
}

fn inspect_command(input: &Path, json_output: bool) -> Result<()> {
    let doc = Document::load(input).with_context(|| format!("Failed to open PDF: {}", input.display()))?;
    let info = inspect_document(&doc, input);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{}", info.file.bold());
    println!("  {} {}", "Pages:".bright_black(), info.pages);
    println!("  {} {}", "Links:".bright_black(), info.links);
    for page in &info.per_page {
        let targets = page
            .targets
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "  {} {} -> [{}]",
            "Page".bright_black(),
            page.page,
            targets
        );
    }
    Ok(())
}

fn inspect_document(doc: &Document, path: &Path) -> PackageInfo {
    let pages = doc.get_pages();
    let numbers: HashMap<ObjectId, u32> = pages.iter().map(|(n, id)| (*id, *n)).collect();

    let per_page: Vec<PageLinks> = pages
        .iter()
        .map(|(number, id)| PageLinks {
            page: *number,
            targets: link_targets(doc, *id)
                .into_iter()
                .filter_map(|target| numbers.get(&target).copied())
                .collect(),
        })
        .collect();

    PackageInfo {
        file: path.display().to_string(),
        pages: pages.len(),
        links: per_page.iter().map(|p| p.targets.len()).sum(),
        per_page,
    }
}

/// Destination pages of the `/Link` annotations on a page
fn link_targets(doc: &Document, page: ObjectId) -> Vec<ObjectId> {
    let Ok(dict) = doc.get_dictionary(page) else {
        return Vec::new();
    };
    let annots = match dict.get(b"Annots").and_then(|o| doc.dereference(o)) {
        Ok((_, Object::Array(items))) => items.clone(),
        _ => return Vec::new(),
    };

    annots
        .iter()
        .filter_map(|annot| doc.dereference(annot).ok())
        .filter_map(|(_, annot)| annot.as_dict().ok())
        .filter(|annot| matches!(annot.get(b"Subtype").and_then(|s| s.as_name()), Ok(b"Link")))
        .filter_map(|annot| {
            let dest = annot.get(b"Dest").or_else(|_| {
                annot
                    .get(b"A")
                    .and_then(|a| doc.dereference(a))
                    .and_then(|(_, a)| a.as_dict())
                    .and_then(|a| a.get(b"D"))
            });
            dest.ok()?.as_array().ok()?.first()?.as_reference().ok()
        })
        .collect()
}

fn config_command(action: ConfigAction, verbosity: Verbosity) -> Result<()> {
    match action {
        ConfigAction::Init { global, force } => config_init(global, force, verbosity),
        ConfigAction::Show { json } => config_show(json),
        ConfigAction::Path { all } => config_path(all),
    }
}

/// Create a new configuration file with every option commented out
fn config_init(global: bool, force: bool, verbosity: Verbosity) -> Result<()> {
    let config_path = if global {
        Config::user_config_path().context("Could not determine home directory")?
    } else {
        Config::project_config_path()
    };

    if config_path.exists() && !force {
        anyhow::bail!(
            "Configuration file already exists: {} (use --force to overwrite)",
            config_path.display()
        );
    }

    fs::write(&config_path, DEFAULT_TEMPLATE)
        .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

    if verbosity.should_show_output() {
        println!(
            "{} Created configuration file: {}",
            "Success:".green().bold(),
            config_path.display()
        );
    }

    Ok(())
}

/// Display the current effective configuration
fn config_show(json_output: bool) -> Result<()> {
    let merged = Config::load();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&merged)?);
    } else {
        println!("{}", toml::to_string_pretty(&merged)?);
    }

    Ok(())
}

fn config_path(all: bool) -> Result<()> {
    let home_config = Config::user_config_path();
    let project_config = Config::project_config_path();

    if all {
        println!("{}", "Configuration file paths:".bold());
        println!();

        if let Some(ref home) = home_config {
            let status = if home.exists() {
                "exists".green()
            } else {
                "not found".yellow()
            };
            println!("  {} {} ({})", "User:".bright_black(), home.display(), status);
        }

        let status = if project_config.exists() {
            "exists".green()
        } else {
            "not found".yellow()
        };
        println!(
            "  {} {} ({})",
            "Project:".bright_black(),
            project_config.display(),
            status
        );
    } else {
        // Effective path: project if present, else user, else where init would write
        let effective = match home_config {
            Some(home) if !project_config.exists() && home.exists() => home,
            _ => PathBuf::from(CONFIG_FILE_NAME),
        };
        println!("{}", effective.display());
    }

    Ok(())
}

fn completion_command(shell: Shell) -> Result<()> {
    let mut cmd = Args::command();
    let bin_name = cmd.get_name().to_string();

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}
