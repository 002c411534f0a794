//! `.weekpack.toml` configuration
//!
//! Two files are read: `~/.weekpack.toml` (user) and `./.weekpack.toml`
//! (project). Project values override user values, and command-line flags
//! override both.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use weekpack_core::{ExportOptions, FontConfig};

/// File name used for both user and project configuration
pub const CONFIG_FILE_NAME: &str = ".weekpack.toml";

/// Template written by `weekpack config init`
pub const DEFAULT_TEMPLATE: &str = r#"# Weekpack Configuration File

# Fonts tried before the built-in Helvetica
[fonts]
# TrueType font used for all text
# primary_font_path = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"

# Tried when the primary font is missing or unreadable
# fallback_font_path = "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf"

# Defaults for the export command
[output]
# Directory for packages written under their default file name
# directory = "planners"

# Fail instead of replacing an existing package
# no_clobber = false
"#;

/// Effective configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Font selection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fonts: Option<FontsConfig>,

    /// Export defaults
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FontsConfig {
    /// Preferred TrueType font
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_font_path: Option<PathBuf>,

    /// Font tried when the primary one fails to load
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_font_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for the default file name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,

    /// Keep existing files and fail the export instead
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_clobber: Option<bool>,
}

impl Config {
    /// Parse a configuration string
    ///
    /// # Errors
    ///
    /// Returns the TOML parse error, which carries line and column.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse configuration")
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not valid TOML.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content).map_err(|e| {
            eprintln!(
                "{} Failed to parse config file: {}",
                "Error:".red().bold(),
                path.display()
            );
            eprintln!("{} {}", "Parse error:".yellow().bold(), e);
            eprintln!();
            eprintln!("{} Configuration file syntax:", "Help:".cyan().bold());
            eprintln!("  [fonts]");
            eprintln!("  primary_font_path = \"/path/to/font.ttf\"");
            eprintln!("  [output]");
            eprintln!("  no_clobber = false");
            anyhow::anyhow!("Failed to parse config file: {e}")
        })
    }

    /// `~/.weekpack.toml`, if a home directory is known
    #[must_use]
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
    }

    /// `./.weekpack.toml`
    #[must_use]
    pub fn project_config_path() -> PathBuf {
        PathBuf::from(CONFIG_FILE_NAME)
    }

    /// Find and load configuration files.
    /// Returns (`user_config`, `project_config`)
    #[must_use]
    pub fn discover_configs() -> (Option<Self>, Option<Self>) {
        let user = Self::user_config_path().and_then(|path| Self::load_optional(&path, "user"));
        let project = Self::load_optional(&Self::project_config_path(), "project");
        (user, project)
    }

    /// Discover and merge in one step
    #[must_use]
    pub fn load() -> Self {
        let (user, project) = Self::discover_configs();
        Self::merge(user, project)
    }

    fn load_optional(path: &Path, kind: &str) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        match Self::load_from_file(path) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!(
                    "{} Failed to load {kind} config from {}: {e}",
                    "Warning:".yellow().bold(),
                    path.display()
                );
                None
            }
        }
    }

    /// Merge configs with precedence project > user > defaults
    #[must_use]
    pub fn merge(user_config: Option<Self>, project_config: Option<Self>) -> Self {
        let mut merged = user_config.unwrap_or_default();

        if let Some(project) = project_config {
            if let Some(fonts) = project.fonts {
                let mut merged_fonts = merged.fonts.unwrap_or_default();
                if let Some(primary) = fonts.primary_font_path {
                    merged_fonts.primary_font_path = Some(primary);
                }
                if let Some(fallback) = fonts.fallback_font_path {
                    merged_fonts.fallback_font_path = Some(fallback);
                }
                merged.fonts = Some(merged_fonts);
            }

            if let Some(output) = project.output {
                let mut merged_output = merged.output.unwrap_or_default();
                if let Some(directory) = output.directory {
                    merged_output.directory = Some(directory);
                }
                if let Some(no_clobber) = output.no_clobber {
                    merged_output.no_clobber = Some(no_clobber);
                }
                merged.output = Some(merged_output);
            }
        }

        merged
    }

    /// Fonts to hand to the exporter
    #[must_use]
    pub fn font_config(&self) -> FontConfig {
        self.fonts.as_ref().map_or_else(FontConfig::default, |fonts| {
            FontConfig::new(
                fonts.primary_font_path.clone(),
                fonts.fallback_font_path.clone(),
            )
        })
    }

    /// Export options with command-line values applied on top.
    ///
    /// `no_clobber` on the command line can only turn replacement off.
    #[must_use]
    pub fn export_options(&self, output: Option<PathBuf>, no_clobber: bool) -> ExportOptions {
        let output_config = self.output.clone().unwrap_or_default();
        ExportOptions {
            output,
            output_dir: output_config.directory,
            no_clobber: no_clobber || output_config.no_clobber.unwrap_or(false),
            fonts: self.font_config(),
        }
    }
}
