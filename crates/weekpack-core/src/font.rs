//! Font resolution and text measurement
//!
//! A [`FontConfig`] is resolved once per export into a [`ResolvedFont`]:
//! the primary TrueType file if it loads, else the fallback, else the
//! built-in Helvetica. All text is written in WinAnsi encoding; characters
//! outside it are replaced with `?` so nothing silently disappears.

use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontVec};
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

/// First character code carried in the font's width table
pub const FIRST_CHAR: u8 = 32;

/// Last character code carried in the font's width table
pub const LAST_CHAR: u8 = 255;

/// Replacement for characters WinAnsi cannot represent
const SUBSTITUTE: u8 = b'?';

/// Base font used when no TrueType file loads
pub const BUILTIN_FONT_NAME: &str = "Helvetica";

/// Helvetica advance widths (1/1000 em) for WinAnsi codes 32..=255.
/// Zero marks codes with no glyph; the encoder never emits them.
const HELVETICA_WIDTHS: [u16; 224] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, 0,
    556, 0, 222, 556, 333, 1000, 556, 556, 333, 1000, 667, 333, 1000, 0, 611, 0,
    0, 222, 222, 333, 333, 350, 556, 1000, 333, 1000, 500, 333, 944, 0, 500, 667,
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

/// WinAnsi codes 0x80..=0x9F and the characters they stand for
const WIN_ANSI_HIGH: [(u8, char); 27] = [
    (0x80, '\u{20AC}'),
    (0x82, '\u{201A}'),
    (0x83, '\u{0192}'),
    (0x84, '\u{201E}'),
    (0x85, '\u{2026}'),
    (0x86, '\u{2020}'),
    (0x87, '\u{2021}'),
    (0x88, '\u{02C6}'),
    (0x89, '\u{2030}'),
    (0x8A, '\u{0160}'),
    (0x8B, '\u{2039}'),
    (0x8C, '\u{0152}'),
    (0x8E, '\u{017D}'),
    (0x91, '\u{2018}'),
    (0x92, '\u{2019}'),
    (0x93, '\u{201C}'),
    (0x94, '\u{201D}'),
    (0x95, '\u{2022}'),
    (0x96, '\u{2013}'),
    (0x97, '\u{2014}'),
    (0x98, '\u{02DC}'),
    (0x99, '\u{2122}'),
    (0x9A, '\u{0161}'),
    (0x9B, '\u{203A}'),
    (0x9C, '\u{0153}'),
    (0x9E, '\u{017E}'),
    (0x9F, '\u{0178}'),
];

/// WinAnsi code for a character, if it has one
fn win_ansi_code(c: char) -> Option<u8> {
    match u32::from(c) {
        0x20..=0x7E | 0xA0..=0xFF => u8::try_from(u32::from(c)).ok(),
        _ => WIN_ANSI_HIGH
            .iter()
            .find(|(_, ch)| *ch == c)
            .map(|(code, _)| *code),
    }
}

/// Character a WinAnsi code stands for
fn win_ansi_char(code: u8) -> Option<char> {
    match code {
        0x20..=0x7E | 0xA0..=0xFF => Some(char::from(code)),
        _ => WIN_ANSI_HIGH
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, ch)| *ch),
    }
}

/// Encode text for a WinAnsi font, substituting what cannot be shown.
///
/// Tabs and newlines become spaces; callers split lines beforehand.
#[must_use]
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\t' | '\n' | '\r' => b' ',
            _ => win_ansi_code(c).unwrap_or(SUBSTITUTE),
        })
        .collect()
}

/// Anything that can report the advance width of a string.
///
/// Layout only needs widths; keeping this a trait lets geometry tests run
/// against fixed metrics without loading a font.
pub trait TextMeasure {
    /// Width of `text` in points at font size `size`
    fn text_width(&self, text: &str, size: f64) -> f64;
}

/// Paths to TrueType fonts, resolved once per export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontConfig {
    /// Preferred font file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_font_path: Option<PathBuf>,

    /// Tried when the primary font is missing or unreadable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_font_path: Option<PathBuf>,
}

impl FontConfig {
    /// Create a config with both paths
    #[must_use]
    pub fn new(primary: Option<PathBuf>, fallback: Option<PathBuf>) -> Self {
        Self {
            primary_font_path: primary,
            fallback_font_path: fallback,
        }
    }

    /// Resolve to the first font that loads.
    ///
    /// Never fails: a configured path that cannot be loaded is logged and
    /// skipped, and the built-in Helvetica is the last resort.
    #[must_use]
    pub fn resolve(&self) -> ResolvedFont {
        let candidates = [&self.primary_font_path, &self.fallback_font_path];
        for path in candidates.into_iter().flatten() {
            match ResolvedFont::load(path) {
                Ok(font) => {
                    log::info!("Using font {} from {}", font.base_font_name(), path.display());
                    return font;
                }
                Err(e) => log::warn!("Skipping font {}: {e}", path.display()),
            }
        }
        log::debug!("Using built-in {BUILTIN_FONT_NAME}");
        ResolvedFont::Builtin
    }
}

/// A TrueType font to be embedded in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedFont {
    /// PostScript-safe base font name
    pub name: String,
    /// Raw font file
    pub data: Vec<u8>,
    /// Advance widths for codes `FIRST_CHAR..=LAST_CHAR` (1/1000 em)
    pub widths: Vec<u16>,
    /// Ascender (1/1000 em)
    pub ascent: i64,
    /// Descender (1/1000 em, negative)
    pub descent: i64,
}

/// The font used for every page of one export
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ResolvedFont {
    /// Standard Helvetica, not embedded
    #[default]
    Builtin,
    /// TrueType file, embedded
    Embedded(EmbeddedFont),
}

impl ResolvedFont {
    /// Load and measure a TrueType file.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::Read`] if the file cannot be read and
    /// [`PlannerError::Font`] if it is not a usable TrueType/OpenType font.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|e| PlannerError::read_error(path, e))?;
        Self::from_bytes(font_name_from_path(path), data)
    }

    /// Measure an in-memory TrueType font.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::Font`] if the bytes are not a usable font.
    pub fn from_bytes(name: String, data: Vec<u8>) -> Result<Self> {
        let font = FontVec::try_from_vec(data.clone())
            .map_err(|e| PlannerError::Font(format!("{name}: {e}")))?;
        let units_per_em = font.units_per_em().unwrap_or(1000.0);
        if units_per_em <= 0.0 {
            return Err(PlannerError::Font(format!("{name}: zero units per em")));
        }
        let scale = 1000.0 / units_per_em;

        let widths = (FIRST_CHAR..=LAST_CHAR)
            .map(|code| {
                win_ansi_char(code).map_or(0, |c| {
                    let advance = font.h_advance_unscaled(font.glyph_id(c)) * scale;
                    advance.round().clamp(0.0, f32::from(u16::MAX)) as u16
                })
            })
            .collect();

        Ok(Self::Embedded(EmbeddedFont {
            name,
            data,
            widths,
            ascent: (font.ascent_unscaled() * scale).round() as i64,
            descent: (font.descent_unscaled() * scale).round() as i64,
        }))
    }

    /// Name written as `/BaseFont`
    #[must_use]
    pub fn base_font_name(&self) -> &str {
        match self {
            Self::Builtin => BUILTIN_FONT_NAME,
            Self::Embedded(font) => &font.name,
        }
    }

    /// Whether the font file is embedded in the output
    #[inline]
    #[must_use]
    pub const fn is_embedded(&self) -> bool {
        matches!(self, Self::Embedded(_))
    }

    /// Advance width of one encoded byte (1/1000 em)
    #[must_use]
    pub fn code_width(&self, code: u8) -> u16 {
        if code < FIRST_CHAR {
            return 0;
        }
        let index = usize::from(code - FIRST_CHAR);
        match self {
            Self::Builtin => HELVETICA_WIDTHS[index],
            Self::Embedded(font) => font.widths.get(index).copied().unwrap_or(0),
        }
    }

    /// Full width table for `FIRST_CHAR..=LAST_CHAR`
    #[must_use]
    pub fn widths(&self) -> Vec<u16> {
        (FIRST_CHAR..=LAST_CHAR).map(|c| self.code_width(c)).collect()
    }
}

impl TextMeasure for ResolvedFont {
    fn text_width(&self, text: &str, size: f64) -> f64 {
        let units: u32 = encode_win_ansi(text)
            .into_iter()
            .map(|code| u32::from(self.code_width(code)))
            .sum();
        f64::from(units) * size / 1000.0
    }
}

/// Derive a `/BaseFont` name from a file path
fn font_name_from_path(path: &Path) -> String {
    let name: String = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    if name.is_empty() {
        "EmbeddedFont".to_string()
    } else {
        name
    }
}
