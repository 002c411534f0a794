//! Drawing surface that records PDF content-stream operations
//!
//! Callers draw in top-left coordinates; the canvas flips y once when the
//! operation is recorded.

use lopdf::content::{Content, Operation};
use lopdf::{Object, StringFormat};
use weekpack_calendar::SourceKind;

use crate::error::Result;
use crate::font::{encode_win_ansi, ResolvedFont, TextMeasure};
use crate::geometry::{BoundingBox, Size};

/// Resource name of the page font
pub const FONT_RESOURCE: &str = "F1";

/// RGB colour, components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
}

impl Rgb {
    /// Black
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    /// White
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);
    /// Secondary text
    pub const MUTED: Self = Self::new(0.4, 0.4, 0.4);
    /// Grid rules
    pub const RULE: Self = Self::new(0.78, 0.78, 0.78);
    /// Top-of-hour row background
    pub const HOUR_SHADE: Self = Self::new(0.94, 0.94, 0.94);
    /// Header cell background
    pub const HEADER_FILL: Self = Self::new(0.88, 0.88, 0.88);
    /// Navigation button background
    pub const BUTTON_FILL: Self = Self::new(0.96, 0.96, 0.96);
    /// Navigation button border
    pub const BUTTON_BORDER: Self = Self::new(0.7, 0.7, 0.7);

    /// Create from float components
    #[inline]
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create from 8-bit components
    #[must_use]
    pub fn from_bytes(r: u8, g: u8, b: u8) -> Self {
        Self::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
        )
    }

    fn operands(self) -> Vec<Object> {
        vec![
            Object::Real(self.r),
            Object::Real(self.g),
            Object::Real(self.b),
        ]
    }
}

/// How a block outline is stroked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderStyle {
    /// Continuous line
    Solid,
    /// Dashed line
    Dashed,
}

/// Fill and outline of an event block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockStyle {
    /// Background
    pub fill: Rgb,
    /// Outline colour
    pub border: Rgb,
    /// Outline pattern
    pub border_style: BorderStyle,
}

/// Block style for an event source
#[must_use]
pub fn source_style(kind: SourceKind) -> BlockStyle {
    let (fill, border, border_style) = match kind {
        SourceKind::Google => (Rgb::WHITE, Rgb::from_bytes(34, 139, 34), BorderStyle::Dashed),
        SourceKind::Outlook => (
            Rgb::new(0.87, 0.93, 0.98),
            Rgb::new(0.0, 0.47, 0.83),
            BorderStyle::Solid,
        ),
        SourceKind::Apple => (
            Rgb::new(0.95, 0.95, 0.95),
            Rgb::new(0.45, 0.45, 0.45),
            BorderStyle::Solid,
        ),
        SourceKind::Manual => (
            Rgb::new(0.7, 0.9, 1.0),
            Rgb::new(0.0, 0.5, 0.8),
            BorderStyle::Solid,
        ),
        SourceKind::Ics => (
            Rgb::new(1.0, 0.95, 0.85),
            Rgb::new(0.85, 0.55, 0.1),
            BorderStyle::Solid,
        ),
        SourceKind::Other => (Rgb::WHITE, Rgb::from_bytes(100, 149, 237), BorderStyle::Solid),
    };
    BlockStyle {
        fill,
        border,
        border_style,
    }
}

/// Number operand
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn real(value: f64) -> Object {
    Object::Real(value as f32)
}

/// Records drawing operations for one page
pub struct PageCanvas<'f> {
    size: Size,
    font: &'f ResolvedFont,
    ops: Vec<Operation>,
}

impl<'f> PageCanvas<'f> {
    /// Empty canvas of the given page size
    #[must_use]
    pub fn new(size: Size, font: &'f ResolvedFont) -> Self {
        Self {
            size,
            font,
            ops: Vec::new(),
        }
    }

    /// Page size
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Font used for text (also the measurer for layout)
    #[must_use]
    pub const fn font(&self) -> &'f ResolvedFont {
        self.font
    }

    /// Operations recorded so far
    #[must_use]
    pub fn operation_count(&self) -> usize {
        self.ops.len()
    }

    fn push(&mut self, operator: &str, operands: Vec<Object>) {
        self.ops.push(Operation::new(operator, operands));
    }

    fn rect_operands(&self, rect: BoundingBox) -> Vec<Object> {
        let [x, y, r, t] = rect.to_pdf_rect(self.size.height);
        vec![real(x), real(y), real(r - x), real(t - y)]
    }

    /// Fill a rectangle
    pub fn fill_rect(&mut self, rect: BoundingBox, color: Rgb) {
        let operands = self.rect_operands(rect);
        self.push("q", vec![]);
        self.push("rg", color.operands());
        self.push("re", operands);
        self.push("f", vec![]);
        self.push("Q", vec![]);
    }

    /// Outline a rectangle
    pub fn stroke_rect(&mut self, rect: BoundingBox, color: Rgb, width: f64) {
        self.outline(rect, color, width, None);
    }

    /// Outline a rectangle with a dash pattern `(on, off)`
    pub fn dashed_rect(&mut self, rect: BoundingBox, color: Rgb, width: f64, dash: (f64, f64)) {
        self.outline(rect, color, width, Some(dash));
    }

    fn outline(&mut self, rect: BoundingBox, color: Rgb, width: f64, dash: Option<(f64, f64)>) {
        let operands = self.rect_operands(rect);
        self.push("q", vec![]);
        self.push("RG", color.operands());
        self.push("w", vec![real(width)]);
        if let Some((on, off)) = dash {
            self.push("d", vec![Object::Array(vec![real(on), real(off)]), Object::Integer(0)]);
        }
        self.push("re", operands);
        self.push("S", vec![]);
        self.push("Q", vec![]);
    }

    /// Fill and outline an event block in its source style
    pub fn block(&mut self, rect: BoundingBox, style: BlockStyle) {
        self.fill_rect(rect, style.fill);
        match style.border_style {
            BorderStyle::Solid => self.stroke_rect(rect, style.border, 1.0),
            BorderStyle::Dashed => self.dashed_rect(rect, style.border, 1.0, (4.0, 2.0)),
        }
    }

    /// Straight line
    pub fn line(&mut self, from: (f64, f64), to: (f64, f64), color: Rgb, width: f64) {
        let h = self.size.height;
        self.push("q", vec![]);
        self.push("RG", color.operands());
        self.push("w", vec![real(width)]);
        self.push("m", vec![real(from.0), real(h - from.1)]);
        self.push("l", vec![real(to.0), real(h - to.1)]);
        self.push("S", vec![]);
        self.push("Q", vec![]);
    }

    /// Single line of text with its baseline at `baseline`
    pub fn text(&mut self, x: f64, baseline: f64, size: f64, color: Rgb, text: &str) {
        if text.is_empty() {
            return;
        }
        let y = self.size.height - baseline;
        self.push("BT", vec![]);
        self.push("rg", color.operands());
        self.push("Tf", vec![FONT_RESOURCE.into(), real(size)]);
        self.push("Td", vec![real(x), real(y)]);
        self.push(
            "Tj",
            vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
        );
        self.push("ET", vec![]);
    }

    /// Text ending at `right`
    pub fn text_right(&mut self, right: f64, baseline: f64, size: f64, color: Rgb, text: &str) {
        let width = self.font.text_width(text, size);
        self.text(right - width, baseline, size, color, text);
    }

    /// Text centred in a rectangle
    pub fn text_centered(&mut self, rect: BoundingBox, size: f64, color: Rgb, text: &str) {
        let width = self.font.text_width(text, size);
        let x = rect.l + (rect.width() - width) / 2.0;
        let baseline = rect.t.min(rect.b) + (rect.height() + size * 0.7) / 2.0;
        self.text(x.max(rect.l), baseline, size, color, text);
    }

    /// Encode the recorded operations as a content stream
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::Pdf`](crate::PlannerError::Pdf) if lopdf
    /// cannot encode an operation.
    pub fn finish(self) -> Result<Vec<u8>> {
        Ok(Content {
            operations: self.ops,
        }
        .encode()?)
    }
}

/// Baseline for text of `size` centred in a band starting at `top`
#[inline]
#[must_use]
pub fn band_baseline(top: f64, lead: f64, size: f64) -> f64 {
    top + (lead + size * 0.7) / 2.0
}
