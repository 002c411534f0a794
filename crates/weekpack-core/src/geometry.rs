//! Page geometry primitives
//!
//! All layout is computed with a top-left origin (y grows downwards), which
//! is how every rectangle in the planner is specified. Conversion to the PDF
//! bottom-left system happens once, when content and annotations are written.

use serde::{Deserialize, Serialize};

/// Coordinate origin for bounding boxes
///
/// Defaults to `TopLeft` (layout coordinate system).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoordOrigin {
    /// Origin at bottom-left (PDF coordinate system)
    #[serde(rename = "BOTTOMLEFT")]
    BottomLeft,
    /// Origin at top-left (layout coordinate system)
    #[default]
    #[serde(rename = "TOPLEFT")]
    TopLeft,
}

impl std::fmt::Display for CoordOrigin {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::BottomLeft => "bottom_left",
            Self::TopLeft => "top_left",
        };
        write!(f, "{s}")
    }
}

/// US Letter page width in PDF points (8.5 inches × 72 dpi = 612 points).
pub const US_LETTER_WIDTH: f64 = 612.0;

/// US Letter page height in PDF points (11 inches × 72 dpi = 792 points).
pub const US_LETTER_HEIGHT: f64 = 792.0;

/// Page size in points
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Width in points
    pub width: f64,
    /// Height in points
    pub height: f64,
}

impl Size {
    /// US Letter portrait (612 × 792), used by daily pages.
    pub const LETTER_PORTRAIT: Self = Self::new(US_LETTER_WIDTH, US_LETTER_HEIGHT);

    /// US Letter landscape (792 × 612), used by the weekly page.
    pub const LETTER_LANDSCAPE: Self = Self::new(US_LETTER_HEIGHT, US_LETTER_WIDTH);

    /// Creates a new Size with the given width and height.
    #[inline]
    #[must_use = "creates a new Size with width and height"]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether the page is wider than tall
    #[inline]
    #[must_use]
    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }
}

/// Axis-aligned rectangle.
///
/// In `TopLeft` coordinates `t < b`; in `BottomLeft` coordinates `t > b`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left coordinate
    pub l: f64,
    /// Top coordinate
    pub t: f64,
    /// Right coordinate
    pub r: f64,
    /// Bottom coordinate
    pub b: f64,
    /// Coordinate origin (BOTTOMLEFT or TOPLEFT)
    pub coord_origin: CoordOrigin,
}

impl BoundingBox {
    /// Creates a new `BoundingBox` with the given coordinates.
    #[inline]
    #[must_use = "creates a new BoundingBox with coordinates"]
    pub const fn new(l: f64, t: f64, r: f64, b: f64, coord_origin: CoordOrigin) -> Self {
        Self {
            l,
            t,
            r,
            b,
            coord_origin,
        }
    }

    /// Top-left rectangle from its corners `(x0, y0)`-`(x1, y1)`
    #[inline]
    #[must_use = "creates a top-left BoundingBox"]
    pub const fn top_left(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self::new(x0, y0, x1, y1, CoordOrigin::TopLeft)
    }

    /// Top-left rectangle from origin and extent
    #[inline]
    #[must_use = "creates a top-left BoundingBox"]
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::top_left(x, y, x + width, y + height)
    }

    /// Width in points (right - left)
    #[inline]
    #[must_use = "returns the width of the bounding box"]
    pub const fn width(&self) -> f64 {
        self.r - self.l
    }

    /// Height in points (absolute value of top - bottom)
    #[inline]
    #[must_use = "returns the height of the bounding box"]
    pub const fn height(&self) -> f64 {
        // f64::abs() is not const
        let diff = self.t - self.b;
        if diff < 0.0 {
            -diff
        } else {
            diff
        }
    }

    /// Whether the box has positive width and height
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.width() > 0.0 && self.height() > 0.0
    }

    /// Whether the box lies fully inside `size` (either origin)
    #[must_use]
    pub fn fits_within(&self, size: Size) -> bool {
        let (top, bottom) = if self.t < self.b {
            (self.t, self.b)
        } else {
            (self.b, self.t)
        };
        self.l >= 0.0 && self.r <= size.width && top >= 0.0 && bottom <= size.height
    }

    /// Converts the bounding box to bottom-left origin coordinate system.
    ///
    /// If already in bottom-left origin, returns a copy unchanged.
    #[inline]
    #[must_use = "converts bounding box to bottom-left origin"]
    pub fn to_bottom_left_origin(&self, page_height: f64) -> Self {
        if self.coord_origin == CoordOrigin::BottomLeft {
            return *self;
        }

        Self {
            l: self.l,
            t: page_height - self.t,
            r: self.r,
            b: page_height - self.b,
            coord_origin: CoordOrigin::BottomLeft,
        }
    }

    /// Converts the bounding box to top-left origin coordinate system.
    ///
    /// If already in top-left origin, returns a copy unchanged.
    #[inline]
    #[must_use = "converts bounding box to top-left origin"]
    pub fn to_top_left_origin(&self, page_height: f64) -> Self {
        if self.coord_origin == CoordOrigin::TopLeft {
            return *self;
        }

        Self {
            l: self.l,
            t: page_height - self.t,
            r: self.r,
            b: page_height - self.b,
            coord_origin: CoordOrigin::TopLeft,
        }
    }

    /// PDF rectangle `[llx, lly, urx, ury]` for a page of the given height
    #[must_use]
    pub fn to_pdf_rect(&self, page_height: f64) -> [f64; 4] {
        let bl = self.to_bottom_left_origin(page_height);
        [bl.l, bl.b.min(bl.t), bl.r, bl.t.max(bl.b)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_dimensions() {
        let bbox = BoundingBox::top_left(50.0, 100.0, 150.0, 125.0);
        assert_eq!(bbox.width(), 100.0);
        assert_eq!(bbox.height(), 25.0);
        assert!(bbox.is_valid());
    }

    #[test]
    fn test_bounding_box_coordinate_conversion() {
        let bbox = BoundingBox::top_left(50.0, 100.0, 150.0, 125.0);
        let bottom_left = bbox.to_bottom_left_origin(792.0);
        assert_eq!(bottom_left.coord_origin, CoordOrigin::BottomLeft);
        assert_eq!(bottom_left.t, 692.0);
        assert_eq!(bottom_left.b, 667.0);

        let back = bottom_left.to_top_left_origin(792.0);
        assert_eq!(back, bbox);
    }

    #[test]
    fn test_pdf_rect() {
        let bbox = BoundingBox::top_left(50.0, 100.0, 150.0, 125.0);
        assert_eq!(bbox.to_pdf_rect(792.0), [50.0, 667.0, 150.0, 692.0]);
    }

    #[test]
    fn test_fits_within() {
        assert!(BoundingBox::from_xywh(0.0, 0.0, 612.0, 792.0).fits_within(Size::LETTER_PORTRAIT));
        assert!(!BoundingBox::from_xywh(0.0, 700.0, 10.0, 100.0).fits_within(Size::LETTER_PORTRAIT));
    }

    #[test]
    fn test_letter_sizes() {
        assert!(Size::LETTER_LANDSCAPE.is_landscape());
        assert!(!Size::LETTER_PORTRAIT.is_landscape());
    }
}
