//! Page Renderer: weekly overview and daily pages as PDF content streams
//!
//! Each renderer returns the encoded content of its page together with the
//! navigation regions it drew, which [`crate::links::wire_links`] turns into
//! link annotations.

pub mod canvas;
pub mod daily;
pub mod weekly;

pub use canvas::{band_baseline, source_style, BlockStyle, BorderStyle, PageCanvas, Rgb};
pub use daily::render_daily;
pub use weekly::render_weekly;

use serde::{Deserialize, Serialize};
use weekpack_calendar::NormalizedWeek;

use crate::error::Result;
use crate::font::ResolvedFont;
use crate::geometry::Size;
use crate::links::{NavRegions, PageId, DAILY_PAGES};

/// One rendered page, ready for assembly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedPage {
    /// Which page this is
    pub id: PageId,
    /// Media box size
    pub size: Size,
    /// Encoded content stream (uncompressed)
    #[serde(skip)]
    pub content: Vec<u8>,
    /// Navigation regions drawn on the page
    pub regions: NavRegions,
}

/// Render the weekly overview followed by the seven daily pages.
///
/// # Errors
///
/// Returns an error if any page fails to encode.
pub fn render_package(week: &NormalizedWeek, font: &ResolvedFont) -> Result<Vec<RenderedPage>> {
    let mut pages = Vec::with_capacity(DAILY_PAGES + 1);
    pages.push(render_weekly(week, font)?);
    for day in 0..DAILY_PAGES {
        pages.push(render_daily(week, day, font)?);
    }
    log::debug!("Rendered {} pages for week {}", pages.len(), week.week);
    Ok(pages)
}

/// Navigation regions of rendered pages, in page order
#[must_use]
pub fn page_regions(pages: &[RenderedPage]) -> Vec<NavRegions> {
    pages.iter().map(|p| p.regions.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use weekpack_calendar::{normalize_events, Week};

    #[test]
    fn test_package_page_order() {
        let week = Week::from_bounds("2025-07-14", "2025-07-20").unwrap();
        let normalized = normalize_events(Vec::new(), &week);
        let pages = render_package(&normalized, &ResolvedFont::Builtin).unwrap();

        let ids: Vec<_> = pages.iter().map(|p| p.id).collect();
        assert_eq!(ids, PageId::all().collect::<Vec<_>>());
        assert!(pages[0].size.is_landscape());
        assert!(pages[1..].iter().all(|p| !p.size.is_landscape()));
        assert!(pages.iter().all(|p| !p.content.is_empty()));
    }

    #[test]
    fn test_regions_wire_into_26_links() {
        let week = Week::from_bounds("2025-07-14", "2025-07-20").unwrap();
        let normalized = normalize_events(Vec::new(), &week);
        let pages = render_package(&normalized, &ResolvedFont::Builtin).unwrap();
        let graph = crate::links::wire_links(&page_regions(&pages)).unwrap();
        assert_eq!(graph.len(), 26);
    }
}
