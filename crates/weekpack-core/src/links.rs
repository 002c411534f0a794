//! Link Wiring: the fixed navigation graph between package pages
//!
//! Page 0 is the weekly overview, pages 1..=7 are the daily pages in week
//! order. Edges:
//!
//! | From | To | Region | Count |
//! |------|----|--------|-------|
//! | weekly | day *i* | day header cell | 7 |
//! | day *i* | weekly | each "weekly overview" region | ≥ 7 |
//! | day *i* | day *i−1* | previous button (not on the first day) | 6 |
//! | day *i* | day *i+1* | next button (not on the last day) | 6 |
//!
//! Generated packages carry one weekly region per daily page (26 edges);
//! the existing-PDF linker carries three (40 edges). Any missing region or
//! page fails the whole wiring step; nothing is silently left unlinked.

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::geometry::BoundingBox;

/// Daily pages in a package
pub const DAILY_PAGES: usize = weekpack_calendar::DAYS_PER_WEEK;

/// Total pages in a package (weekly + daily)
pub const PAGE_COUNT: usize = DAILY_PAGES + 1;

/// A page of the package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PageId {
    /// The landscape weekly overview (page 0)
    WeeklyOverview,
    /// A portrait daily page, by day index 0..7
    Daily(usize),
}

impl PageId {
    /// Position in the assembled document
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::WeeklyOverview => 0,
            Self::Daily(day) => day + 1,
        }
    }

    /// Page at a document position
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::WeeklyOverview),
            i if i < PAGE_COUNT => Some(Self::Daily(i - 1)),
            _ => None,
        }
    }

    /// All pages in document order
    pub fn all() -> impl Iterator<Item = Self> {
        (0..PAGE_COUNT).filter_map(Self::from_index)
    }
}

impl std::fmt::Display for PageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WeeklyOverview => write!(f, "weekly overview"),
            Self::Daily(day) => write!(f, "daily page {}", day + 1),
        }
    }
}

/// Navigation regions a rendered page exposes, in top-left coordinates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NavRegions {
    /// Day header cells, in day order (weekly page only)
    pub day_headers: Vec<BoundingBox>,
    /// Regions that jump back to the weekly page (daily pages)
    pub weekly: Vec<BoundingBox>,
    /// Previous-day button
    pub prev: Option<BoundingBox>,
    /// Next-day button
    pub next: Option<BoundingBox>,
}

impl NavRegions {
    /// Regions of a weekly overview page
    #[must_use]
    pub fn weekly_page(day_headers: Vec<BoundingBox>) -> Self {
        Self {
            day_headers,
            ..Self::default()
        }
    }

    /// Regions of a daily page
    #[must_use]
    pub fn daily_page(
        weekly: Vec<BoundingBox>,
        prev: Option<BoundingBox>,
        next: Option<BoundingBox>,
    ) -> Self {
        Self {
            day_headers: Vec::new(),
            weekly,
            prev,
            next,
        }
    }
}

/// Where a link lands on its target page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Anchor {
    /// Top of the page, keeping the current zoom
    #[default]
    PageTop,
}

/// One clickable region and its destination
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinkEdge {
    /// Page the region sits on
    pub from_page: usize,
    /// Clickable rectangle (top-left origin)
    pub from_region: BoundingBox,
    /// Destination page
    pub to_page: usize,
    /// Landing point on the destination
    pub to_anchor: Anchor,
}

/// The complete, verified link graph of a package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkGraph {
    edges: Vec<LinkEdge>,
    page_count: usize,
}

/// Edges expected for a set of page regions: `7 + Σ weekly + 6 + 6`
#[must_use]
pub fn expected_edge_count(pages: &[NavRegions]) -> usize {
    let weekly_back: usize = pages.iter().skip(1).map(|p| p.weekly.len()).sum();
    DAILY_PAGES + weekly_back + 2 * (DAILY_PAGES - 1)
}

/// Wire the navigation graph from each page's regions.
///
/// `pages[0]` is the weekly page, `pages[1..=7]` the daily pages.
///
/// # Errors
///
/// Returns [`PlannerError::Wiring`] if the page count is not 8, a required
/// region is missing, or the finished graph fails [`LinkGraph::verify`].
///
/// # Examples
///
/// ```
/// use weekpack_core::{wire_links, BoundingBox, NavRegions};
///
/// let cell = BoundingBox::top_left(0.0, 0.0, 10.0, 10.0);
/// let mut pages = vec![NavRegions::weekly_page(vec![cell; 7])];
/// for day in 0..7 {
///     pages.push(NavRegions::daily_page(
///         vec![cell],
///         (day > 0).then_some(cell),
///         (day < 6).then_some(cell),
///     ));
/// }
/// let graph = wire_links(&pages)?;
/// assert_eq!(graph.len(), 26);
/// # Ok::<(), weekpack_core::PlannerError>(())
/// ```
pub fn wire_links(pages: &[NavRegions]) -> Result<LinkGraph> {
    if pages.len() != PAGE_COUNT {
        return Err(PlannerError::wiring(format!(
            "a package needs {PAGE_COUNT} pages (1 weekly + {DAILY_PAGES} daily), got {}",
            pages.len()
        )));
    }

    let mut edges = Vec::with_capacity(expected_edge_count(pages));
    let weekly = PageId::WeeklyOverview.index();

    let headers = &pages[weekly].day_headers;
    if headers.len() != DAILY_PAGES {
        return Err(PlannerError::wiring(format!(
            "weekly overview exposes {} day header regions, expected {DAILY_PAGES}",
            headers.len()
        )));
    }
    for (day, region) in headers.iter().enumerate() {
        edges.push(edge(weekly, *region, PageId::Daily(day).index()));
    }

    for day in 0..DAILY_PAGES {
        let page = PageId::Daily(day).index();
        let regions = &pages[page];

        if regions.weekly.is_empty() {
            return Err(PlannerError::wiring(format!(
                "daily page {} has no weekly overview region",
                day + 1
            )));
        }
        for region in &regions.weekly {
            edges.push(edge(page, *region, weekly));
        }

        if day > 0 {
            let region = regions.prev.ok_or_else(|| {
                PlannerError::wiring(format!("daily page {} has no previous-day region", day + 1))
            })?;
            edges.push(edge(page, region, page - 1));
        }
        if day + 1 < DAILY_PAGES {
            let region = regions.next.ok_or_else(|| {
                PlannerError::wiring(format!("daily page {} has no next-day region", day + 1))
            })?;
            edges.push(edge(page, region, page + 1));
        }
    }

    let graph = LinkGraph {
        edges,
        page_count: pages.len(),
    };
    graph.verify(expected_edge_count(pages))?;
    log::debug!("Wired {} navigation links", graph.len());
    Ok(graph)
}

fn edge(from_page: usize, from_region: BoundingBox, to_page: usize) -> LinkEdge {
    LinkEdge {
        from_page,
        from_region,
        to_page,
        to_anchor: Anchor::PageTop,
    }
}

impl LinkGraph {
    /// All edges, grouped by source page
    #[must_use]
    pub fn edges(&self) -> &[LinkEdge] {
        &self.edges
    }

    /// Number of edges
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether the graph has no edges
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Pages the graph spans
    #[inline]
    #[must_use]
    pub const fn page_count(&self) -> usize {
        self.page_count
    }

    /// Edges whose region sits on `page`
    pub fn edges_from(&self, page: usize) -> impl Iterator<Item = &LinkEdge> + '_ {
        self.edges.iter().filter(move |e| e.from_page == page)
    }

    /// Check the graph's structural invariants.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::Wiring`] if the edge count differs from
    /// `expected`, any edge points outside the document, a region is
    /// degenerate, or a forward edge has no reverse.
    pub fn verify(&self, expected: usize) -> Result<()> {
        if self.edges.len() != expected {
            return Err(PlannerError::wiring(format!(
                "expected {expected} links, wired {}",
                self.edges.len()
            )));
        }

        for e in &self.edges {
            if e.from_page >= self.page_count || e.to_page >= self.page_count {
                return Err(PlannerError::wiring(format!(
                    "link {} -> {} references a page outside 0..{}",
                    e.from_page, e.to_page, self.page_count
                )));
            }
            if e.from_page == e.to_page {
                return Err(PlannerError::wiring(format!(
                    "link on page {} points to itself",
                    e.from_page
                )));
            }
            if !e.from_region.is_valid() {
                return Err(PlannerError::wiring(format!(
                    "link {} -> {} has an empty region",
                    e.from_page, e.to_page
                )));
            }
        }

        for e in &self.edges {
            if !self.has_edge(e.to_page, e.from_page) {
                return Err(PlannerError::wiring(format!(
                    "link {} -> {} has no reverse link",
                    e.from_page, e.to_page
                )));
            }
        }
        Ok(())
    }

    fn has_edge(&self, from: usize, to: usize) -> bool {
        self.edges
            .iter()
            .any(|e| e.from_page == from && e.to_page == to)
    }
}
