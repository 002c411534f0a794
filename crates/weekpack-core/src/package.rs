//! Link separately rendered planner PDFs into one navigable package
//!
//! Takes a one-page weekly overview and seven one-page daily PDFs produced
//! elsewhere, concatenates their first pages and adds the same navigation
//! graph a generated package has. Regions are placed proportionally to each
//! page's media box, since the source layout is not known exactly:
//!
//! - weekly page: the header band (top 12%) right of the time column (left
//!   8%), split into seven equal day cells;
//! - daily pages: a weekly overview button in the top-left corner, another
//!   centred at the bottom and the date title, plus previous/next buttons in
//!   the bottom corners.
//!
//! Three weekly regions per daily page make 40 links in total.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use lopdf::{dictionary, Document, Object, ObjectId};
use serde::{Deserialize, Serialize};

use crate::assemble::{add_link_annotations, set_info, write_atomic};
use crate::error::{PlannerError, Result};
use crate::geometry::{BoundingBox, Size};
use crate::links::{wire_links, NavRegions, DAILY_PAGES, PAGE_COUNT};

/// Summary of a linked package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedPackage {
    /// Written file
    pub path: PathBuf,
    /// Pages in the package
    pub pages: usize,
    /// Link annotations added
    pub links: usize,
}

/// Regions on a weekly page of the given size
#[must_use]
pub fn weekly_regions(size: Size) -> NavRegions {
    let time_col = size.width * 0.08;
    let header_height = size.height * 0.12;
    let day_width = (size.width - time_col) / DAILY_PAGES as f64;
    let headers = (0..DAILY_PAGES)
        .map(|day| {
            let left = time_col + day as f64 * day_width;
            BoundingBox::top_left(left, 0.0, left + day_width, header_height)
        })
        .collect();
    NavRegions::weekly_page(headers)
}

/// Regions on daily page `day` (0..7) of the given size
#[must_use]
pub fn daily_regions(size: Size, day: usize) -> NavRegions {
    let (w, h) = (size.width, size.height);
    let weekly = vec![
        BoundingBox::top_left(15.0, 15.0, 150.0, 60.0),
        BoundingBox::top_left(w * 0.4, h - 60.0, w * 0.6, h - 15.0),
        BoundingBox::top_left(w * 0.25, 15.0, w * 0.75, 60.0),
    ];
    let prev = (day > 0).then(|| BoundingBox::top_left(15.0, h - 60.0, 100.0, h - 15.0));
    let next = (day + 1 < DAILY_PAGES)
        .then(|| BoundingBox::top_left(w - 100.0, h - 60.0, w - 15.0, h - 15.0));
    NavRegions::daily_page(weekly, prev, next)
}

/// Merge and link an existing weekly PDF and seven daily PDFs.
///
/// The first page of each input is used. The output is written atomically.
///
/// # Errors
///
/// Returns [`PlannerError::InvalidInput`] if `daily` does not hold exactly
/// seven paths or an input has no pages, [`PlannerError::Read`] if an input
/// is missing, and a PDF or write error if merging or writing fails.
pub fn link_existing_package<P, Q>(weekly: P, daily: &[Q], output: &Path) -> Result<LinkedPackage>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    if daily.len() != DAILY_PAGES {
        return Err(PlannerError::invalid_input(format!(
            "expected {DAILY_PAGES} daily PDFs, got {}",
            daily.len()
        )));
    }

    let mut sources = Vec::with_capacity(PAGE_COUNT);
    sources.push(load_source(weekly.as_ref())?);
    for path in daily {
        sources.push(load_source(path.as_ref())?);
    }

    let (mut doc, page_ids, sizes) = merge_first_pages(sources)?;

    let mut regions = vec![weekly_regions(sizes[0])];
    regions.extend((0..DAILY_PAGES).map(|day| daily_regions(sizes[day + 1], day)));
    let graph = wire_links(&regions)?;

    let heights: Vec<f64> = sizes.iter().map(|s| s.height).collect();
    let links = add_link_annotations(&mut doc, &page_ids, &heights, &graph)?;
    set_info(&mut doc, "Weekly Planner");
    doc.compress();
    write_atomic(&mut doc, output)?;

    log::info!(
        "Linked {} pages with {links} links into {}",
        page_ids.len(),
        output.display()
    );
    Ok(LinkedPackage {
        path: output.to_path_buf(),
        pages: page_ids.len(),
        links,
    })
}

fn load_source(path: &Path) -> Result<Document> {
    if !path.exists() {
        return Err(PlannerError::read_error(
            path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        ));
    }
    let doc = Document::load(path)?;
    if doc.get_pages().is_empty() {
        return Err(PlannerError::invalid_input(format!(
            "{} has no pages",
            path.display()
        )));
    }
    log::debug!("Loaded {}", path.display());
    Ok(doc)
}

/// Copy the first page of each document (and everything it references)
/// into one new document, in order.
fn merge_first_pages(sources: Vec<Document>) -> Result<(Document, Vec<ObjectId>, Vec<Size>)> {
    let mut merged = Document::with_version("1.5");
    let mut max_id = 1;
    let mut page_ids = Vec::with_capacity(sources.len());
    let mut sizes = Vec::with_capacity(sources.len());
    let mut objects: BTreeMap<ObjectId, Object> = BTreeMap::new();

    for mut doc in sources {
        doc.renumber_objects_with(max_id);
        max_id = doc.max_id + 1;

        let pages = doc.get_pages();
        let Some(first) = pages.values().next().copied() else {
            return Err(PlannerError::invalid_input("input PDF has no pages"));
        };
        let skipped: Vec<ObjectId> = pages.values().skip(1).copied().collect();

        // Inheritable attributes move onto the page before it is reparented
        let media_box = inherited(&doc, first, b"MediaBox");
        let resources = inherited(&doc, first, b"Resources");
        let size = media_box.as_ref().map_or(Size::LETTER_PORTRAIT, media_box_size);
        {
            let page = doc.get_object_mut(first)?.as_dict_mut()?;
            if let Some(media_box) = media_box {
                page.set("MediaBox", media_box);
            }
            if let Some(resources) = resources {
                page.set("Resources", resources);
            }
        }

        for (id, object) in doc.objects {
            if skipped.contains(&id) || is_structural(&object) {
                continue;
            }
            objects.insert(id, object);
        }
        page_ids.push(first);
        sizes.push(size);
    }

    merged.max_id = max_id;
    let pages_id = merged.new_object_id();
    for id in &page_ids {
        if let Some(Object::Dictionary(page)) = objects.get_mut(id) {
            page.set("Parent", pages_id);
        }
    }
    merged.objects.extend(objects);
    merged.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
            "Count" => page_ids.len() as i64,
        }),
    );
    let catalog_id = merged.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    merged.trailer.set("Root", catalog_id);
    Ok((merged, page_ids, sizes))
}

/// Catalog and page-tree nodes are rebuilt, never copied
fn is_structural(object: &Object) -> bool {
    let Object::Dictionary(dict) = object else {
        return false;
    };
    matches!(
        dict.get(b"Type").and_then(Object::as_name),
        Ok(b"Catalog" | b"Pages" | b"Outlines")
    )
}

/// Look up a page attribute, walking up the page tree
fn inherited(doc: &Document, page: ObjectId, key: &[u8]) -> Option<Object> {
    let mut current = doc.get_dictionary(page).ok()?;
    loop {
        if let Ok(value) = current.get(key) {
            return match value {
                Object::Reference(id) => doc.get_object(*id).ok().cloned(),
                other => Some(other.clone()),
            };
        }
        let parent = current.get(b"Parent").and_then(Object::as_reference).ok()?;
        current = doc.get_dictionary(parent).ok()?;
    }
}

fn number(object: &Object) -> Option<f64> {
    match object {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(f64::from(*r)),
        _ => None,
    }
}

/// Page size from a `[llx lly urx ury]` media box
fn media_box_size(media_box: &Object) -> Size {
    let values: Vec<f64> = media_box
        .as_array()
        .map(|a| a.iter().filter_map(number).collect())
        .unwrap_or_default();
    match values.as_slice() {
        [llx, lly, urx, ury] => Size::new((urx - llx).abs(), (ury - lly).abs()),
        _ => Size::LETTER_PORTRAIT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::ResolvedFont;
    use crate::render::{render_daily, render_weekly, RenderedPage};
    use weekpack_calendar::{normalize_events, Week};

    /// Write a rendered page as a standalone one-page PDF
    fn single_page_pdf(page: &RenderedPage, path: &Path) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let content_id = doc.add_object(lopdf::Stream::new(dictionary! {}, page.content.clone()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(page_id)],
                "Count" => Object::Integer(1),
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(page.size.width as i64),
                    Object::Integer(page.size.height as i64),
                ],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }

    fn fixture_pdfs(dir: &Path) -> (PathBuf, Vec<PathBuf>) {
        let week = Week::from_bounds("2025-07-14", "2025-07-20").unwrap();
        let normalized = normalize_events(Vec::new(), &week);
        let font = ResolvedFont::Builtin;

        let weekly = dir.join("weekly.pdf");
        single_page_pdf(&render_weekly(&normalized, &font).unwrap(), &weekly);
        let daily = (0..DAILY_PAGES)
            .map(|day| {
                let path = dir.join(format!("day{}.pdf", day + 1));
                single_page_pdf(&render_daily(&normalized, day, &font).unwrap(), &path);
                path
            })
            .collect();
        (weekly, daily)
    }

    #[test]
    fn test_region_counts() {
        let weekly = weekly_regions(Size::LETTER_LANDSCAPE);
        assert_eq!(weekly.day_headers.len(), 7);
        let first = weekly.day_headers[0];
        assert!((first.l - 792.0 * 0.08).abs() < 1e-9);
        assert!((first.b - 612.0 * 0.12).abs() < 1e-9);

        let monday = daily_regions(Size::LETTER_PORTRAIT, 0);
        assert_eq!(monday.weekly.len(), 3);
        assert!(monday.prev.is_none() && monday.next.is_some());
        let sunday = daily_regions(Size::LETTER_PORTRAIT, 6);
        assert!(sunday.prev.is_some() && sunday.next.is_none());
    }

    #[test]
    fn test_media_box_size() {
        let object = Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(792),
            Object::Integer(612),
        ]);
        assert_eq!(media_box_size(&object), Size::LETTER_LANDSCAPE);
        assert_eq!(media_box_size(&Object::Null), Size::LETTER_PORTRAIT);
    }

    #[test]
    fn test_link_existing_package() {
        let dir = tempfile::tempdir().unwrap();
        let (weekly, daily) = fixture_pdfs(dir.path());
        let output = dir.path().join("package.pdf");

        let linked = link_existing_package(&weekly, &daily, &output).unwrap();
        assert_eq!(linked.pages, 8);
        assert_eq!(linked.links, 40);

        let doc = Document::load(&output).unwrap();
        let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
        assert_eq!(pages.len(), 8);
        let weekly_annots = doc
            .get_dictionary(pages[0])
            .unwrap()
            .get(b"Annots")
            .and_then(Object::as_array)
            .unwrap()
            .len();
        assert_eq!(weekly_annots, 7);
    }

    #[test]
    fn test_wrong_daily_count() {
        let dir = tempfile::tempdir().unwrap();
        let (weekly, mut daily) = fixture_pdfs(dir.path());
        daily.pop();
        let err = link_existing_package(&weekly, &daily, &dir.path().join("out.pdf")).unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let (weekly, mut daily) = fixture_pdfs(dir.path());
        daily[3] = dir.path().join("nope.pdf");
        let output = dir.path().join("out.pdf");
        let err = link_existing_package(&weekly, &daily, &output).unwrap_err();
        assert!(matches!(err, PlannerError::Read { .. }));
        assert!(!output.exists());
    }
}
