//! Document Assembler: rendered pages and link graph to one PDF file
//!
//! Pages are written in the fixed order weekly overview, then day 1..7.
//! The output is written to a temporary file next to the destination and
//! renamed over it, so a failed export never leaves a partial document at
//! the requested path.

use std::io::{ErrorKind, Write};
use std::path::Path;

use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::error::{PlannerError, Result};
use crate::font::{ResolvedFont, FIRST_CHAR, LAST_CHAR};
use crate::links::{LinkGraph, PageId, PAGE_COUNT};
use crate::render::canvas::{real, FONT_RESOURCE};
use crate::render::RenderedPage;

/// PDF version written
pub const PDF_VERSION: &str = "1.5";

/// Producer recorded in the document info
pub const PRODUCER: &str = concat!("weekpack ", env!("CARGO_PKG_VERSION"));

/// Build the document for a complete package.
///
/// # Errors
///
/// Returns [`PlannerError::InvalidInput`] unless `pages` holds exactly the
/// weekly overview followed by the seven daily pages, and
/// [`PlannerError::Wiring`] if `graph` does not span the same pages.
pub fn assemble(
    pages: &[RenderedPage],
    graph: &LinkGraph,
    font: &ResolvedFont,
    title: &str,
) -> Result<Document> {
    check_page_order(pages)?;
    if graph.page_count() != pages.len() {
        return Err(PlannerError::wiring(format!(
            "link graph spans {} pages, document has {}",
            graph.page_count(),
            pages.len()
        )));
    }

    let mut doc = Document::with_version(PDF_VERSION);
    let pages_id = doc.new_object_id();
    let font_id = add_font(&mut doc, font);
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            FONT_RESOURCE => font_id,
        },
    });

    let mut page_ids = Vec::with_capacity(pages.len());
    for page in pages {
        let content_id = doc.add_object(Stream::new(dictionary! {}, page.content.clone()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                real(page.size.width),
                real(page.size.height),
            ],
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        page_ids.push(page_id);
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
            "Count" => page_ids.len() as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    set_info(&mut doc, title);

    let heights: Vec<f64> = pages.iter().map(|p| p.size.height).collect();
    let links = add_link_annotations(&mut doc, &page_ids, &heights, graph)?;
    log::debug!("Assembled {} pages with {links} links", page_ids.len());

    doc.compress();
    Ok(doc)
}

/// Check the weekly-then-daily page order of a package
fn check_page_order(pages: &[RenderedPage]) -> Result<()> {
    if pages.len() != PAGE_COUNT {
        return Err(PlannerError::invalid_input(format!(
            "a package has exactly {PAGE_COUNT} pages, got {}",
            pages.len()
        )));
    }
    for (index, page) in pages.iter().enumerate() {
        if PageId::from_index(index) != Some(page.id) {
            return Err(PlannerError::invalid_input(format!(
                "page {index} is the {}, expected the {}",
                page.id,
                PageId::from_index(index).map_or_else(String::new, |id| id.to_string())
            )));
        }
    }
    Ok(())
}

/// Add the page font and return its object id
fn add_font(doc: &mut Document, font: &ResolvedFont) -> ObjectId {
    match font {
        ResolvedFont::Builtin => doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => font.base_font_name(),
            "Encoding" => "WinAnsiEncoding",
        }),
        ResolvedFont::Embedded(embedded) => {
            let file_id = doc.add_object(Stream::new(
                dictionary! {
                    "Length1" => embedded.data.len() as i64,
                },
                embedded.data.clone(),
            ));
            let descriptor_id = doc.add_object(dictionary! {
                "Type" => "FontDescriptor",
                "FontName" => embedded.name.as_str(),
                "Flags" => Object::Integer(32),
                "FontBBox" => vec![
                    Object::Integer(0),
                    Object::Integer(embedded.descent),
                    Object::Integer(1000),
                    Object::Integer(embedded.ascent),
                ],
                "ItalicAngle" => Object::Integer(0),
                "Ascent" => embedded.ascent,
                "Descent" => embedded.descent,
                "CapHeight" => embedded.ascent,
                "StemV" => Object::Integer(80),
                "FontFile2" => file_id,
            });
            let widths: Vec<Object> = font
                .widths()
                .into_iter()
                .map(|w| Object::Integer(i64::from(w)))
                .collect();
            doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "TrueType",
                "BaseFont" => embedded.name.as_str(),
                "FirstChar" => i64::from(FIRST_CHAR),
                "LastChar" => i64::from(LAST_CHAR),
                "Widths" => widths,
                "FontDescriptor" => descriptor_id,
                "Encoding" => "WinAnsiEncoding",
            })
        }
    }
}

/// Set the document info dictionary
pub(crate) fn set_info(doc: &mut Document, title: &str) {
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::String(title.as_bytes().to_vec(), StringFormat::Literal),
        "Producer" => Object::String(PRODUCER.as_bytes().to_vec(), StringFormat::Literal),
    });
    doc.trailer.set("Info", info_id);
}

/// Attach one `/Link` annotation per graph edge.
///
/// `page_ids[i]` and `page_heights[i]` describe document page `i`; regions
/// are converted from top-left to PDF coordinates with the page height.
/// Existing annotations on a page are kept. Returns the number of links
/// written.
///
/// # Errors
///
/// Returns [`PlannerError::Wiring`] if an edge references a page that is
/// not in `page_ids`, or a PDF error if a page object is malformed.
pub fn add_link_annotations(
    doc: &mut Document,
    page_ids: &[ObjectId],
    page_heights: &[f64],
    graph: &LinkGraph,
) -> Result<usize> {
    let mut written = 0;
    for (index, page_id) in page_ids.iter().enumerate() {
        let height = page_heights.get(index).copied().ok_or_else(|| {
            PlannerError::wiring(format!("no page height for page {index}"))
        })?;

        let mut annots = Vec::new();
        for edge in graph.edges_from(index) {
            let target = page_ids.get(edge.to_page).copied().ok_or_else(|| {
                PlannerError::wiring(format!(
                    "link {} -> {} targets a missing page",
                    edge.from_page, edge.to_page
                ))
            })?;
            let rect: Vec<Object> = edge
                .from_region
                .to_pdf_rect(height)
                .into_iter()
                .map(real)
                .collect();
            annots.push(Object::Reference(doc.add_object(dictionary! {
                "Type" => "Annot",
                "Subtype" => "Link",
                "Rect" => rect,
                "Border" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(0)],
                "Dest" => vec![
                    Object::Reference(target),
                    "XYZ".into(),
                    Object::Null,
                    Object::Null,
                    Object::Null,
                ],
            })));
        }
        if annots.is_empty() {
            continue;
        }
        written += annots.len();

        let existing = existing_annotations(doc, *page_id)?;
        let page = doc.get_object_mut(*page_id)?.as_dict_mut()?;
        let mut all = existing;
        all.extend(annots);
        page.set("Annots", all);
    }
    Ok(written)
}

/// Annotations already on a page, resolving an indirect array
fn existing_annotations(doc: &Document, page_id: ObjectId) -> Result<Vec<Object>> {
    let page = doc.get_dictionary(page_id)?;
    let annots = match page.get(b"Annots") {
        Ok(Object::Array(items)) => items.clone(),
        Ok(Object::Reference(id)) => doc.get_object(*id)?.as_array()?.clone(),
        _ => Vec::new(),
    };
    Ok(annots)
}

/// Serialize a document to bytes
///
/// # Errors
///
/// Returns an error if lopdf cannot write the document.
pub fn to_bytes(doc: &mut Document) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;
    Ok(buffer)
}

/// Write a document to `path` atomically.
///
/// The bytes go to a temporary file in the destination directory which is
/// then renamed over `path`. On error the temporary file is removed and
/// `path` is left untouched.
///
/// # Errors
///
/// Returns [`PlannerError::Write`] if the temporary file cannot be created,
/// written or moved into place.
pub fn write_atomic(doc: &mut Document, path: &Path) -> Result<()> {
    let bytes = to_bytes(doc)?;
    write_bytes_atomic(&bytes, path)
}

/// Write raw bytes to `path` atomically; see [`write_atomic`].
///
/// # Errors
///
/// Returns [`PlannerError::Write`] on any I/O failure.
pub fn write_bytes_atomic(bytes: &[u8], path: &Path) -> Result<()> {
    persist_bytes(bytes, path, false)
}

/// Write a document to `path` atomically, refusing to replace an existing
/// file.
///
/// The existence check and the rename are one step, so a file created at
/// `path` while the document is being written is never overwritten.
///
/// # Errors
///
/// Returns [`PlannerError::InvalidInput`] if `path` already exists and
/// [`PlannerError::Write`] on any other I/O failure.
pub fn write_new_atomic(doc: &mut Document, path: &Path) -> Result<()> {
    let bytes = to_bytes(doc)?;
    write_bytes_new_atomic(&bytes, path)
}

/// Write raw bytes to a new file at `path`; see [`write_new_atomic`].
///
/// # Errors
///
/// Returns [`PlannerError::InvalidInput`] if `path` already exists and
/// [`PlannerError::Write`] on any other I/O failure.
pub fn write_bytes_new_atomic(bytes: &[u8], path: &Path) -> Result<()> {
    persist_bytes(bytes, path, true)
}

fn persist_bytes(bytes: &[u8], path: &Path, no_clobber: bool) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::Builder::new()
        .prefix(".weekpack-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| PlannerError::write_error(path, e))?;
    tmp.write_all(bytes)
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| PlannerError::write_error(path, e))?;

    let persisted = if no_clobber {
        tmp.persist_noclobber(path)
    } else {
        tmp.persist(path)
    };
    // The temporary file is dropped with the error, which removes it.
    persisted.map_err(|e| match e.error.kind() {
        ErrorKind::AlreadyExists if no_clobber => {
            PlannerError::invalid_input(format!("{} already exists", path.display()))
        }
        _ => PlannerError::write_error(path, e.error),
    })?;
    log::info!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}
