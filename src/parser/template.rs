//! Template ingestion: reduce an uploaded PDF to its first page.

use lopdf::{Document as LopdfDocument, Object, ObjectId};

use crate::detect::detect_format_from_bytes;
use crate::error::{Error, Result};
use crate::model::{PageBox, Template};

/// Page attributes that may be inherited from the page tree.
const INHERITABLE: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

/// Guard against cyclic `/Parent` chains in broken files.
const MAX_TREE_DEPTH: usize = 64;

/// Normalize uploaded bytes into a single-page [`Template`].
///
/// Page 1 is kept, every other page is removed, and inherited page
/// attributes are copied onto the kept page so it stands on its own.
pub fn ingest_template(data: &[u8]) -> Result<Template> {
    let format = detect_format_from_bytes(data)?;

    let mut doc = LopdfDocument::load_mem(data).map_err(Error::unsupported)?;
    if doc.is_encrypted() {
        return Err(Error::UnsupportedFormat("document is encrypted".to_string()));
    }

    let pages = doc.get_pages();
    let source_page_count = pages.len() as u32;
    let (&first_number, &first_id) = pages
        .iter()
        .next()
        .ok_or_else(|| Error::UnsupportedFormat("document has no pages".to_string()))?;

    flatten_inherited(&mut doc, first_id)?;

    if source_page_count > 1 {
        let rest: Vec<u32> = pages
            .keys()
            .copied()
            .filter(|n| *n != first_number)
            .collect();
        doc.delete_pages(&rest);
        doc.prune_objects();
        log::info!(
            "Template had {} pages; kept page {} only",
            source_page_count,
            first_number
        );
    }

    let remaining = doc.get_pages().len();
    if remaining != 1 {
        return Err(Error::UnsupportedFormat(format!(
            "normalization left {} pages",
            remaining
        )));
    }

    let page_box = media_box(&doc, first_id)?;

    let mut out = Vec::with_capacity(data.len());
    doc.save_to(&mut out)
        .map_err(|e| Error::UnsupportedFormat(format!("failed to write template: {}", e)))?;

    log::debug!(
        "Normalized template: {} ({:.1} x {:.1} pt, {} bytes)",
        format,
        page_box.width(),
        page_box.height(),
        out.len()
    );
    Ok(Template::new(out, page_box, format.version, source_page_count))
}

/// Copy inherited attributes from the page tree onto `page_id`.
fn flatten_inherited(doc: &mut LopdfDocument, page_id: ObjectId) -> Result<()> {
    let mut found = Vec::new();
    {
        let page = doc.get_dictionary(page_id).map_err(Error::unsupported)?;
        for key in INHERITABLE {
            if !page.has(key) {
                if let Some(value) = inherited_attribute(doc, page_id, key) {
                    found.push((key, value));
                }
            }
        }
    }
    let page = doc.get_dictionary_mut(page_id).map_err(Error::unsupported)?;
    for (key, value) in found {
        page.set(key.to_vec(), value);
    }
    Ok(())
}

/// Look up `key` on the page or, failing that, its ancestors.
fn inherited_attribute(
    doc: &LopdfDocument,
    page_id: ObjectId,
    key: &[u8],
) -> Option<Object> {
    let mut current = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = current.get(key) {
            return Some(value.clone());
        }
        let parent = current.get(b"Parent").and_then(|p| p.as_reference()).ok()?;
        current = doc.get_dictionary(parent).ok()?;
    }
    None
}

/// Follow a reference, if `obj` is one.
fn resolve<'a>(doc: &'a LopdfDocument, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

/// Numeric value of an integer or real object.
fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}

/// The page's MediaBox, intersected with its CropBox when one is present.
fn media_box(doc: &LopdfDocument, page_id: ObjectId) -> Result<PageBox> {
    let media = inherited_attribute(doc, page_id, b"MediaBox")
        .and_then(|obj| read_box(doc, &obj))
        .ok_or_else(|| Error::UnsupportedFormat("page has no usable MediaBox".to_string()))?;

    let visible = match inherited_attribute(doc, page_id, b"CropBox")
        .and_then(|obj| read_box(doc, &obj))
    {
        Some(crop) => PageBox {
            llx: media.llx.max(crop.llx),
            lly: media.lly.max(crop.lly),
            urx: media.urx.min(crop.urx),
            ury: media.ury.min(crop.ury),
        },
        None => media,
    };

    if visible.width() <= 0.0 || visible.height() <= 0.0 {
        return Err(Error::UnsupportedFormat(format!(
            "page box is degenerate ({} x {})",
            visible.width(),
            visible.height()
        )));
    }
    Ok(visible)
}

fn read_box(doc: &LopdfDocument, obj: &Object) -> Option<PageBox> {
    let array = resolve(doc, obj)?.as_array().ok()?;
    if array.len() != 4 {
        return None;
    }
    let mut v = [0f32; 4];
    for (slot, item) in v.iter_mut().zip(array) {
        *slot = number(resolve(doc, item)?)?;
    }
    Some(PageBox::from_corners(v[0], v[1], v[2], v[3]))
}
