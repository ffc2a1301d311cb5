//! Drawing field values onto the template page.
//!
//! A [`PreparedPage`] is built once per batch: the template is parsed,
//! every face the layout needs is resolved and installed as a page font,
//! and the original page content is wrapped in a `q`/`Q` pair so text
//! drawn afterwards starts from the default graphics state. Each record
//! then only clones the document and appends one content stream.

use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document as LopdfDocument, Object, ObjectId, Stream};

use super::result::{FallbackReason, RenderWarning, WarningKind};
use crate::error::{Error, Result};
use crate::fonts::{
    encoding, FaceSource, FontCatalog, FontWeight, ResolvedFace, TrueTypeFace, FIRST_CHAR,
    LAST_CHAR,
};
use crate::model::{Field, PageBox, Record, Template};

/// Fraction of the font size between the top of the text box and the
/// baseline.
pub const ASCENT_RATIO: f32 = 0.8;

const FALLBACK_RESOURCE: &str = "CgFb";

/// Font flag: uses the standard Latin character set.
const FLAG_NONSYMBOLIC: i64 = 1 << 5;

/// The PDF font a (family, weight) pair resolved to.
#[derive(Debug, Clone)]
struct FontSlot {
    resource: String,
    face: ResolvedFace,
    /// Set when the declared face could not be used at all.
    problem: Option<FallbackReason>,
}

/// Output of drawing one record.
#[derive(Debug)]
pub(crate) struct DrawnRecord {
    pub bytes: Vec<u8>,
    pub warnings: Vec<RenderWarning>,
    pub fields_drawn: u32,
}

/// A template document with fonts installed, ready to be stamped per record.
#[derive(Debug)]
pub(crate) struct PreparedPage {
    doc: LopdfDocument,
    page_id: ObjectId,
    page_box: PageBox,
    slots: HashMap<(String, FontWeight), FontSlot>,
    fallback: FontSlot,
    scale: f32,
    compress: bool,
}

impl PreparedPage {
    /// Parse the template and install every font `fields` reference.
    pub fn prepare(
        template: &Template,
        fields: &[Field],
        catalog: &FontCatalog,
        scale: f32,
        compress: bool,
    ) -> Result<Self> {
        let mut doc = LopdfDocument::load_mem(template.bytes()).map_err(Error::fatal)?;
        let pages = doc.get_pages();
        if pages.len() != 1 {
            return Err(Error::FatalRender(format!(
                "template must have exactly one page, found {}",
                pages.len()
            )));
        }
        let page_id = pages
            .values()
            .next()
            .copied()
            .ok_or_else(|| Error::FatalRender("template has no pages".to_string()))?;

        let mut fonts: Vec<(String, ObjectId)> = Vec::new();
        let fallback_face = ResolvedFace::fallback();
        let fallback_id = install_font(&mut doc, &fallback_face, compress)?;
        fonts.push((FALLBACK_RESOURCE.to_string(), fallback_id));
        let fallback = FontSlot {
            resource: FALLBACK_RESOURCE.to_string(),
            face: fallback_face,
            problem: None,
        };

        // Loaded faces are shared between weights declaring the same source.
        let mut installed: HashMap<FaceSource, (String, ResolvedFace)> = HashMap::new();
        let mut slots = HashMap::new();
        for field in fields {
            let key = (field.font_family.clone(), field.font_weight);
            if slots.contains_key(&key) {
                continue;
            }
            let slot = match catalog.face(&field.font_family, field.font_weight) {
                None => FontSlot {
                    problem: Some(FallbackReason::FaceNotInCatalog),
                    ..fallback.clone()
                },
                Some(source) => match installed.get(source) {
                    Some((resource, face)) => FontSlot {
                        resource: resource.clone(),
                        face: face.clone(),
                        problem: None,
                    },
                    None => match resolve_face(source) {
                        Ok(face) => {
                            let resource = format!("CgF{}", installed.len());
                            let id = install_font(&mut doc, &face, compress)?;
                            fonts.push((resource.clone(), id));
                            installed.insert(source.clone(), (resource.clone(), face.clone()));
                            FontSlot {
                                resource,
                                face,
                                problem: None,
                            }
                        }
                        Err(e) => {
                            log::warn!(
                                "Face for {} {} unavailable, using {}: {}",
                                field.font_family,
                                field.font_weight,
                                fallback.face.base_font(),
                                e
                            );
                            FontSlot {
                                problem: Some(FallbackReason::FaceUnavailable {
                                    detail: e.to_string(),
                                }),
                                ..fallback.clone()
                            }
                        }
                    },
                },
            };
            slots.insert(key, slot);
        }

        register_fonts(&mut doc, page_id, &fonts)?;
        wrap_contents(&mut doc, page_id, compress)?;

        Ok(Self {
            doc,
            page_id,
            page_box: template.page_box(),
            slots,
            fallback,
            scale,
            compress,
        })
    }

    /// Draw `fields` with the values of `record` and serialize the result.
    pub fn draw(&self, record_index: usize, record: &Record, fields: &[Field]) -> Result<DrawnRecord> {
        let mut operations = vec![Operation::new("g", vec![Object::Integer(0)])];
        let mut warnings = Vec::new();
        let mut fields_drawn = 0;

        for field in fields {
            let value = record.get(&field.column).unwrap_or_default();
            if value.is_empty() {
                continue;
            }

            let slot = self
                .slots
                .get(&(field.font_family.clone(), field.font_weight))
                .unwrap_or(&self.fallback);
            let reason = match &slot.problem {
                Some(problem) => Some(problem.clone()),
                None => {
                    let missing = slot.face.missing_chars(value);
                    (!missing.is_empty()).then_some(FallbackReason::MissingGlyphs { chars: missing })
                }
            };
            let resource = match reason {
                Some(reason) => {
                    warnings.push(RenderWarning {
                        kind: WarningKind::PartialRender,
                        record_index,
                        field_id: field.id,
                        column: field.column.clone(),
                        reason,
                    });
                    &self.fallback.resource
                }
                None => &slot.resource,
            };

            let size = field.font_size_pt * self.scale;
            let (x, top) = self
                .page_box
                .to_user_space(field.x * self.scale, field.y * self.scale);
            let y = top - ASCENT_RATIO * size;
            let text = encoding::encode(value);

            operations.extend([
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec![resource.as_str().into(), size.into()]),
                Operation::new("Td", vec![x.into(), y.into()]),
                Operation::new("Tj", vec![Object::string_literal(text.bytes)]),
                Operation::new("ET", vec![]),
            ]);
            fields_drawn += 1;
        }

        let mut doc = self.doc.clone();
        let content = Content { operations }
            .encode()
            .map_err(|e| Error::FatalRender(format!("content encoding failed: {}", e)))?;
        let stream_id = doc.add_object(content_stream(content, self.compress)?);
        doc.get_dictionary_mut(self.page_id)
            .and_then(|page| page.get_mut(b"Contents"))
            .and_then(|contents| contents.as_array_mut())
            .map_err(Error::fatal)?
            .push(Object::Reference(stream_id));

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| Error::FatalRender(format!("record {}: {}", record_index, e)))?;

        Ok(DrawnRecord {
            bytes,
            warnings,
            fields_drawn,
        })
    }
}

fn resolve_face(source: &FaceSource) -> Result<ResolvedFace> {
    match source {
        FaceSource::Standard { base_font } => Ok(ResolvedFace::Standard(base_font.clone())),
        FaceSource::TrueType { path } => {
            let face = TrueTypeFace::load(path)?;
            Ok(ResolvedFace::TrueType(Arc::new(face)))
        }
    }
}

/// Add a font dictionary (and for TrueType, its descriptor and program).
fn install_font(doc: &mut LopdfDocument, face: &ResolvedFace, compress: bool) -> Result<ObjectId> {
    let base_font = Object::Name(face.base_font().as_bytes().to_vec());
    match face {
        ResolvedFace::Standard(_) => Ok(doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => base_font,
            "Encoding" => "WinAnsiEncoding",
        })),
        ResolvedFace::TrueType(tt) => {
            let metrics = tt.metrics();
            let mut program = content_stream(tt.data().to_vec(), compress)?;
            program
                .dict
                .set("Length1", Object::Integer(tt.data().len() as i64));
            let program_id = doc.add_object(program);

            let descriptor_id = doc.add_object(dictionary! {
                "Type" => "FontDescriptor",
                "FontName" => base_font.clone(),
                "Flags" => FLAG_NONSYMBOLIC,
                "FontBBox" => vec![
                    Object::Integer(0),
                    metrics.descent.into(),
                    Object::Integer(1000),
                    metrics.ascent.into(),
                ],
                "ItalicAngle" => Object::Integer(0),
                "Ascent" => metrics.ascent,
                "Descent" => metrics.descent,
                "CapHeight" => metrics.cap_height,
                "StemV" => Object::Integer(80),
                "FontFile2" => program_id,
            });

            let widths: Vec<Object> = metrics.widths.iter().map(|w| (*w).into()).collect();
            Ok(doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "TrueType",
                "BaseFont" => base_font,
                "FirstChar" => FIRST_CHAR as i64,
                "LastChar" => LAST_CHAR as i64,
                "Widths" => widths,
                "FontDescriptor" => descriptor_id,
                "Encoding" => "WinAnsiEncoding",
            }))
        }
    }
}

/// Merge `fonts` into the page's font resources.
///
/// Referenced Resources and Font dictionaries are copied inline so the
/// template's shared objects are left untouched.
fn register_fonts(doc: &mut LopdfDocument, page_id: ObjectId, fonts: &[(String, ObjectId)]) -> Result<()> {
    let current = doc
        .get_dictionary(page_id)
        .map_err(Error::fatal)?
        .get(b"Resources")
        .ok()
        .cloned();
    let mut resources = owned_dictionary(doc, current)?;
    let mut font_dict = owned_dictionary(doc, resources.get(b"Font").ok().cloned())?;
    for (name, id) in fonts {
        font_dict.set(name.as_bytes().to_vec(), Object::Reference(*id));
    }
    resources.set("Font", Object::Dictionary(font_dict));
    doc.get_dictionary_mut(page_id)
        .map_err(Error::fatal)?
        .set("Resources", Object::Dictionary(resources));
    Ok(())
}

fn owned_dictionary(doc: &LopdfDocument, obj: Option<Object>) -> Result<Dictionary> {
    match obj {
        Some(Object::Reference(id)) => doc
            .get_dictionary(id)
            .cloned()
            .map_err(Error::fatal),
        Some(Object::Dictionary(dict)) => Ok(dict),
        _ => Ok(Dictionary::new()),
    }
}

/// Normalize `/Contents` to an array and bracket it with `q` ... `Q`.
fn wrap_contents(doc: &mut LopdfDocument, page_id: ObjectId, compress: bool) -> Result<()> {
    let current = doc
        .get_dictionary(page_id)
        .map_err(Error::fatal)?
        .get(b"Contents")
        .ok()
        .cloned();
    let existing = match current {
        Some(Object::Array(items)) => items,
        Some(Object::Reference(id)) => match doc.get_object(id) {
            Ok(Object::Array(items)) => items.clone(),
            _ => vec![Object::Reference(id)],
        },
        Some(stream @ Object::Stream(_)) => vec![Object::Reference(doc.add_object(stream))],
        _ => Vec::new(),
    };

    let open = doc.add_object(content_stream(b"q\n".to_vec(), compress)?);
    let close = doc.add_object(content_stream(b"\nQ\n".to_vec(), compress)?);
    let mut contents = Vec::with_capacity(existing.len() + 2);
    contents.push(Object::Reference(open));
    contents.extend(existing);
    contents.push(Object::Reference(close));

    doc.get_dictionary_mut(page_id)
        .map_err(Error::fatal)?
        .set("Contents", Object::Array(contents));
    Ok(())
}

/// Build a stream, deflating the payload when `compress` is set.
fn content_stream(data: Vec<u8>, compress: bool) -> Result<Stream> {
    if !compress {
        return Ok(Stream::new(Dictionary::new(), data));
    }
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&data)?;
    let deflated = encoder.finish()?;
    Ok(Stream::new(dictionary! { "Filter" => "FlateDecode" }, deflated))
}
