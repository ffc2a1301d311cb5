//! Shared helpers for integration tests.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};

/// Build a template PDF with `pages` US Letter pages.
///
/// MediaBox and Resources live on the page tree node so ingestion has to
/// flatten inherited attributes.
pub fn template_pdf(pages: usize) -> Vec<u8> {
    template_pdf_with_media_box(pages, [0, 0, 612, 792])
}

/// Build a template PDF whose pages share `media_box`.
pub fn template_pdf_with_media_box(pages: usize, media_box: [i64; 4]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for i in 0..pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), Object::Integer(24)]),
                Operation::new("Td", vec![Object::Integer(50), Object::Integer(50)]),
                Operation::new(
                    "Tj",
                    vec![Object::string_literal(format!("Background {}", i + 1))],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(pages as i64),
            "Resources" => resources_id,
            "MediaBox" => media_box.iter().map(|v| Object::Integer(*v)).collect::<Vec<_>>(),
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// A text show operation found in a rendered page.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawnText {
    pub font: String,
    pub size: f32,
    pub x: f32,
    pub y: f32,
    pub text: Vec<u8>,
}

impl DrawnText {
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.text).into_owned()
    }
}

fn single_page(bytes: &[u8]) -> (Document, lopdf::ObjectId) {
    let doc = Document::load_mem(bytes).unwrap();
    let pages = doc.get_pages();
    assert_eq!(pages.len(), 1, "rendered document must have one page");
    let page_id = *pages.values().next().unwrap();
    (doc, page_id)
}

/// All operations of the page, in drawing order.
pub fn page_operations(bytes: &[u8]) -> Vec<Operation> {
    let (doc, page_id) = single_page(bytes);
    let content = doc.get_page_content(page_id).unwrap();
    Content::decode(&content).unwrap().operations
}

/// Text drawn with fonts installed by the renderer.
pub fn drawn_text(bytes: &[u8]) -> Vec<DrawnText> {
    let mut out = Vec::new();
    let mut font = String::new();
    let mut size = 0.0;
    let mut pos = (0.0, 0.0);
    for op in page_operations(bytes) {
        match op.operator.as_str() {
            "Tf" => {
                font = String::from_utf8_lossy(op.operands[0].as_name().unwrap()).into_owned();
                size = op.operands[1].as_float().unwrap();
            }
            "Td" => {
                pos = (
                    op.operands[0].as_float().unwrap(),
                    op.operands[1].as_float().unwrap(),
                );
            }
            "Tj" if font.starts_with("CgF") => {
                if let Object::String(ref text, _) = op.operands[0] {
                    out.push(DrawnText {
                        font: font.clone(),
                        size,
                        x: pos.0,
                        y: pos.1,
                        text: text.clone(),
                    });
                }
            }
            _ => {}
        }
    }
    out
}

/// The font dictionary behind a font resource on the rendered page,
/// together with the document it lives in.
pub fn font_dictionary(bytes: &[u8], resource: &str) -> (Document, Dictionary) {
    let (doc, page_id) = single_page(bytes);
    let page = doc.get_dictionary(page_id).unwrap();
    let resources = match page.get(b"Resources").unwrap() {
        Object::Reference(id) => doc.get_dictionary(*id).unwrap(),
        Object::Dictionary(dict) => dict,
        other => panic!("unexpected resources {:?}", other),
    };
    let fonts = match resources.get(b"Font").unwrap() {
        Object::Reference(id) => doc.get_dictionary(*id).unwrap(),
        Object::Dictionary(dict) => dict,
        other => panic!("unexpected font dict {:?}", other),
    };
    let font_id = fonts
        .get(resource.as_bytes())
        .unwrap()
        .as_reference()
        .unwrap();
    let font = doc.get_dictionary(font_id).unwrap().clone();
    (doc, font)
}

/// BaseFont of a font resource on the rendered page.
pub fn base_font(bytes: &[u8], resource: &str) -> String {
    let (_, font) = font_dictionary(bytes, resource);
    String::from_utf8_lossy(font.get(b"BaseFont").unwrap().as_name().unwrap()).into_owned()
}

/// Path of a file under `tests/fixtures`.
pub fn fixture(name: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 0.01
}
