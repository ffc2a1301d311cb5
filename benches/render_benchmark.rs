//! Benchmarks for certgen roster parsing and batch rendering.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};

use certgen::{
    generate, ingest_template, parse_roster, FieldSpec, FontCatalog, FontWeight, RenderOptions,
};

/// Creates a single-page US Letter template with some background text.
fn create_template() -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Times-Roman",
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), Object::Integer(36)]),
            Operation::new("Td", vec![Object::Integer(150), Object::Integer(650)]),
            Operation::new("Tj", vec![Object::string_literal("Certificate of Completion")]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(
        Dictionary::new(),
        content.encode().unwrap(),
    ));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(612),
            Object::Integer(792),
        ],
        "Resources" => dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        },
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => Object::Integer(1),
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

/// Creates roster text with `count` records.
fn create_roster(count: usize) -> String {
    let mut text = String::from("Name,Email,Course\n");
    for i in 0..count {
        text.push_str(&format!(
            "Participant {},p{}@example.com,Course {}\n",
            i,
            i,
            i % 7
        ));
    }
    text
}

fn fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new("Name", "serif", FontWeight::BOLD, 28.0).at(150.0, 250.0),
        FieldSpec::new("Course", "sans", FontWeight::REGULAR, 14.0).at(150.0, 320.0),
    ]
}

/// Benchmark roster parsing at various sizes.
fn bench_roster_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("roster_parsing");

    for count in [10, 100, 1000].iter() {
        let text = create_roster(*count);
        group.bench_function(format!("{}_records", count), |b| {
            b.iter(|| parse_roster(black_box(&text)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark template ingestion.
fn bench_template_ingest(c: &mut Criterion) {
    let data = create_template();
    c.bench_function("ingest_template", |b| {
        b.iter(|| ingest_template(black_box(&data)).unwrap());
    });
}

/// Benchmark batch rendering, sequential and parallel.
fn bench_batch_render(c: &mut Criterion) {
    let template = ingest_template(&create_template()).unwrap();
    let roster = parse_roster(&create_roster(50)).unwrap();
    let mut group = c.benchmark_group("batch_render");
    group.sample_size(20);

    for (label, workers) in [("sequential", 1), ("parallel", 0)] {
        group.bench_function(format!("50_records_{}", label), |b| {
            b.iter(|| {
                generate(
                    template.clone(),
                    roster.clone(),
                    fields(),
                    FontCatalog::builtin(),
                    RenderOptions::new().with_workers(workers),
                )
                .unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_roster_parsing,
    bench_template_ingest,
    bench_batch_render,
);
criterion_main!(benches);
