//! Integration tests for uploads, generation requests and export.

mod common;

use common::{drawn_text, template_pdf};
use std::fs;
use tempfile::TempDir;

use certgen::deliver::{DeliveryReport, DirectoryExporter, Dispatcher, MANIFEST_FILE};
use certgen::job::{GenerationJob, GenerationRequest};
use certgen::store::{upload, AssetKind, AssetStore, DirectoryStore, MemoryStore};
use certgen::{ingest_template, Error, FontCatalog, FontWeight, RenderOptions};

const ROSTER: &[u8] = b"Name,Email\nAda,ada@x.com\nGrace,\n";

fn request_json(csv: &str, certificate: &str, extra: &str) -> String {
    format!(
        r#"{{
            "csvFilename": "{}",
            "certificateFilename": "{}",
            "fields": [
                {{"csvColumn": "Name", "x": 100, "y": 100, "fontSize": 14}},
                {{"csvColumn": "Email", "x": 100, "y": 140, "fontSize": 9,
                  "fontFamily": "font-mono", "fontWeight": 700}}
            ]{}
        }}"#,
        csv, certificate, extra
    )
}

#[test]
fn test_template_upload_stores_first_page_only() {
    let dir = TempDir::new().unwrap();
    let store = DirectoryStore::open(dir.path()).unwrap();

    let asset = upload(&store, AssetKind::Template, "award.pdf", &template_pdf(3)).unwrap();
    assert!(asset.name.ends_with("-award.pdf"));
    assert!(dir.path().join("certificate").join(&asset.name).is_file());

    let stored = store.get(&asset).unwrap();
    assert_eq!(stored.len() as u64, asset.size);
    let template = ingest_template(&stored).unwrap();
    assert_eq!(template.source_page_count(), 1);
}

#[test]
fn test_roster_bytes_are_kept_exactly() {
    let dir = TempDir::new().unwrap();
    let store = DirectoryStore::open(dir.path()).unwrap();

    let data = b"\xEF\xBB\xBFName\r\nAda\r\n";
    let asset = upload(&store, AssetKind::Roster, "people.csv", data).unwrap();
    assert_eq!(store.get(&asset).unwrap(), data);
    assert!(dir.path().join("csv").join(&asset.name).is_file());
}

#[test]
fn test_reupload_replaces_previous_asset() {
    let dir = TempDir::new().unwrap();
    let store = DirectoryStore::open(dir.path()).unwrap();

    let first = upload(&store, AssetKind::Roster, "a.csv", b"Name\nAda").unwrap();
    std::thread::sleep(std::time::Duration::from_millis(2));
    let second = upload(&store, AssetKind::Roster, "b.csv", b"Name\nGrace").unwrap();

    let listed = store.list(AssetKind::Roster).unwrap();
    assert_eq!(listed, vec![second.clone()]);
    assert_eq!(store.latest(AssetKind::Roster).unwrap(), Some(second));
    assert!(matches!(
        store.find(AssetKind::Roster, &first.name),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn test_invalid_upload_keeps_previous_asset() {
    let store = MemoryStore::new();
    let good = upload(&store, AssetKind::Template, "a.pdf", &template_pdf(1)).unwrap();
    let err = upload(&store, AssetKind::Template, "b.pdf", b"not a pdf").unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat(_)));
    assert_eq!(store.list(AssetKind::Template).unwrap(), vec![good]);
}

#[test]
fn test_job_resolves_defaults() {
    let store = MemoryStore::new();
    let roster = upload(&store, AssetKind::Roster, "r.csv", ROSTER).unwrap();
    let template = upload(&store, AssetKind::Template, "t.pdf", &template_pdf(1)).unwrap();

    let request =
        GenerationRequest::from_json(&request_json(&roster.name, &template.name, "")).unwrap();
    let job = GenerationJob::resolve(&store, FontCatalog::builtin(), &request).unwrap();

    let fields = &job.snapshot().fields;
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0].font_family, "sans");
    assert_eq!(fields[0].font_weight, FontWeight::THIN);
    assert_eq!(fields[1].font_family, "mono");
    assert_eq!(fields[1].font_weight, FontWeight::BOLD);
    assert_eq!(job.email_column(), Some("Email"));
}

#[test]
fn test_job_accepts_web_font_class_names() {
    let store = MemoryStore::new();
    let roster = upload(&store, AssetKind::Roster, "r.csv", ROSTER).unwrap();
    let template = upload(&store, AssetKind::Template, "t.pdf", &template_pdf(1)).unwrap();

    let cases = [
        ("font-inter-sans", 400, "inter"),
        ("font-roboto", 100, "roboto"),
        ("font-great-vibes", 400, "great-vibes"),
        ("font-montserrat", 900, "montserrat"),
        ("font-playfair", 600, "playfair-display"),
        ("inter", 400, "inter"),
    ];
    for (class, weight, id) in cases {
        let json = format!(
            r#"{{
                "csvFilename": "{}",
                "certificateFilename": "{}",
                "fields": [{{"csvColumn": "Name", "x": 10, "y": 10, "fontSize": 14,
                             "fontFamily": "{}", "fontWeight": "{}"}}]
            }}"#,
            roster.name, template.name, class, weight
        );
        let request = GenerationRequest::from_json(&json).unwrap();
        let job = GenerationJob::resolve(&store, FontCatalog::builtin(), &request).unwrap();
        let field = &job.snapshot().fields[0];
        assert_eq!(field.font_family, id, "{}", class);
        assert_eq!(field.font_weight.value(), weight);

        let output = job.render(RenderOptions::default()).unwrap();
        assert!(!output.has_warnings(), "{}", class);
    }

    let json = format!(
        r#"{{"csvFilename": "{}", "certificateFilename": "{}",
             "fields": [{{"csvColumn": "Name", "x": 0, "y": 0, "fontSize": 14,
                          "fontFamily": "font-great-vibes", "fontWeight": 700}}]}}"#,
        roster.name, template.name
    );
    let request = GenerationRequest::from_json(&json).unwrap();
    assert!(matches!(
        GenerationJob::resolve(&store, FontCatalog::builtin(), &request),
        Err(Error::InvalidTypography(_))
    ));
}

#[test]
fn test_stored_reference_matches_listing() {
    let dir = TempDir::new().unwrap();
    let store = DirectoryStore::open(dir.path()).unwrap();
    let stored = upload(&store, AssetKind::Roster, "r.csv", ROSTER).unwrap();

    assert_eq!(store.find(AssetKind::Roster, &stored.name).unwrap(), stored);
    assert_eq!(store.latest(AssetKind::Roster).unwrap(), Some(stored.clone()));
    assert_eq!(stored.stored_at.timestamp_subsec_nanos() % 1_000_000, 0);
}

#[test]
fn test_job_rejects_unknown_email_column() {
    let store = MemoryStore::new();
    let roster = upload(&store, AssetKind::Roster, "r.csv", ROSTER).unwrap();
    let template = upload(&store, AssetKind::Template, "t.pdf", &template_pdf(1)).unwrap();

    let json = request_json(&roster.name, &template.name, r#", "emailColumn": "Mail""#);
    let request = GenerationRequest::from_json(&json).unwrap();
    let err = GenerationJob::resolve(&store, FontCatalog::builtin(), &request).unwrap_err();
    assert!(matches!(err, Error::InvalidColumn(ref c) if c == "Mail"));
}

#[test]
fn test_job_rejects_unknown_assets_and_columns() {
    let store = MemoryStore::new();
    let roster = upload(&store, AssetKind::Roster, "r.csv", b"Name\nAda").unwrap();
    let template = upload(&store, AssetKind::Template, "t.pdf", &template_pdf(1)).unwrap();

    let request =
        GenerationRequest::from_json(&request_json("1-missing.csv", &template.name, "")).unwrap();
    assert!(matches!(
        GenerationJob::resolve(&store, FontCatalog::builtin(), &request),
        Err(Error::NotFound(_))
    ));

    let request =
        GenerationRequest::from_json(&request_json(&roster.name, &template.name, "")).unwrap();
    assert!(matches!(
        GenerationJob::resolve(&store, FontCatalog::builtin(), &request),
        Err(Error::InvalidColumn(ref c)) if c == "Email"
    ));
}

#[test]
fn test_generate_and_export() {
    let store_dir = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    let store = DirectoryStore::open(store_dir.path()).unwrap();
    let roster = upload(&store, AssetKind::Roster, "r.csv", ROSTER).unwrap();
    let template = upload(&store, AssetKind::Template, "t.pdf", &template_pdf(2)).unwrap();

    let request =
        GenerationRequest::from_json(&request_json(&roster.name, &template.name, "")).unwrap();
    let job = GenerationJob::resolve(&store, FontCatalog::builtin(), &request).unwrap();
    let output = job.render(RenderOptions::new().with_workers(2)).unwrap();
    assert_eq!(output.len(), 2);

    let report = DirectoryExporter::new(out_dir.path())
        .dispatch(&output)
        .unwrap();
    assert_eq!(report.count, 2);
    assert_eq!(report.documents[0].file, "certificate-0001-ada@x.com.pdf");
    assert_eq!(report.documents[1].file, "certificate-0002.pdf");
    assert_eq!(report.unaddressed().count(), 1);

    let first = fs::read(out_dir.path().join(&report.documents[0].file)).unwrap();
    let texts: Vec<String> = drawn_text(&first).iter().map(|d| d.text_lossy()).collect();
    assert_eq!(texts, ["Ada", "ada@x.com"]);

    let second = fs::read(out_dir.path().join(&report.documents[1].file)).unwrap();
    let texts: Vec<String> = drawn_text(&second).iter().map(|d| d.text_lossy()).collect();
    assert_eq!(texts, ["Grace"]);

    let manifest_path = out_dir.path().join(MANIFEST_FILE);
    assert_eq!(report.manifest_path.as_deref(), Some(manifest_path.as_path()));
    let manifest: DeliveryReport =
        serde_json::from_slice(&fs::read(&manifest_path).unwrap()).unwrap();
    assert_eq!(manifest.count, 2);
    assert_eq!(manifest.documents, report.documents);
}

#[test]
fn test_export_without_manifest() {
    let out_dir = TempDir::new().unwrap();
    let store = MemoryStore::new();
    let roster = upload(&store, AssetKind::Roster, "r.csv", ROSTER).unwrap();
    let template = upload(&store, AssetKind::Template, "t.pdf", &template_pdf(1)).unwrap();
    let request =
        GenerationRequest::from_json(&request_json(&roster.name, &template.name, "")).unwrap();
    let output = GenerationJob::resolve(&store, FontCatalog::builtin(), &request)
        .unwrap()
        .render(RenderOptions::default())
        .unwrap();

    let report = DirectoryExporter::new(out_dir.path())
        .without_manifest()
        .dispatch(&output)
        .unwrap();
    assert!(report.manifest_path.is_none());
    assert!(!out_dir.path().join(MANIFEST_FILE).exists());
}
