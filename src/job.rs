//! Generation requests: a stored roster, a stored template and a list of
//! fields, resolved into a render-ready layout.
//!
//! # Example
//!
//! ```no_run
//! use certgen::job::{GenerationJob, GenerationRequest};
//! use certgen::store::DirectoryStore;
//! use certgen::{FontCatalog, RenderOptions};
//!
//! fn main() -> certgen::Result<()> {
//!     let store = DirectoryStore::open("uploads")?;
//!     let request = GenerationRequest::from_json_file("request.json")?;
//!     let job = GenerationJob::resolve(&store, FontCatalog::builtin(), &request)?;
//!     let output = job.render(RenderOptions::default())?;
//!     println!("{} documents", output.len());
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::fonts::{FontCatalog, FontWeight};
use crate::layout::{LayoutSession, LayoutSnapshot};
use crate::model::FieldSpec;
use crate::parser::{ingest_template, RosterParser};
use crate::render::{BatchOutput, BatchRenderer, RenderOptions};
use crate::store::{AssetKind, AssetStore};

/// Family used when a field request names none.
pub const DEFAULT_FAMILY: &str = "sans";

/// Request payload, in the camelCase shape the upload front end sends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// Stored roster name
    pub csv_filename: String,
    /// Stored template name
    pub certificate_filename: String,
    pub fields: Vec<FieldRequest>,
    /// Column holding recipient e-mails; detected from the headers if absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_column: Option<String>,
}

/// One field of a [`GenerationRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRequest {
    pub csv_column: String,
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
}

impl GenerationRequest {
    /// Parse a request from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a request from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// A request resolved against a store and a font catalog.
#[derive(Debug, Clone)]
pub struct GenerationJob {
    catalog: Arc<FontCatalog>,
    snapshot: LayoutSnapshot,
    email_column: Option<String>,
}

impl GenerationJob {
    /// Load the referenced assets and replay the fields through a
    /// [`LayoutSession`], so every placement rule applies.
    pub fn resolve<S: AssetStore + ?Sized>(
        store: &S,
        catalog: impl Into<Arc<FontCatalog>>,
        request: &GenerationRequest,
    ) -> Result<Self> {
        let catalog = catalog.into();

        let roster_ref = store.find(AssetKind::Roster, &request.csv_filename)?;
        let roster = RosterParser::new().parse_bytes(&store.get(&roster_ref)?)?;
        let template_ref = store.find(AssetKind::Template, &request.certificate_filename)?;
        let template = ingest_template(&store.get(&template_ref)?)?;

        let email_column = match request.email_column {
            Some(ref column) if !roster.has_column(column) => {
                return Err(Error::InvalidColumn(column.clone()));
            }
            Some(ref column) => Some(column.clone()),
            None => roster.email_column().map(str::to_string),
        };

        let mut session = LayoutSession::new(Arc::clone(&catalog));
        session.load_template(template);
        session.load_roster(roster);
        for field in &request.fields {
            let family = resolve_family(&catalog, field.font_family.as_deref())?;
            let weight = match field.font_weight {
                Some(weight) => weight,
                None => catalog.default_weight(&family).ok_or_else(|| {
                    Error::InvalidTypography(format!("family '{}' declares no weights", family))
                })?,
            };
            session.add_field(
                FieldSpec::new(&field.csv_column, family, weight, field.font_size).at(field.x, field.y),
            )?;
        }

        Ok(Self {
            catalog,
            snapshot: session.snapshot()?,
            email_column,
        })
    }

    /// The resolved layout.
    pub fn snapshot(&self) -> &LayoutSnapshot {
        &self.snapshot
    }

    /// The e-mail column the job pairs documents with.
    pub fn email_column(&self) -> Option<&str> {
        self.email_column.as_deref()
    }

    /// Render the job. An e-mail column set in `options` wins over the
    /// request's.
    pub fn render(&self, mut options: RenderOptions) -> Result<BatchOutput> {
        if options.email_column.is_none() {
            options.email_column = self.email_column.clone();
        }
        BatchRenderer::new(Arc::clone(&self.catalog), options).render_snapshot(&self.snapshot)
    }
}

/// Map a requested family to a catalog id.
///
/// Accepts catalog ids, family aliases (the web front end's class names
/// such as `font-inter-sans`) and `font-<id>`.
fn resolve_family(catalog: &FontCatalog, requested: Option<&str>) -> Result<String> {
    let requested = match requested.map(str::trim) {
        None | Some("") => return Ok(DEFAULT_FAMILY.to_string()),
        Some(name) => name,
    };
    catalog
        .family(requested)
        .or_else(|| {
            requested
                .strip_prefix("font-")
                .and_then(|id| catalog.family(id))
        })
        .map(|family| family.id.clone())
        .ok_or_else(|| {
            Error::InvalidTypography(format!("unknown font family '{}'", requested))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_from_camel_case_json() {
        let json = r#"{
            "csvFilename": "1-roster.csv",
            "certificateFilename": "2-cert.pdf",
            "fields": [
                {"csvColumn": "Name", "x": 100, "y": 120.5, "fontSize": 14,
                 "fontFamily": "serif", "fontWeight": "700"},
                {"csvColumn": "Course", "x": 0, "y": 0, "fontSize": 10}
            ]
        }"#;
        let request = GenerationRequest::from_json(json).unwrap();
        assert_eq!(request.fields.len(), 2);
        assert_eq!(request.fields[0].font_weight, Some(FontWeight::BOLD));
        assert_eq!(request.fields[0].y, 120.5);
        assert_eq!(request.fields[1].font_family, None);
        assert!(request.email_column.is_none());
    }

    #[test]
    fn test_resolve_family() {
        let catalog = FontCatalog::builtin();
        assert_eq!(resolve_family(&catalog, None).unwrap(), "sans");
        assert_eq!(resolve_family(&catalog, Some(" ")).unwrap(), "sans");
        assert_eq!(resolve_family(&catalog, Some("serif")).unwrap(), "serif");
        assert_eq!(resolve_family(&catalog, Some("font-mono")).unwrap(), "mono");
        assert_eq!(
            resolve_family(&catalog, Some("font-inter-sans")).unwrap(),
            "inter"
        );
        assert_eq!(
            resolve_family(&catalog, Some("font-playfair")).unwrap(),
            "playfair-display"
        );
        assert_eq!(
            resolve_family(&catalog, Some("great-vibes")).unwrap(),
            "great-vibes"
        );
        assert!(matches!(
            resolve_family(&catalog, Some("font-comic")),
            Err(Error::InvalidTypography(_))
        ));
    }
}
