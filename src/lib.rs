//! # certgen
//!
//! Certificate generation from a single-page PDF template and a roster.
//!
//! A roster (delimited text, one recipient per line) and a template PDF are
//! loaded, text fields bound to roster columns are placed on the template,
//! and one PDF per roster record is rendered with the record's values drawn
//! into the fields.
//!
//! ## Quick Start
//!
//! ```no_run
//! use certgen::{
//!     ingest_template, parse_roster, BatchRenderer, FieldSpec, FontCatalog, FontWeight,
//!     LayoutSession, RenderOptions,
//! };
//!
//! fn main() -> certgen::Result<()> {
//!     let template = ingest_template(&std::fs::read("certificate.pdf")?)?;
//!     let roster = parse_roster("Name,Email\nAda,ada@x.com")?;
//!
//!     let mut session = LayoutSession::new(FontCatalog::builtin());
//!     session.load_template(template);
//!     session.load_roster(roster);
//!     session.add_field(FieldSpec::new("Name", "sans", FontWeight::REGULAR, 14.0).at(100.0, 100.0))?;
//!
//!     let renderer = BatchRenderer::new(FontCatalog::builtin(), RenderOptions::default());
//!     let output = renderer.render_snapshot(&session.snapshot()?)?;
//!     for warning in &output.warnings {
//!         eprintln!("{}", warning);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Template normalization**: uploads are reduced to their first page
//! - **Font catalog**: standard PDF fonts and embedded TrueType faces
//! - **Font fallback**: unsupported characters are reported, not fatal
//! - **Parallel rendering**: records fan out over a Rayon pool in order
//! - **Storage and export**: upload store, request payloads, file export

pub mod deliver;
pub mod detect;
pub mod error;
pub mod fonts;
pub mod job;
pub mod layout;
pub mod model;
mod naming;
pub mod parser;
pub mod render;
pub mod store;

// Re-export commonly used types
pub use detect::{detect_format_from_bytes, is_pdf_bytes, PdfFormat};
pub use error::{Error, ErrorKind, Result};
pub use fonts::{FaceSource, FontCatalog, FontFamily, FontWeight};
pub use layout::{LayoutSession, LayoutSnapshot, ReloadReport, SessionState};
pub use model::{Field, FieldId, FieldSpec, GeneratedDocument, PageBox, Record, Roster, Template};
pub use parser::{ingest_template, RosterOptions, RosterParser};
pub use render::{
    BatchEvent, BatchOutput, BatchRenderer, BatchStats, CancellationToken, FallbackReason,
    RenderOptions, RenderWarning, WarningKind,
};

use std::path::Path;

/// Parse roster text with the default options.
///
/// # Example
///
/// ```
/// let roster = certgen::parse_roster("Name,Email\nAda,ada@x.com").unwrap();
/// assert_eq!(roster.headers(), ["Name", "Email"]);
/// assert_eq!(roster.records()[0].get("Name"), Some("Ada"));
/// ```
pub fn parse_roster(text: &str) -> Result<Roster> {
    RosterParser::new().parse(text)
}

/// Parse roster bytes; non-UTF-8 input is rejected.
pub fn parse_roster_bytes(data: &[u8]) -> Result<Roster> {
    RosterParser::new().parse_bytes(data)
}

/// Read and parse a roster file.
pub fn parse_roster_file<P: AsRef<Path>>(path: P) -> Result<Roster> {
    let data = std::fs::read(path)?;
    parse_roster_bytes(&data)
}

/// Read and normalize a template file.
///
/// # Example
///
/// ```no_run
/// let template = certgen::ingest_template_file("certificate.pdf").unwrap();
/// println!("{} x {} pt", template.width(), template.height());
/// ```
pub fn ingest_template_file<P: AsRef<Path>>(path: P) -> Result<Template> {
    let data = std::fs::read(path)?;
    ingest_template(&data)
}

/// Place `fields` and render every record in one call.
///
/// Equivalent to driving a [`LayoutSession`] and a [`BatchRenderer`] with
/// the same catalog.
pub fn generate(
    template: Template,
    roster: Roster,
    fields: impl IntoIterator<Item = FieldSpec>,
    catalog: FontCatalog,
    options: RenderOptions,
) -> Result<BatchOutput> {
    let catalog = std::sync::Arc::new(catalog);
    let mut session = LayoutSession::new(std::sync::Arc::clone(&catalog));
    session.load_template(template);
    session.load_roster(roster);
    for spec in fields {
        session.add_field(spec)?;
    }
    BatchRenderer::new(catalog, options).render_snapshot(&session.snapshot()?)
}
