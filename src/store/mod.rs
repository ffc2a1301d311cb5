//! Persistence of uploaded rosters and templates.
//!
//! Each [`AssetKind`] keeps only its most recent upload: storing a new
//! roster replaces the previous one, and likewise for templates. Stored
//! names are `<unix-millis>-<sanitized original name>`.
//!
//! # Example
//!
//! ```no_run
//! use certgen::store::{upload, AssetKind, AssetStore, DirectoryStore};
//!
//! fn main() -> certgen::Result<()> {
//!     let store = DirectoryStore::open("uploads")?;
//!     let bytes = std::fs::read("roster.csv")?;
//!     let asset = upload(&store, AssetKind::Roster, "roster.csv", &bytes)?;
//!     assert_eq!(store.get(&asset)?, bytes);
//!     Ok(())
//! }
//! ```

mod fs;
mod memory;

pub use fs::DirectoryStore;
pub use memory::MemoryStore;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::detect::{is_csv_name, is_pdf_name};
use crate::error::{Error, Result};
use crate::naming::sanitize_file_name;
use crate::parser::{ingest_template, RosterParser};

/// The two kinds of uploaded inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    /// Delimited roster text
    Roster,
    /// Single-page template PDF
    Template,
}

impl AssetKind {
    /// Directory name used by [`DirectoryStore`].
    pub fn dir_name(&self) -> &'static str {
        match self {
            AssetKind::Roster => "csv",
            AssetKind::Template => "certificate",
        }
    }

    fn accepts_name(&self, name: &str) -> bool {
        match self {
            AssetKind::Roster => is_csv_name(name),
            AssetKind::Template => is_pdf_name(name),
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AssetKind::Roster => "roster",
            AssetKind::Template => "template",
        })
    }
}

/// Reference to a stored asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRef {
    pub kind: AssetKind,
    /// Stored file name, `<unix-millis>-<original name>`
    pub name: String,
    /// Sanitized name the asset was uploaded under
    pub original_name: String,
    /// Size in bytes
    pub size: u64,
    pub stored_at: DateTime<Utc>,
}

impl AssetRef {
    /// `stored_at` is truncated to the millisecond precision the stored
    /// name carries, so the reference equals the one rebuilt by listing.
    pub(crate) fn new(kind: AssetKind, original_name: &str, size: u64, stored_at: DateTime<Utc>) -> Self {
        let original_name = sanitize_file_name(original_name);
        let stored_at = stored_at.trunc_subsecs(3);
        Self {
            kind,
            name: format!("{}-{}", stored_at.timestamp_millis(), original_name),
            original_name,
            size,
            stored_at,
        }
    }

    /// Rebuild a reference from a stored file name.
    pub(crate) fn from_stored_name(kind: AssetKind, name: &str, size: u64) -> Option<Self> {
        let (millis, original) = name.split_once('-')?;
        let stored_at = DateTime::from_timestamp_millis(millis.parse().ok()?)?;
        Some(Self {
            kind,
            name: name.to_string(),
            original_name: original.to_string(),
            size,
            stored_at,
        })
    }
}

/// Storage backend for uploaded assets.
pub trait AssetStore: Send + Sync {
    /// Store `bytes` as the current asset of `kind`, replacing earlier ones.
    fn put(&self, kind: AssetKind, name: &str, bytes: &[u8]) -> Result<AssetRef>;

    /// Fetch the exact bytes of a stored asset.
    fn get(&self, asset: &AssetRef) -> Result<Vec<u8>>;

    /// All stored assets of `kind`, oldest first.
    fn list(&self, kind: AssetKind) -> Result<Vec<AssetRef>>;

    /// The most recent asset of `kind`.
    fn latest(&self, kind: AssetKind) -> Result<Option<AssetRef>> {
        Ok(self.list(kind)?.into_iter().max_by_key(|a| a.stored_at))
    }

    /// Find an asset by its stored name.
    fn find(&self, kind: AssetKind, name: &str) -> Result<AssetRef> {
        self.list(kind)?
            .into_iter()
            .find(|a| a.name == name)
            .ok_or_else(|| Error::NotFound(format!("{} '{}'", kind, name)))
    }
}

/// Validate and store an upload.
///
/// Rosters must parse; templates are normalized to their first page and
/// the normalized bytes are what gets stored. Invalid uploads leave the
/// store untouched.
pub fn upload<S: AssetStore + ?Sized>(
    store: &S,
    kind: AssetKind,
    name: &str,
    bytes: &[u8],
) -> Result<AssetRef> {
    if !kind.accepts_name(name) {
        log::warn!("Storing {} '{}' with an unexpected extension", kind, name);
    }
    let asset = match kind {
        AssetKind::Roster => {
            let roster = RosterParser::new().parse_bytes(bytes)?;
            log::debug!(
                "Roster '{}': {} column(s), {} record(s)",
                name,
                roster.headers().len(),
                roster.len()
            );
            store.put(kind, name, bytes)?
        }
        AssetKind::Template => {
            let template = ingest_template(bytes)?;
            store.put(kind, name, template.bytes())?
        }
    };
    log::info!("Stored {} as {}", kind, asset.name);
    Ok(asset)
}
