//! Delivery of generated documents.
//!
//! A [`Dispatcher`] hands a finished batch to its recipients. The crate
//! ships [`DirectoryExporter`], which writes one file per document plus a
//! `manifest.json` pairing each file with its recipient.

mod exporter;

pub use exporter::{DirectoryExporter, MANIFEST_FILE};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Result;
use crate::render::BatchOutput;

/// Sends or stores the documents of a batch.
pub trait Dispatcher {
    /// Deliver every document of `output`.
    fn dispatch(&self, output: &BatchOutput) -> Result<DeliveryReport>;
}

/// One delivered document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryEntry {
    pub record_index: usize,
    /// File name relative to the output directory
    pub file: String,
    pub recipient_email: Option<String>,
    pub fallback_used: bool,
    /// Rendered warning messages for this record
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Outcome of a delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReport {
    pub generated_at: DateTime<Utc>,
    pub count: usize,
    pub documents: Vec<DeliveryEntry>,
    /// Where the manifest was written, if any
    #[serde(skip)]
    pub manifest_path: Option<PathBuf>,
}

impl DeliveryReport {
    /// Documents without a recipient address.
    pub fn unaddressed(&self) -> impl Iterator<Item = &DeliveryEntry> {
        self.documents.iter().filter(|d| d.recipient_email.is_none())
    }
}
