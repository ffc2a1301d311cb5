//! Export to a directory.

use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};

use super::{DeliveryEntry, DeliveryReport, Dispatcher};
use crate::error::Result;
use crate::model::GeneratedDocument;
use crate::naming::sanitize_file_name;
use crate::render::BatchOutput;

/// Name of the manifest written next to the documents.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Writes `certificate-NNNN[-email].pdf` files and a manifest.
///
/// Each dispatch replaces the previous export: certificates and the
/// manifest left in the directory by an earlier run are removed first.
/// Other files are left alone.
#[derive(Debug, Clone)]
pub struct DirectoryExporter {
    dir: PathBuf,
    write_manifest: bool,
}

impl DirectoryExporter {
    /// Export into `dir`, creating it on first use.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            write_manifest: true,
        }
    }

    /// Skip writing `manifest.json`.
    pub fn without_manifest(mut self) -> Self {
        self.write_manifest = false;
        self
    }

    /// The output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Remove certificates and the manifest of an earlier export.
    fn clear_previous(&self) -> Result<usize> {
        let mut removed = 0;
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            let stale = (name.starts_with("certificate-") && name.ends_with(".pdf"))
                || name == MANIFEST_FILE;
            if stale && entry.file_type()?.is_file() {
                fs::remove_file(entry.path())?;
                removed += 1;
            }
        }
        if removed > 0 {
            log::debug!(
                "Removed {} file(s) of a previous export from {}",
                removed,
                self.dir.display()
            );
        }
        Ok(removed)
    }

    /// File name for a document: 1-based record number, then the recipient.
    pub fn file_name(document: &GeneratedDocument) -> String {
        match document.recipient_email {
            Some(ref email) => format!(
                "certificate-{:04}-{}.pdf",
                document.record_index + 1,
                sanitize_file_name(email)
            ),
            None => format!("certificate-{:04}.pdf", document.record_index + 1),
        }
    }
}

impl Dispatcher for DirectoryExporter {
    fn dispatch(&self, output: &BatchOutput) -> Result<DeliveryReport> {
        fs::create_dir_all(&self.dir)?;
        self.clear_previous()?;

        let mut documents = Vec::with_capacity(output.len());
        for document in &output.documents {
            let file = Self::file_name(document);
            fs::write(self.dir.join(&file), &document.bytes)?;
            log::debug!("Wrote {} ({} bytes)", file, document.len());
            documents.push(DeliveryEntry {
                record_index: document.record_index,
                file,
                recipient_email: document.recipient_email.clone(),
                fallback_used: document.fallback_used,
                warnings: output
                    .warnings_for(document.record_index)
                    .map(|w| w.to_string())
                    .collect(),
            });
        }

        let mut report = DeliveryReport {
            generated_at: Utc::now(),
            count: documents.len(),
            documents,
            manifest_path: None,
        };

        if self.write_manifest {
            let path = self.dir.join(MANIFEST_FILE);
            fs::write(&path, serde_json::to_vec_pretty(&report)?)?;
            report.manifest_path = Some(path);
        }

        log::info!(
            "Exported {} document(s) to {}",
            report.count,
            self.dir.display()
        );
        Ok(report)
    }
}
