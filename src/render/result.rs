//! Batch result with warnings and statistics.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::{FieldId, GeneratedDocument};

/// Result of rendering a batch: one document per roster record, in roster
/// order, plus any non-fatal warnings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchOutput {
    /// Rendered documents, `documents[i]` belongs to record `i`
    pub documents: Vec<GeneratedDocument>,

    /// Per-field fallback warnings, ordered by record then field
    pub warnings: Vec<RenderWarning>,

    /// Batch statistics
    pub stats: BatchStats,
}

impl BatchOutput {
    /// Number of rendered documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Check if the batch produced no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Check if any field fell back to the substitute font.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Warnings raised while rendering `record_index`.
    pub fn warnings_for(&self, record_index: usize) -> impl Iterator<Item = &RenderWarning> {
        self.warnings
            .iter()
            .filter(move |w| w.record_index == record_index)
    }
}

/// Classification of a render warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// A field was drawn with the fallback font.
    PartialRender,
}

/// Why a field was drawn with the fallback font.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum FallbackReason {
    /// The catalog has no face for the field's family and weight.
    FaceNotInCatalog,

    /// The declared face could not be loaded.
    FaceUnavailable {
        /// Loader error
        detail: String,
    },

    /// The face lacks glyphs for some characters of the value.
    MissingGlyphs {
        /// Characters without a glyph, in order of first appearance
        chars: Vec<char>,
    },
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::FaceNotInCatalog => f.write_str("face not in catalog"),
            FallbackReason::FaceUnavailable { detail } => {
                write!(f, "face unavailable ({})", detail)
            }
            FallbackReason::MissingGlyphs { chars } => {
                let list: String = chars.iter().collect();
                write!(f, "missing glyphs for {:?}", list)
            }
        }
    }
}

/// A non-fatal problem with one field of one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderWarning {
    pub kind: WarningKind,
    pub record_index: usize,
    pub field_id: FieldId,
    pub column: String,
    pub reason: FallbackReason,
}

impl fmt::Display for RenderWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "record {}: {} ('{}') drawn with fallback font: {}",
            self.record_index, self.field_id, self.column, self.reason
        )
    }
}

/// Statistics collected while rendering a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    /// Number of records rendered
    pub record_count: u32,

    /// Number of non-empty field values drawn
    pub fields_drawn: u32,

    /// Number of fields drawn with the fallback font
    pub fallback_count: u32,

    /// Total size of the rendered documents in bytes
    pub total_bytes: u64,

    /// Wall-clock time of the batch in milliseconds
    pub elapsed_ms: u64,
}

impl BatchStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one rendered document.
    pub fn add_document(&mut self, bytes: usize, fields_drawn: u32, fallbacks: u32) {
        self.record_count += 1;
        self.total_bytes += bytes as u64;
        self.fields_drawn += fields_drawn;
        self.fallback_count += fallbacks;
    }

    /// Merge statistics from another batch.
    pub fn merge(&mut self, other: &BatchStats) {
        self.record_count += other.record_count;
        self.fields_drawn += other.fields_drawn;
        self.fallback_count += other.fallback_count;
        self.total_bytes += other.total_bytes;
        self.elapsed_ms += other.elapsed_ms;
    }
}
