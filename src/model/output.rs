//! Rendered output types.

use serde::{Deserialize, Serialize};

/// One rendered, recipient-specific document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedDocument {
    /// Index of the roster record this document was rendered from
    pub record_index: usize,

    /// The PDF bytes
    #[serde(skip)]
    pub bytes: Vec<u8>,

    /// Recipient e-mail, when an e-mail column was configured
    pub recipient_email: Option<String>,

    /// Whether any field fell back to the substitute font
    pub fallback_used: bool,
}

impl GeneratedDocument {
    /// Size of the rendered PDF in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the document has no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
