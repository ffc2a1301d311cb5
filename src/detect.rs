//! Upload format detection.

use crate::error::{Error, Result};

/// PDF header information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfFormat {
    /// PDF version (e.g., "1.7", "2.0")
    pub version: String,
}

impl std::fmt::Display for PdfFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PDF {}", self.version)
    }
}

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const PDF_MAGIC_LEN: usize = 5;
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Some producers prepend junk before the header; readers accept it within
/// the first kilobyte.
const HEADER_SEARCH_WINDOW: usize = 1024;

/// Detect the PDF header in uploaded bytes.
///
/// # Returns
/// * `Ok(PdfFormat)` if a `%PDF-x.y` header is found near the start
/// * `Err(Error::UnsupportedFormat)` otherwise
pub fn detect_format_from_bytes(data: &[u8]) -> Result<PdfFormat> {
    let window = &data[..data.len().min(HEADER_SEARCH_WINDOW)];
    let start = window
        .windows(PDF_MAGIC_LEN)
        .position(|w| w == PDF_MAGIC)
        .ok_or_else(|| Error::UnsupportedFormat("missing %PDF- header".to_string()))?;

    let version_start = start + PDF_MAGIC_LEN;
    let version_bytes = data
        .get(version_start..version_start + VERSION_LEN)
        .ok_or_else(|| Error::UnsupportedFormat("truncated PDF header".to_string()))?;
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if !is_valid_version(&version) {
        return Err(Error::UnsupportedFormat(format!(
            "unsupported PDF version '{}'",
            version
        )));
    }

    Ok(PdfFormat { version })
}

fn is_valid_version(version: &str) -> bool {
    let b = version.as_bytes();
    b.len() == 3 && b[0].is_ascii_digit() && b[1] == b'.' && b[2].is_ascii_digit()
}

/// Check if bytes start like a PDF.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_ok()
}

/// Check if a file name looks like a CSV upload.
pub fn is_csv_name(name: &str) -> bool {
    name.to_lowercase().ends_with(".csv")
}

/// Check if a file name looks like a PDF upload.
pub fn is_pdf_name(name: &str) -> bool {
    name.to_lowercase().ends_with(".pdf")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_valid_pdf() {
        let data = b"%PDF-1.7\n%\xe2\xe3\xcf\xd3";
        let format = detect_format_from_bytes(data).unwrap();
        assert_eq!(format.version, "1.7");
        assert_eq!(format.to_string(), "PDF 1.7");
    }

    #[test]
    fn test_detect_with_leading_garbage() {
        let data = b"\x00\x00junk%PDF-1.4\n";
        assert_eq!(detect_format_from_bytes(data).unwrap().version, "1.4");
    }

    #[test]
    fn test_detect_invalid_format() {
        let result = detect_format_from_bytes(b"<!DOCTYPE html>");
        assert!(matches!(result, Err(Error::UnsupportedFormat(_))));
    }

    #[test]
    fn test_detect_too_short() {
        let result = detect_format_from_bytes(b"%PDF-1");
        assert!(matches!(result, Err(Error::UnsupportedFormat(_))));
    }

    #[test]
    fn test_names() {
        assert!(is_csv_name("people.CSV"));
        assert!(!is_csv_name("people.txt"));
        assert!(is_pdf_name("Template.Pdf"));
        assert!(is_pdf_bytes(b"%PDF-2.0\n"));
        assert!(!is_pdf_bytes(b"Not a PDF"));
    }
}
