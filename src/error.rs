//! Error types for the certgen library.

use std::io;
use thiserror::Error;

/// Result type alias for certgen operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while ingesting inputs, editing a layout or
/// rendering a batch.
#[derive(Error, Debug)]
pub enum Error {
    /// The roster text could not be parsed.
    #[error("Malformed roster: {0}")]
    MalformedInput(String),

    /// The template is not a usable single-page source document.
    #[error("Unsupported template format: {0}")]
    UnsupportedFormat(String),

    /// A field was bound to a column the roster does not have.
    #[error("Column '{0}' does not exist in the roster")]
    InvalidColumn(String),

    /// The requested family/weight/size combination is not allowed.
    #[error("Invalid typography: {0}")]
    InvalidTypography(String),

    /// The layout has no fields, so there is nothing to render.
    #[error("No fields have been placed on the template")]
    EmptyFieldSet,

    /// A required input (roster or template) has not been loaded.
    #[error("Missing input: {0}")]
    MissingInput(&'static str),

    /// The batch could not start or could not complete; no output is produced.
    #[error("Batch render failed: {0}")]
    FatalRender(String),

    /// The batch was cancelled between records.
    #[error("Batch render was cancelled")]
    Cancelled,

    /// Font catalog configuration error.
    #[error("Font catalog error: {0}")]
    Font(String),

    /// A stored asset could not be found.
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse classification of [`Error`], stable for callers that report
/// failures in a structured way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MalformedInput,
    UnsupportedFormat,
    InvalidColumn,
    InvalidTypography,
    EmptyFieldSet,
    MissingInput,
    FatalRender,
    Cancelled,
    Font,
    NotFound,
    Io,
    Json,
}

impl ErrorKind {
    /// Machine-readable name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MalformedInput => "malformed_input",
            ErrorKind::UnsupportedFormat => "unsupported_format",
            ErrorKind::InvalidColumn => "invalid_column",
            ErrorKind::InvalidTypography => "invalid_typography",
            ErrorKind::EmptyFieldSet => "empty_field_set",
            ErrorKind::MissingInput => "missing_input",
            ErrorKind::FatalRender => "fatal_render",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::Font => "font",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Io => "io",
            ErrorKind::Json => "json",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    /// The taxonomy kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MalformedInput(_) => ErrorKind::MalformedInput,
            Error::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            Error::InvalidColumn(_) => ErrorKind::InvalidColumn,
            Error::InvalidTypography(_) => ErrorKind::InvalidTypography,
            Error::EmptyFieldSet => ErrorKind::EmptyFieldSet,
            Error::MissingInput(_) => ErrorKind::MissingInput,
            Error::FatalRender(_) => ErrorKind::FatalRender,
            Error::Cancelled => ErrorKind::Cancelled,
            Error::Font(_) => ErrorKind::Font,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::Io(_) => ErrorKind::Io,
            Error::Json(_) => ErrorKind::Json,
        }
    }

    /// Whether this is a hard validation failure ("cannot proceed") rather
    /// than an operational fault.
    pub fn is_validation(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::MalformedInput
                | ErrorKind::UnsupportedFormat
                | ErrorKind::InvalidColumn
                | ErrorKind::InvalidTypography
                | ErrorKind::EmptyFieldSet
                | ErrorKind::MissingInput
        )
    }

    pub(crate) fn unsupported(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::Decryption(_) => {
                Error::UnsupportedFormat("document is encrypted".to_string())
            }
            other => Error::UnsupportedFormat(other.to_string()),
        }
    }

    pub(crate) fn fatal(err: lopdf::Error) -> Self {
        Error::FatalRender(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidColumn("Age".to_string());
        assert_eq!(err.to_string(), "Column 'Age' does not exist in the roster");

        let err = Error::EmptyFieldSet;
        assert_eq!(err.to_string(), "No fields have been placed on the template");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_validation_classification() {
        assert!(Error::EmptyFieldSet.is_validation());
        assert!(Error::InvalidTypography("x".into()).is_validation());
        assert!(!Error::FatalRender("x".into()).is_validation());
        assert!(!Error::Cancelled.is_validation());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ErrorKind::MalformedInput.as_str(), "malformed_input");
        assert_eq!(Error::Cancelled.kind().to_string(), "cancelled");
    }
}
