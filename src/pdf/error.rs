//! Error taxonomy shared by every stage of the rasterization pipeline.

use serde::Serialize;
use thiserror::Error;

/// Why a document source could not be opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenFailure {
    /// The source produced zero bytes.
    Empty,
    /// The source could not be read at all.
    Unreadable(String),
    /// The bytes are not a document the engine understands.
    Malformed(String),
}

impl std::fmt::Display for OpenFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OpenFailure::Empty => write!(f, "source is empty"),
            OpenFailure::Unreadable(reason) => write!(f, "source unreadable: {}", reason),
            OpenFailure::Malformed(reason) => write!(f, "not a valid PDF: {}", reason),
        }
    }
}

/// Errors that can occur during PDF operations.
#[derive(Error, Debug)]
pub enum PdfError {
    #[error("Failed to initialize PDFium: {0}")]
    InitError(String),

    #[error("Failed to open PDF: {0}")]
    OpenError(OpenFailure),

    #[error("Invalid page index {index} (document has {page_count} pages)")]
    IndexError { index: i64, page_count: u32 },

    #[error("Rendering failed: {0}")]
    RenderError(String),

    #[error("Image encoding failed: {0}")]
    EncodeError(String),

    #[error("Invalid scale factor: {0}")]
    InvalidScale(f32),

    #[error("Document already closed")]
    NoDocument,

    #[error("Rendering cancelled")]
    Cancelled,

    #[error("Display surface rejected the document: {0}")]
    DisplayError(String),
}

impl PdfError {
    pub(crate) fn empty() -> Self {
        PdfError::OpenError(OpenFailure::Empty)
    }

    pub(crate) fn unreadable(reason: impl ToString) -> Self {
        PdfError::OpenError(OpenFailure::Unreadable(reason.to_string()))
    }

    pub(crate) fn malformed(reason: impl ToString) -> Self {
        PdfError::OpenError(OpenFailure::Malformed(reason.to_string()))
    }
}

impl Serialize for PdfError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_display_string() {
        let err = PdfError::IndexError { index: -1, page_count: 3 };
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, "\"Invalid page index -1 (document has 3 pages)\"");
    }

    #[test]
    fn open_failure_messages() {
        assert_eq!(PdfError::empty().to_string(), "Failed to open PDF: source is empty");
        assert!(PdfError::malformed("bad header")
            .to_string()
            .ends_with("not a valid PDF: bad header"));
    }
}
