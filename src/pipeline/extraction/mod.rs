pub mod format;
pub mod pdf;
pub mod sanitize;
pub mod text;

pub use format::*;
pub use pdf::*;
pub use sanitize::*;
pub use text::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Unsupported file type")]
    UnsupportedFormat,

    #[error("Text encoding error: {0}")]
    EncodingError(String),

    #[error("PDF parsing failed: {0}")]
    PdfParsing(String),

    #[error("No extractable text in document")]
    Empty,
}

/// Extract plain text from an uploaded document of a known kind.
///
/// The result is sanitized and guaranteed non-blank.
pub fn extract_document_text(bytes: &[u8], kind: DocumentKind) -> Result<String, ExtractionError> {
    let raw = match kind {
        DocumentKind::PlainText => decode_plain_text(bytes)?,
        DocumentKind::Pdf => extract_pdf_text(bytes)?,
    };

    let text = sanitize_extracted_text(&raw);
    if text.trim().is_empty() {
        return Err(ExtractionError::Empty);
    }

    tracing::debug!(
        kind = kind.as_str(),
        bytes = bytes.len(),
        chars = text.chars().count(),
        "Document text extracted"
    );
    Ok(text)
}
