use super::ExtractionError;

/// Extract the text layer of every page of a digital PDF using the
/// pdf-extract crate. Pages are joined with a newline.
///
/// Scanned PDFs (no text layer) come back blank; the caller treats that as
/// an empty document.
pub fn extract_pdf_text(pdf_bytes: &[u8]) -> Result<String, ExtractionError> {
    if !pdf_bytes.starts_with(b"%PDF-") {
        return Err(ExtractionError::PdfParsing("missing %PDF- header".into()));
    }

    let pages = pdf_extract::extract_text_from_mem_by_pages(pdf_bytes)
        .map_err(|e| ExtractionError::PdfParsing(e.to_string()))?;

    tracing::debug!(pages = pages.len(), "PDF text layer extracted");

    Ok(pages
        .iter()
        .map(|page| page.trim())
        .collect::<Vec<_>>()
        .join("\n"))
}
