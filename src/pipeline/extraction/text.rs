use super::ExtractionError;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Strict UTF-8 decode of a plain-text upload. A leading BOM is dropped.
pub fn decode_plain_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    String::from_utf8(bytes.to_vec()).map_err(|e| ExtractionError::EncodingError(e.to_string()))
}
