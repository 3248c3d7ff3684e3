//! Fact-check endpoint.
//!
//! `POST /summarize` accepts a multipart form with an optional `query`,
//! an optional `file` upload (`.txt` or `.pdf`) and an optional `text`
//! field. An uploaded file wins over pasted text.

use std::sync::Arc;

use axum::extract::multipart::MultipartError;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::pipeline::extraction::{
    extract_document_text, sanitize_extracted_text, DocumentKind, ExtractionError,
};
use crate::pipeline::factcheck::RiskLevel;

/// Minimum document length in characters, after trimming.
pub const MIN_TEXT_CHARS: usize = 30;

const NO_CONTENT: &str = "No text or file provided";
const TOO_SHORT: &str = "Text too short: at least 30 characters required";

#[derive(Debug, Serialize)]
pub struct SummarizeResponse {
    pub summary: String,
    pub query: String,
    pub risk_level: RiskLevel,
    pub fake_sentences: Vec<String>,
    pub confidence: u8,
    pub word_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Default)]
struct SummarizeForm {
    query: String,
    text: Option<String>,
    file: Option<UploadedFile>,
}

#[derive(Debug)]
struct UploadedFile {
    filename: String,
    bytes: Vec<u8>,
}

impl UploadedFile {
    /// Browsers send an empty `file` part when nothing was chosen.
    fn is_empty(&self) -> bool {
        self.filename.trim().is_empty() && self.bytes.is_empty()
    }
}

/// `POST /summarize`: resolve the document, then run the fact-check.
///
/// Inference failures still return 200; they are reported in `error`.
pub async fn summarize(
    State(ctx): State<ApiContext>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<SummarizeResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let form = read_form(&mut multipart).await?;
    let query = form.query.trim().to_string();

    let document = resolve_document(form.file, form.text).await?;
    check_length(&document)?;
    let word_count = document.split_whitespace().count();

    let analyzer = Arc::clone(&ctx.analyzer);
    let prompt_query = query.clone();
    let result = tokio::task::spawn_blocking(move || analyzer.analyze(&document, &prompt_query))
        .await
        .map_err(|e| ApiError::Internal(format!("Analysis task failed: {e}")))?;

    tracing::info!(
        word_count,
        risk_level = %result.risk_level,
        confidence = result.confidence,
        flagged = result.fake_sentences.len(),
        degraded = result.error.is_some(),
        "Summarize request completed"
    );

    Ok(Json(SummarizeResponse {
        summary: result.summary,
        query,
        risk_level: result.risk_level,
        fake_sentences: result.fake_sentences,
        confidence: result.confidence,
        word_count,
        error: result.error,
    }))
}

async fn read_form(multipart: &mut Multipart) -> Result<SummarizeForm, ApiError> {
    let mut form = SummarizeForm::default();

    while let Some(field) = multipart.next_field().await.map_err(form_error)? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "query" => form.query = field.text().await.map_err(form_error)?,
            "text" => form.text = Some(field.text().await.map_err(form_error)?),
            "file" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let bytes = field.bytes().await.map_err(form_error)?;
                form.file = Some(UploadedFile {
                    filename,
                    bytes: bytes.to_vec(),
                });
            }
            _ => tracing::debug!(field = %name, "Ignoring unknown form field"),
        }
    }

    Ok(form)
}

fn form_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge
    } else {
        ApiError::BadRequest(format!("Malformed form data: {}", err.body_text()))
    }
}

/// Turn the form into sanitized document text.
async fn resolve_document(
    file: Option<UploadedFile>,
    text: Option<String>,
) -> Result<String, ApiError> {
    let Some(file) = file.filter(|f| !f.is_empty()) else {
        let document = sanitize_extracted_text(text.as_deref().unwrap_or(""));
        if document.is_empty() {
            return Err(ApiError::BadRequest(NO_CONTENT.into()));
        }
        return Ok(document);
    };

    let kind = DocumentKind::from_filename(&file.filename)
        .ok_or(ExtractionError::UnsupportedFormat)?;
    tracing::info!(
        filename = %file.filename,
        kind = kind.as_str(),
        bytes = file.bytes.len(),
        "Reading uploaded document"
    );

    let extracted = tokio::task::spawn_blocking(move || extract_document_text(&file.bytes, kind))
        .await
        .map_err(|e| {
            if e.is_panic() {
                tracing::warn!(kind = kind.as_str(), "Document parser panicked");
                ApiError::BadRequest("Could not read file: document could not be parsed".into())
            } else {
                ApiError::Internal(format!("Extraction task failed: {e}"))
            }
        })?;

    Ok(extracted?)
}

fn check_length(document: &str) -> Result<(), ApiError> {
    if document.trim().chars().count() < MIN_TEXT_CHARS {
        return Err(ApiError::BadRequest(TOO_SHORT.into()));
    }
    Ok(())
}
