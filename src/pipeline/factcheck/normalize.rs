use serde_json::Value;

use super::parser::StructuredObject;
use super::recovery::RecoveredFields;
use super::sentences::fallback_summary;
use super::types::{AnalysisResult, RiskLevel};
use super::InferenceError;

/// Confidence assumed when a structured reply omits or garbles the score.
pub const STRUCTURED_DEFAULT_CONFIDENCE: u8 = 75;

/// Build a result from a parsed JSON object. Each key is coerced on its own
/// and falls back to its default; `fallback` replaces an empty summary.
pub fn from_structured(object: &StructuredObject, fallback: &str) -> AnalysisResult {
    let summary = object.get("summary").map(coerce_summary).unwrap_or_default();
    let summary = if summary.is_empty() {
        fallback.to_string()
    } else {
        summary
    };

    AnalysisResult {
        summary,
        fake_sentences: object
            .get("fake_sentences")
            .map(coerce_sentences)
            .unwrap_or_default(),
        risk_level: object
            .get("risk_level")
            .and_then(Value::as_str)
            .and_then(RiskLevel::parse_label)
            .unwrap_or_default(),
        confidence: object
            .get("confidence")
            .and_then(coerce_confidence)
            .unwrap_or(STRUCTURED_DEFAULT_CONFIDENCE),
        error: None,
    }
}

/// Build a result from heuristically recovered fields plus a summary derived
/// from the document.
pub fn from_recovered(fields: RecoveredFields, summary: String) -> AnalysisResult {
    AnalysisResult {
        summary,
        fake_sentences: fields.fake_sentences,
        risk_level: fields.risk_level,
        confidence: fields.confidence,
        error: None,
    }
}

/// Result reported when the inference call itself failed. Analytical fields
/// are defaulted; the summary still comes from the document.
pub fn from_transport_failure(error: &InferenceError, document: &str) -> AnalysisResult {
    AnalysisResult {
        summary: fallback_summary(document),
        fake_sentences: Vec::new(),
        risk_level: RiskLevel::Low,
        confidence: 0,
        error: Some(error.to_string()),
    }
}

fn coerce_summary(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        // Some models split the summary into a list of sentences.
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
        _ => String::new(),
    }
}

fn coerce_sentences(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Value::String(s) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    }
}

fn coerce_confidence(value: &Value) -> Option<u8> {
    let number = match value {
        Value::Number(n) => n
            .as_i64()
            .map(|v| v as f64)
            .or_else(|| n.as_f64())?,
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !number.is_finite() {
        return None;
    }
    Some(number.round().clamp(0.0, 100.0) as u8)
}
