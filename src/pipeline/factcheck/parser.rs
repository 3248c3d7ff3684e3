use serde_json::{Map, Value};

/// Structured object parsed out of model output.
pub type StructuredObject = Map<String, Value>;

/// Pull a JSON object out of raw model output.
///
/// Compliant output (the whole reply is one object) is parsed directly.
/// Otherwise the span from the first `{` to the last `}` is tried, which
/// covers objects wrapped in prose or markdown fences. `None` is a normal
/// outcome: the caller falls back to heuristic recovery.
pub fn extract_json_object(raw: &str) -> Option<StructuredObject> {
    let trimmed = raw.trim();

    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        if let Some(object) = parse_object(trimmed) {
            return Some(object);
        }
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }

    parse_object(&trimmed[start..=end])
}

fn parse_object(candidate: &str) -> Option<StructuredObject> {
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(object)) => Some(object),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!(error = %e, "Candidate JSON block did not parse");
            None
        }
    }
}
