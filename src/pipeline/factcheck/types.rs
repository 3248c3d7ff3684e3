use std::fmt;

use serde::Serialize;

use super::InferenceError;

/// Three-point misinformation severity assigned to a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    /// Case-insensitive parse of a model-supplied label.
    /// Surrounding whitespace, quotes and markdown emphasis are ignored.
    pub fn parse_label(raw: &str) -> Option<Self> {
        let cleaned = raw
            .trim()
            .trim_matches(|c: char| matches!(c, '"' | '\'' | '*' | '`' | '.' | ','))
            .trim()
            .to_lowercase();
        match cleaned.as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical fact-check result. Every field is always populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    pub summary: String,
    pub fake_sentences: Vec<String>,
    pub risk_level: RiskLevel,
    /// Always within `0..=100`.
    pub confidence: u8,
    /// Set only when the inference service could not be reached or answered
    /// with a transport-level failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Decoding options forwarded to the inference service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerateOptions {
    pub temperature: f32,
    pub num_predict: u32,
}

impl GenerateOptions {
    /// Deterministic decoding with a bounded output budget.
    pub fn deterministic(num_predict: u32) -> Self {
        Self {
            temperature: 0.0,
            num_predict,
        }
    }
}

/// Inference service abstraction (allows mocking)
pub trait LlmClient {
    /// Run one completion. No retries; the implementation enforces its own
    /// wall-clock timeout.
    fn generate(
        &self,
        model: &str,
        prompt: &str,
        options: GenerateOptions,
    ) -> Result<String, InferenceError>;

    /// Live reachability check of the service. Never fails, only reports.
    fn probe(&self) -> bool;
}
