use uuid::Uuid;

use super::normalize::{from_recovered, from_structured, from_transport_failure};
use super::parser::extract_json_object;
use super::prompt::{build_factcheck_prompt, truncate_document};
use super::recovery::recover_fields;
use super::sentences::fallback_summary;
use super::types::{AnalysisResult, GenerateOptions, LlmClient};
use crate::config::InferenceConfig;

/// Which branch produced a result. Logged per analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisPath {
    Structured,
    Recovered,
    TransportFailed,
}

/// Orchestrates one fact-check:
/// truncate → prompt → LLM → parse JSON → (recover) → normalize
pub struct Analyzer {
    llm: Box<dyn LlmClient + Send + Sync>,
    config: InferenceConfig,
}

impl Analyzer {
    pub fn new(llm: Box<dyn LlmClient + Send + Sync>, config: InferenceConfig) -> Self {
        Self { llm, config }
    }

    /// Live reachability of the inference service.
    pub fn inference_reachable(&self) -> bool {
        self.llm.probe()
    }

    /// Fact-check `document`, focusing on `query` when it is not blank.
    ///
    /// Never fails: transport errors are reported in `AnalysisResult::error`
    /// and malformed model output is recovered heuristically.
    pub fn analyze(&self, document: &str, query: &str) -> AnalysisResult {
        self.analyze_traced(document, query).0
    }

    /// Same as [`Analyzer::analyze`], also reporting the branch taken.
    pub fn analyze_traced(&self, document: &str, query: &str) -> (AnalysisResult, AnalysisPath) {
        let request_id = Uuid::new_v4();
        let prepared = truncate_document(document, self.config.max_document_chars);
        let _span = tracing::info_span!(
            "analyze",
            %request_id,
            model = %self.config.model,
            document_chars = document.chars().count(),
            truncated = prepared.truncated,
        )
        .entered();

        let prompt = build_factcheck_prompt(&prepared.text, query);
        let options = GenerateOptions::deterministic(self.config.num_predict);

        let raw = match self.llm.generate(&self.config.model, &prompt, options) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "Inference call failed, returning document-only result");
                return (from_transport_failure(&e, document), AnalysisPath::TransportFailed);
            }
        };

        let fallback = fallback_summary(document);
        let (result, path) = match extract_json_object(&raw) {
            Some(object) => (from_structured(&object, &fallback), AnalysisPath::Structured),
            None => {
                tracing::info!(
                    response_chars = raw.chars().count(),
                    "No JSON object in model output, recovering labeled fields"
                );
                (
                    from_recovered(recover_fields(&raw), fallback),
                    AnalysisPath::Recovered,
                )
            }
        };

        tracing::info!(
            path = ?path,
            risk_level = %result.risk_level,
            confidence = result.confidence,
            fake_sentences = result.fake_sentences.len(),
            "Analysis complete"
        );

        (result, path)
    }
}
