/// Appended to documents that were cut to fit the prompt budget.
pub const TRUNCATION_MARKER: &str = "\n\n[... document truncated ...]";

/// Stand-in for a blank user query.
pub const NO_QUERY_PLACEHOLDER: &str = "No specific query. Fact-check the whole document.";

const FACTCHECK_INSTRUCTIONS: &str = r#"RULES — FOLLOW STRICTLY:
1. SUMMARY:
   - Include ONLY true statements from the document.
   - Do NOT repeat, correct or explain false statements in the summary.
   - Base the summary only on the document text; focus on the user query when one is given.
   - Include insights from tables if present.
2. FAKE SENTENCES:
   - List every sentence that is false, misleading or scientifically incorrect.
   - Copy each sentence exactly as it appears in the document.
3. RISK LEVEL (exactly one of):
   - Low: no false statements, or only minor inaccuracies.
   - Medium: some misleading or unsupported claims.
   - High: significant false claims that could mislead readers.
4. CONFIDENCE:
   - An integer from 0 to 100 expressing how sure you are of this assessment.

OUTPUT FORMAT — respond with ONLY this JSON object and nothing else:
{
  "summary": "<true factual summary>",
  "fake_sentences": ["<sentence 1>", "<sentence 2>"],
  "risk_level": "Low",
  "confidence": 80
}"#;

/// A document prepared for embedding in a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedDocument {
    pub text: String,
    pub truncated: bool,
}

/// Cut `document` to at most `max_chars` characters and append the
/// truncation marker when anything was dropped.
pub fn truncate_document(document: &str, max_chars: usize) -> PreparedDocument {
    match document.char_indices().nth(max_chars) {
        None => PreparedDocument {
            text: document.to_string(),
            truncated: false,
        },
        Some((cut, _)) => {
            let mut text = String::with_capacity(cut + TRUNCATION_MARKER.len());
            text.push_str(&document[..cut]);
            text.push_str(TRUNCATION_MARKER);
            PreparedDocument {
                text,
                truncated: true,
            }
        }
    }
}

/// Build the fact-check prompt for a (possibly truncated) document.
pub fn build_factcheck_prompt(document: &str, query: &str) -> String {
    let query = match query.trim() {
        "" => NO_QUERY_PLACEHOLDER,
        q => q,
    };
    let document = neutralize_document_tags(document);

    format!(
        r#"You are an expert fact-checker and summarizer.

USER QUERY:
<query>
{query}
</query>

{FACTCHECK_INSTRUCTIONS}

<document>
{document}
</document>

Begin."#
    )
}

/// Keep document text from closing the `<document>` boundary early.
fn neutralize_document_tags(text: &str) -> String {
    text.replace("</document>", "&lt;/document&gt;")
}
