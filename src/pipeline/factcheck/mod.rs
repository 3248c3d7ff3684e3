pub mod types;
pub mod sentences;
pub mod parser;
pub mod recovery;
pub mod normalize;
pub mod prompt;
pub mod ollama;
pub mod orchestrator;

pub use types::*;
pub use sentences::*;
pub use parser::*;
pub use recovery::*;
pub use normalize::*;
pub use prompt::*;
pub use ollama::*;
pub use orchestrator::*;

use thiserror::Error;

/// Transport-level outcome of a failed inference call.
///
/// Content-level problems (the model answered, but badly) are never errors;
/// they are handled by the recovery chain.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InferenceError {
    #[error("Ollama request timed out after {after_secs}s")]
    TimedOut { after_secs: u64 },

    #[error("Ollama is not reachable at {url}")]
    Unreachable { url: String },

    #[error("Ollama request failed: {0}")]
    RequestFailed(String),
}
