//! Shared state for the HTTP layer.

use std::sync::Arc;

use crate::pipeline::factcheck::Analyzer;

/// Shared context for all routes. The analyzer is read-only after startup.
#[derive(Clone)]
pub struct ApiContext {
    pub analyzer: Arc<Analyzer>,
}

impl ApiContext {
    pub fn new(analyzer: Arc<Analyzer>) -> Self {
        Self { analyzer }
    }
}
