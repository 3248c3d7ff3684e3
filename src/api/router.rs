//! HTTP router.
//!
//! Returns a composable `Router` with the fact-check and health routes.
//! Layers (outermost → innermost): CORS → body limit → access log.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::pipeline::factcheck::Analyzer;

/// Build the API router around a shared analyzer.
///
/// `max_upload_bytes` bounds the whole request body, multipart framing
/// included.
pub fn api_router(analyzer: Arc<Analyzer>, max_upload_bytes: usize) -> Router {
    build_router(ApiContext::new(analyzer), max_upload_bytes)
}

fn build_router(ctx: ApiContext, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/summarize", post(endpoints::summarize::summarize))
        .route("/health", get(endpoints::health::check))
        .with_state(ctx)
        .layer(axum::middleware::from_fn(middleware::log_access))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
}
