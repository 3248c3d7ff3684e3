//! Health check endpoint.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::types::ApiContext;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub ollama: bool,
}

/// `GET /health`: liveness plus inference reachability. Never fails.
pub async fn check(State(ctx): State<ApiContext>) -> Json<HealthResponse> {
    let analyzer = Arc::clone(&ctx.analyzer);
    let ollama = tokio::task::spawn_blocking(move || analyzer.inference_reachable())
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Inference probe task failed");
            false
        });

    Json(HealthResponse {
        status: "ok",
        ollama,
    })
}
