pub mod api; // HTTP router, handlers and server lifecycle
pub mod config;
pub mod pipeline; // Extraction + fact-check analysis

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::ServerError;
use crate::config::{AppConfig, ConfigError};
use crate::pipeline::factcheck::{Analyzer, InferenceError, OllamaClient};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Cannot build inference client: {0}")]
    Inference(#[from] InferenceError),
    #[error("Cannot start async runtime: {0}")]
    Runtime(std::io::Error),
    #[error(transparent)]
    Server(#[from] ServerError),
}

/// Install the global tracing subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}

/// Load configuration, build the analyzer and serve until Ctrl-C.
///
/// The blocking inference client is created before the tokio runtime
/// exists and dropped after it has shut down.
pub fn run() -> Result<(), StartupError> {
    init_tracing();
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let config = AppConfig::from_env()?;
    let client = OllamaClient::from_config(&config.inference)?;
    tracing::info!(
        ollama = %client.base_url(),
        model = %config.inference.model,
        timeout_secs = config.inference.timeout_secs,
        "Inference client ready"
    );
    let analyzer = Arc::new(Analyzer::new(Box::new(client), config.inference.clone()));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(StartupError::Runtime)?;

    tracing::info!(addr = %config.server.bind_addr(), "Serving fact-check API");
    let served = runtime.block_on(api::serve_until_ctrl_c(Arc::clone(&analyzer), &config.server));
    drop(runtime);

    served?;
    tracing::info!("{} stopped", config::APP_NAME);
    Ok(())
}
