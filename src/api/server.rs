//! HTTP server lifecycle: bind, spawn the axum server in a background
//! task, return a handle with a shutdown channel.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::api::router::api_router;
use crate::config::ServerConfig;
use crate::pipeline::factcheck::Analyzer;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },
    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Server task failed: {0}")]
    Task(String),
}

/// Handle to a running server.
pub struct ApiServer {
    pub session_id: String,
    pub addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<Result<(), std::io::Error>>,
}

impl ApiServer {
    /// Ask the server to stop accepting connections. Idempotent.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!(session_id = %self.session_id, "Server shutdown signal sent");
        }
    }

    /// Wait for in-flight requests to drain after `shutdown`.
    pub async fn wait(self) -> Result<(), ServerError> {
        self.task
            .await
            .map_err(|e| ServerError::Task(e.to_string()))?
            .map_err(ServerError::from)
    }
}

/// Bind the configured address and start serving in a background task.
pub async fn start_api_server(
    analyzer: Arc<Analyzer>,
    config: &ServerConfig,
) -> Result<ApiServer, ServerError> {
    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(bind_addr.as_str())
        .await
        .map_err(|source| ServerError::Bind {
            addr: bind_addr.clone(),
            source,
        })?;
    let addr = listener.local_addr()?;

    let app = api_router(analyzer, config.max_upload_bytes);
    let session_id = Uuid::new_v4().to_string();
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("Server received shutdown signal");
        };

        tracing::info!(%addr, "Server started");
        let result = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await;
        if let Err(e) = &result {
            tracing::error!("Server error: {e}");
        }
        tracing::info!("Server stopped");
        result
    });

    Ok(ApiServer {
        session_id,
        addr,
        shutdown_tx: Some(shutdown_tx),
        task,
    })
}

/// Serve until Ctrl-C, then drain and return.
pub async fn serve_until_ctrl_c(
    analyzer: Arc<Analyzer>,
    config: &ServerConfig,
) -> Result<(), ServerError> {
    let mut server = start_api_server(analyzer, config).await?;

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Cannot listen for Ctrl-C, shutting down: {e}");
    }
    server.shutdown();
    server.wait().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InferenceConfig;
    use crate::pipeline::factcheck::MockLlmClient;

    fn test_analyzer() -> Arc<Analyzer> {
        let mock = MockLlmClient::new("{}").with_reachable(true);
        Arc::new(Analyzer::new(Box::new(mock), InferenceConfig::default()))
    }

    fn loopback_config() -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
            max_upload_bytes: 1024 * 1024,
        }
    }

    #[tokio::test]
    async fn start_and_stop_server() {
        let mut server = start_api_server(test_analyzer(), &loopback_config())
            .await
            .expect("server should start");
        assert!(server.addr.port() > 0);
        assert!(!server.session_id.is_empty());

        let url = format!("http://{}/health", server.addr);
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        let json: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["ollama"], true);

        server.shutdown();
        server.wait().await.expect("server should stop cleanly");
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let mut server = start_api_server(test_analyzer(), &loopback_config())
            .await
            .unwrap();

        let url = format!("http://{}/nonexistent", server.addr);
        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);

        server.shutdown();
    }

    #[tokio::test]
    async fn shutdown_is_idempotent() {
        let mut server = start_api_server(test_analyzer(), &loopback_config())
            .await
            .unwrap();
        server.shutdown();
        server.shutdown();
    }

    #[tokio::test]
    async fn bind_failure_names_the_address() {
        let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = taken.local_addr().unwrap().port();
        let config = ServerConfig {
            port,
            ..loopback_config()
        };
        match start_api_server(test_analyzer(), &config).await {
            Err(ServerError::Bind { addr, .. }) => assert_eq!(addr, format!("127.0.0.1:{port}")),
            Err(other) => panic!("Expected Bind error, got {other}"),
            Ok(_) => panic!("Expected bind to fail"),
        }
    }
}
