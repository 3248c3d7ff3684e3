use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::types::{GenerateOptions, LlmClient};
use super::InferenceError;
use crate::config::InferenceConfig;

/// Ollama HTTP client for local LLM inference.
pub struct OllamaClient {
    base_url: String,
    client: reqwest::blocking::Client,
    probe_client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OllamaClient {
    /// Create a new OllamaClient pointing at an Ollama instance.
    ///
    /// Must be called outside of an async runtime: the blocking reqwest
    /// client owns its own runtime.
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        probe_timeout_secs: u64,
    ) -> Result<Self, InferenceError> {
        let build = |secs: u64| {
            reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(secs))
                .build()
                .map_err(|e| {
                    InferenceError::RequestFailed(format!("Failed to create HTTP client: {e}"))
                })
        };

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: build(timeout_secs)?,
            probe_client: build(probe_timeout_secs)?,
            timeout_secs,
        })
    }

    pub fn from_config(config: &InferenceConfig) -> Result<Self, InferenceError> {
        Self::new(
            &config.base_url,
            config.timeout_secs,
            config.probe_timeout_secs,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn classify(&self, e: reqwest::Error) -> InferenceError {
        if e.is_timeout() {
            InferenceError::TimedOut {
                after_secs: self.timeout_secs,
            }
        } else if e.is_connect() {
            InferenceError::Unreachable {
                url: self.base_url.clone(),
            }
        } else {
            InferenceError::RequestFailed(e.to_string())
        }
    }
}

/// Request body for Ollama /api/generate
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    options: GenerateOptions,
    stream: bool,
}

/// Response body from Ollama /api/generate
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    #[serde(default)]
    response: Option<GeneratedText>,
}

/// Generated text arrives as one string, or (from some proxies) as chunks.
#[derive(Deserialize)]
#[serde(untagged)]
enum GeneratedText {
    Whole(String),
    Chunks(Vec<String>),
}

impl GeneratedText {
    fn into_text(self) -> String {
        match self {
            Self::Whole(text) => text,
            Self::Chunks(chunks) => chunks.join(" "),
        }
    }
}

impl LlmClient for OllamaClient {
    fn generate(
        &self,
        model: &str,
        prompt: &str,
        options: GenerateOptions,
    ) -> Result<String, InferenceError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = OllamaGenerateRequest {
            model,
            prompt,
            options,
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(InferenceError::RequestFailed(format!(
                "status {}: {}",
                status.as_u16(),
                body.trim()
            )));
        }

        let parsed: OllamaGenerateResponse = response.json().map_err(|e| {
            if e.is_timeout() {
                self.classify(e)
            } else {
                InferenceError::RequestFailed(format!("Malformed response body: {e}"))
            }
        })?;

        Ok(parsed
            .response
            .map(GeneratedText::into_text)
            .unwrap_or_default())
    }

    fn probe(&self) -> bool {
        match self.probe_client.get(&self.base_url).send() {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!(error = %e, url = %self.base_url, "Ollama probe failed");
                false
            }
        }
    }
}

/// Mock LLM client for testing. Returns a configurable outcome.
pub struct MockLlmClient {
    outcome: Result<String, InferenceError>,
    reachable: bool,
    last_prompt: Mutex<Option<String>>,
}

impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self {
            outcome: Ok(response.to_string()),
            reachable: true,
            last_prompt: Mutex::new(None),
        }
    }

    pub fn failing(error: InferenceError) -> Self {
        Self {
            outcome: Err(error),
            reachable: false,
            last_prompt: Mutex::new(None),
        }
    }

    pub fn with_reachable(mut self, reachable: bool) -> Self {
        self.reachable = reachable;
        self
    }

    /// The prompt passed to the most recent `generate` call.
    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().ok().and_then(|guard| guard.clone())
    }
}

impl LlmClient for MockLlmClient {
    fn generate(
        &self,
        _model: &str,
        prompt: &str,
        _options: GenerateOptions,
    ) -> Result<String, InferenceError> {
        if let Ok(mut guard) = self.last_prompt.lock() {
            *guard = Some(prompt.to_string());
        }
        self.outcome.clone()
    }

    fn probe(&self) -> bool {
        self.reachable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Accept one connection, read the request, then hold the socket open
    /// without answering for `hold`.
    fn silent_server(hold: Duration) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf);
                thread::sleep(hold);
            }
        });
        format!("http://{addr}")
    }

    /// Accept one connection, read the full request, reply with `response`.
    fn canned_server(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                read_request(&mut stream);
                let _ = stream.write_all(response.as_bytes());
                let _ = stream.flush();
            }
        });
        format!("http://{addr}")
    }

    fn read_request(stream: &mut std::net::TcpStream) {
        let mut data = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = match stream.read(&mut buf) {
                Ok(0) | Err(_) => return,
                Ok(n) => n,
            };
            data.extend_from_slice(&buf[..n]);
            let Some(end) = data.windows(4).position(|w| w == b"\r\n\r\n") else {
                continue;
            };
            let head = String::from_utf8_lossy(&data[..end]).to_lowercase();
            let length = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if data.len() >= end + 4 + length {
                return;
            }
        }
    }

    #[test]
    fn mock_client_returns_configured_response() {
        let client = MockLlmClient::new("test response");
        let result = client
            .generate("model", "prompt", GenerateOptions::deterministic(10))
            .unwrap();
        assert_eq!(result, "test response");
        assert_eq!(client.last_prompt().as_deref(), Some("prompt"));
    }

    #[test]
    fn mock_client_returns_configured_failure() {
        let client = MockLlmClient::failing(InferenceError::Unreachable {
            url: "http://localhost:11434".into(),
        });
        let result = client.generate("model", "prompt", GenerateOptions::deterministic(10));
        assert!(matches!(result, Err(InferenceError::Unreachable { .. })));
        assert!(!client.probe());
    }

    #[test]
    fn ollama_client_constructor() {
        let client = OllamaClient::new("http://localhost:11434", 120, 5).unwrap();
        assert_eq!(client.base_url, "http://localhost:11434");
        assert_eq!(client.timeout_secs, 120);
    }

    #[test]
    fn ollama_client_trims_trailing_slash() {
        let client = OllamaClient::new("http://localhost:11434/", 60, 5).unwrap();
        assert_eq!(client.base_url(), "http://localhost:11434");
    }

    #[test]
    fn from_config_uses_inference_settings() {
        let config = InferenceConfig::default();
        let client = OllamaClient::from_config(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:11434");
        assert_eq!(client.timeout_secs, 90);
    }

    #[test]
    fn request_body_matches_generate_api() {
        let body = OllamaGenerateRequest {
            model: "llama3.2",
            prompt: "p",
            options: GenerateOptions::deterministic(1500),
            stream: false,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "llama3.2");
        assert_eq!(json["prompt"], "p");
        assert_eq!(json["options"]["temperature"], 0.0);
        assert_eq!(json["options"]["num_predict"], 1500);
        assert_eq!(json["stream"], false);
    }

    #[test]
    fn response_accepts_string_or_chunks() {
        let whole: OllamaGenerateResponse =
            serde_json::from_str(r#"{"response": "hello world", "done": true}"#).unwrap();
        assert_eq!(whole.response.unwrap().into_text(), "hello world");

        let chunks: OllamaGenerateResponse =
            serde_json::from_str(r#"{"response": ["hello", "world"]}"#).unwrap();
        assert_eq!(chunks.response.unwrap().into_text(), "hello world");

        let missing: OllamaGenerateResponse = serde_json::from_str(r#"{"done": true}"#).unwrap();
        assert!(missing.response.is_none());
    }

    #[test]
    fn unreachable_host_is_classified() {
        // Port 9 (discard) on localhost is closed on CI hosts.
        let client = OllamaClient::new("http://127.0.0.1:9", 5, 1).unwrap();
        let result = client.generate("m", "p", GenerateOptions::deterministic(1));
        assert!(matches!(result, Err(InferenceError::Unreachable { .. })));
        assert!(!client.probe());
    }

    #[test]
    fn silent_server_is_classified_as_timeout() {
        let base_url = silent_server(Duration::from_secs(5));
        let client = OllamaClient::new(&base_url, 1, 1).unwrap();
        let result = client.generate("m", "p", GenerateOptions::deterministic(1));
        assert_eq!(result, Err(InferenceError::TimedOut { after_secs: 1 }));
    }

    #[test]
    fn error_status_is_request_failed_with_body() {
        let base_url = canned_server(
            "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 14\r\nConnection: close\r\n\r\nmodel crashed!",
        );
        let client = OllamaClient::new(&base_url, 5, 1).unwrap();
        let result = client.generate("m", "p", GenerateOptions::deterministic(1));
        assert_eq!(
            result,
            Err(InferenceError::RequestFailed("status 500: model crashed!".into()))
        );
    }

    #[test]
    fn successful_reply_returns_generated_text() {
        let base_url = canned_server(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 35\r\nConnection: close\r\n\r\n{\"response\": \"All good\", \"done\": 1}",
        );
        let client = OllamaClient::new(&base_url, 5, 1).unwrap();
        let result = client.generate("m", "p", GenerateOptions::deterministic(1));
        assert_eq!(result.as_deref(), Ok("All good"));
    }
}
