use std::str::FromStr;

/// Application-level constants
pub const APP_NAME: &str = "Factcheck";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024; // 20 MB

const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "llama3.2";
const DEFAULT_TIMEOUT_SECS: u64 = 90;
const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 5;
const DEFAULT_NUM_PREDICT: u32 = 1500;
const DEFAULT_MAX_DOCUMENT_CHARS: usize = 12_000;

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "factcheck_lib=info,factcheck=info,tower_http=warn"
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Settings for the inference service and the prompt bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceConfig {
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    pub probe_timeout_secs: u64,
    pub num_predict: u32,
    /// Documents longer than this (in characters) are truncated before prompting.
    pub max_document_chars: usize,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            probe_timeout_secs: DEFAULT_PROBE_TIMEOUT_SECS,
            num_predict: DEFAULT_NUM_PREDICT,
            max_document_chars: DEFAULT_MAX_DOCUMENT_CHARS,
        }
    }
}

/// Complete, immutable application configuration. Built once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub inference: InferenceConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: DEFAULT_HOST.to_string(),
                port: DEFAULT_PORT,
                max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            },
            inference: InferenceConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `FACTCHECK_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup. Unset or blank keys
    /// keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let server = ServerConfig {
            host: get("FACTCHECK_HOST").unwrap_or(defaults.server.host),
            port: parse_or("FACTCHECK_PORT", get("FACTCHECK_PORT"), defaults.server.port)?,
            max_upload_bytes: parse_or(
                "FACTCHECK_MAX_UPLOAD_BYTES",
                get("FACTCHECK_MAX_UPLOAD_BYTES"),
                defaults.server.max_upload_bytes,
            )?,
        };

        let inference = InferenceConfig {
            base_url: get("FACTCHECK_OLLAMA_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.inference.base_url),
            model: get("FACTCHECK_MODEL").unwrap_or(defaults.inference.model),
            timeout_secs: parse_or(
                "FACTCHECK_TIMEOUT_SECS",
                get("FACTCHECK_TIMEOUT_SECS"),
                defaults.inference.timeout_secs,
            )?,
            probe_timeout_secs: parse_or(
                "FACTCHECK_PROBE_TIMEOUT_SECS",
                get("FACTCHECK_PROBE_TIMEOUT_SECS"),
                defaults.inference.probe_timeout_secs,
            )?,
            num_predict: parse_or(
                "FACTCHECK_NUM_PREDICT",
                get("FACTCHECK_NUM_PREDICT"),
                defaults.inference.num_predict,
            )?,
            max_document_chars: parse_or(
                "FACTCHECK_MAX_DOCUMENT_CHARS",
                get("FACTCHECK_MAX_DOCUMENT_CHARS"),
                defaults.inference.max_document_chars,
            )?,
        };

        if inference.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "FACTCHECK_TIMEOUT_SECS",
                value: "0".into(),
            });
        }

        Ok(Self { server, inference })
    }
}

fn parse_or<T: FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}
