//! pdfask Configuration Management
//!
//! Handles configuration from environment variables and TOML files
//! with defaults that reproduce the demo server out of the box.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Upload ingest pipeline
    pub ingest: IngestConfig,

    /// Placeholder embedding settings
    pub embedding: EmbeddingConfig,

    /// How `/api/ask` produces answers
    pub answer: AnswerConfig,

    /// LLM provider configuration (retrieval mode only)
    pub llm: LlmConfig,

    /// Live news lookup (retrieval mode only)
    pub news: NewsConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().apply_overrides(|key| std::env::var(key).ok())
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(self) -> Result<Self, ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server
        if let Some(host) = lookup("API_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("API_PORT") {
            self.server.port = parse_value("API_PORT", port)?;
        }
        if let Some(size) = lookup("MAX_BODY_SIZE") {
            self.server.max_body_size = parse_value("MAX_BODY_SIZE", size)?;
        }
        // CORS origins (comma-separated)
        if let Some(origins) = lookup("CORS_ORIGINS") {
            self.server.cors_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // Ingest
        if let Some(dir) = lookup("UPLOAD_DIR") {
            self.ingest.upload_dir = PathBuf::from(dir);
        }
        if let Some(size) = lookup("CHUNK_SIZE") {
            self.ingest.chunk_size = parse_value("CHUNK_SIZE", size)?;
        }
        if let Some(overlap) = lookup("CHUNK_OVERLAP") {
            self.ingest.chunk_overlap = parse_value("CHUNK_OVERLAP", overlap)?;
        }

        // Answer mode
        if let Some(mode) = lookup("ASK_MODE") {
            self.answer.mode = mode.parse()?;
        }

        // LLM
        if let Some(url) = lookup("OLLAMA_URL") {
            self.llm.ollama_url = url;
        }
        if let Some(model) = lookup("LLM_MODEL") {
            self.llm.model = model;
        }

        // News
        if let Some(key) = lookup("RAPIDAPI_KEY") {
            self.news.api_key = Some(key);
        }

        // Logging
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(json) = lookup("LOG_JSON") {
            self.logging.json_format = parse_value("LOG_JSON", json)?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Check cross-field invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ingest.chunk_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "CHUNK_SIZE".to_string(),
                value: "0".to_string(),
            });
        }
        if self.ingest.chunk_overlap >= self.ingest.chunk_size {
            return Err(ConfigError::InvalidValue {
                key: "CHUNK_OVERLAP".to_string(),
                value: self.ingest.chunk_overlap.to_string(),
            });
        }
        if self.embedding.dimension == 0 {
            return Err(ConfigError::InvalidValue {
                key: "embedding.dimension".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: String) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value,
    })
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Maximum request body size in bytes
    pub max_body_size: usize,

    /// Allowed origins for CORS (empty allows any origin)
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            max_body_size: 10 * 1024 * 1024, // 10MB
            cors_origins: vec![],
        }
    }
}

/// Upload ingest configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Directory where uploads are spooled before parsing
    pub upload_dir: PathBuf,

    /// Maximum chunk size in characters
    pub chunk_size: usize,

    /// Overlap between neighbouring chunks in characters
    pub chunk_overlap: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// Placeholder embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Vector dimension
    pub dimension: usize,

    /// Value every component is filled with
    pub fill_value: f32,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            dimension: 1536,
            fill_value: 0.1,
        }
    }
}

/// Answer generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerConfig {
    /// Which answerer backs `/api/ask`
    pub mode: AnswerMode,

    /// Chunks pulled from the vector store when no news context exists
    pub retrieval_top_k: usize,
}

impl Default for AnswerConfig {
    fn default() -> Self {
        Self {
            mode: AnswerMode::Simulated,
            retrieval_top_k: 3,
        }
    }
}

/// Supported answer modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerMode {
    /// Templated echo of the question
    Simulated,
    /// News or vector context sent to a local LLM (experimental)
    Retrieval,
}

impl std::str::FromStr for AnswerMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "simulated" => Ok(Self::Simulated),
            "retrieval" => Ok(Self::Retrieval),
            _ => Err(ConfigError::InvalidValue {
                key: "ASK_MODE".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Ollama server URL
    pub ollama_url: String,

    /// Model name to use
    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            ollama_url: "http://localhost:11434".to_string(),
            model: "llama3".to_string(),
            timeout_secs: 20,
        }
    }
}

/// Live news lookup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    /// RapidAPI key
    pub api_key: Option<String>,

    /// Base URL of the news search API
    pub base_url: String,

    /// RapidAPI host header
    pub host: String,

    /// Number of articles requested
    pub limit: u32,

    /// Country filter
    pub country: String,

    /// Language filter
    pub lang: String,

    /// Context is truncated to this many characters
    pub max_context_chars: usize,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://real-time-news-data.p.rapidapi.com".to_string(),
            host: "real-time-news-data.p.rapidapi.com".to_string(),
            limit: 5,
            country: "US".to_string(),
            lang: "en".to_string(),
            max_context_chars: 2000,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.ingest.chunk_size, 1000);
        assert_eq!(config.ingest.chunk_overlap, 200);
        assert_eq!(config.embedding.dimension, 1536);
        assert_eq!(config.answer.mode, AnswerMode::Simulated);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_answer_mode_parse() {
        assert_eq!(
            "simulated".parse::<AnswerMode>().unwrap(),
            AnswerMode::Simulated
        );
        assert_eq!(
            "RETRIEVAL".parse::<AnswerMode>().unwrap(),
            AnswerMode::Retrieval
        );
        assert!("invalid".parse::<AnswerMode>().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::default()
            .apply_overrides(lookup_from(&[
                ("API_PORT", "8081"),
                ("UPLOAD_DIR", "/tmp/pdfask"),
                ("ASK_MODE", "retrieval"),
                ("RAPIDAPI_KEY", "secret"),
                ("CORS_ORIGINS", "http://a.test, ,http://b.test"),
            ]))
            .unwrap();

        assert_eq!(config.server.port, 8081);
        assert_eq!(config.ingest.upload_dir, PathBuf::from("/tmp/pdfask"));
        assert_eq!(config.answer.mode, AnswerMode::Retrieval);
        assert_eq!(config.news.api_key.as_deref(), Some("secret"));
        assert_eq!(
            config.server.cors_origins,
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }

    #[test]
    fn test_invalid_port_rejected() {
        let err = AppConfig::default()
            .apply_overrides(lookup_from(&[("API_PORT", "not-a-port")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "API_PORT"));
    }

    #[test]
    fn test_overlap_must_be_smaller_than_chunk() {
        let err = AppConfig::default()
            .apply_overrides(lookup_from(&[("CHUNK_SIZE", "100"), ("CHUNK_OVERLAP", "100")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "CHUNK_OVERLAP"));
    }

    #[test]
    fn test_from_file_partial() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pdfask.toml");
        std::fs::write(
            &path,
            "[server]\nport = 9000\n\n[ingest]\nchunk_size = 500\nchunk_overlap = 50\n",
        )
        .unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.ingest.chunk_size, 500);
        assert_eq!(config.embedding.dimension, 1536);
    }

    #[test]
    fn test_from_file_missing() {
        let err = AppConfig::from_file("/nonexistent/pdfask.toml").unwrap_err();
        assert!(matches!(err, ConfigError::FileReadError { .. }));
    }
}
