//! pdfask Core - Shared types, errors and traits
//!
//! This crate defines the abstractions used throughout pdfask:
//! - Document chunks produced by the ingest pipeline
//! - Search results returned by vector stores
//! - Common error types
//! - The LLM client trait
//! - Configuration management

pub mod config;

pub use config::{
    AnswerConfig, AnswerMode, AppConfig, ConfigError, EmbeddingConfig, IngestConfig, LlmConfig,
    LoggingConfig, NewsConfig, ServerConfig,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for pdfask operations
#[derive(Error, Debug)]
pub enum PdfAskError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Search error: {0}")]
    SearchError(String),

    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, PdfAskError>;

// ============================================================================
// Document Chunks
// ============================================================================

/// A bounded fragment of extracted document text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentChunk {
    /// Chunk content
    pub content: String,

    /// Position of the chunk within its document
    pub index: u32,

    /// Page the chunk was taken from (1-indexed)
    pub page: Option<u32>,

    /// Source file name as reported by the uploader
    pub source: Option<String>,
}

impl DocumentChunk {
    /// Create a new chunk
    pub fn new(content: impl Into<String>, index: u32) -> Self {
        Self {
            content: content.into(),
            index,
            page: None,
            source: None,
        }
    }

    /// Set page number
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Set source name
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

// ============================================================================
// Search Results
// ============================================================================

/// Search result from a vector store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Matched chunk
    pub chunk: DocumentChunk,

    /// Relevance score (higher is better)
    pub score: f32,

    /// Store the result came from
    pub store_id: Uuid,
}

// ============================================================================
// Traits
// ============================================================================

/// Trait for LLM clients
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate a response
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Model name for logging
    fn model(&self) -> &str;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_builder() {
        let chunk = DocumentChunk::new("Some text", 3)
            .with_page(2)
            .with_source("report.pdf");

        assert_eq!(chunk.index, 3);
        assert_eq!(chunk.page, Some(2));
        assert_eq!(chunk.source.as_deref(), Some("report.pdf"));
    }

    #[test]
    fn test_error_display() {
        let err = PdfAskError::LlmError("timeout".to_string());
        assert_eq!(err.to_string(), "LLM error: timeout");
    }
}
