//! Embedding clients
//!
//! `FakeEmbedding` maps every input to the same constant vector. It is a
//! stand-in that lets the ingest pipeline run without a model; similarity
//! search over its output carries no signal.

use async_trait::async_trait;
use pdfask_core::EmbeddingConfig;

use crate::Result;

/// Trait for embedding generation
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    /// Generate embedding for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts (batch)
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Get embedding dimension
    fn dimension(&self) -> usize;

    /// Model name for logging
    fn model(&self) -> &str;
}

/// Constant-vector embedder
#[derive(Debug, Clone)]
pub struct FakeEmbedding {
    dimension: usize,
    fill_value: f32,
}

impl FakeEmbedding {
    /// Create a new placeholder embedder
    pub fn new(dimension: usize, fill_value: f32) -> Self {
        Self {
            dimension,
            fill_value,
        }
    }

    /// Create from config
    pub fn from_config(config: &EmbeddingConfig) -> Self {
        Self::new(config.dimension, config.fill_value)
    }

    fn vector(&self) -> Vec<f32> {
        vec![self.fill_value; self.dimension]
    }
}

impl Default for FakeEmbedding {
    fn default() -> Self {
        Self::from_config(&EmbeddingConfig::default())
    }
}

#[async_trait]
impl EmbeddingClient for FakeEmbedding {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Ok(self.vector())
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|_| self.vector()).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model(&self) -> &str {
        "fake"
    }
}
