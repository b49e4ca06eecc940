//! pdfask Vector - Embeddings and vector storage
//!
//! Provides the embedding abstraction, the constant placeholder embedder
//! used by uploads, and an in-memory store searched by cosine similarity.

use async_trait::async_trait;
use pdfask_core::{PdfAskError, SearchResult};
use thiserror::Error;

pub mod embedding;
pub mod memory;

pub use embedding::{EmbeddingClient, FakeEmbedding};
pub use memory::InMemoryVectorStore;

/// Errors raised while embedding or indexing
#[derive(Error, Debug)]
pub enum VectorError {
    #[error("Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Got {vectors} vectors for {chunks} chunks")]
    CountMismatch { chunks: usize, vectors: usize },

    #[error("Embedding failed: {0}")]
    Embedding(String),
}

pub type Result<T> = std::result::Result<T, VectorError>;

impl From<VectorError> for PdfAskError {
    fn from(err: VectorError) -> Self {
        PdfAskError::SearchError(err.to_string())
    }
}

/// Trait for vector store queries
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Search for the `limit` nearest chunks to a query vector
    async fn search(&self, query_vector: &[f32], limit: usize) -> Result<Vec<SearchResult>>;

    /// Number of indexed chunks
    fn len(&self) -> usize;

    /// Whether the store holds no chunks
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
