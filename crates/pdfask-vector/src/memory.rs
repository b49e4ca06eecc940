//! In-memory vector store
//!
//! Built once from a batch of chunks and never mutated afterwards; a new
//! upload builds a new store instead. Search is brute-force cosine
//! similarity. Ties keep insertion order, so with constant embeddings a
//! search returns the first `limit` chunks of the document.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pdfask_core::{DocumentChunk, SearchResult};
use tracing::debug;
use uuid::Uuid;

use crate::{EmbeddingClient, Result, VectorError, VectorStore};

struct StoredVector {
    chunk: DocumentChunk,
    vector: Vec<f32>,
}

/// Immutable in-memory index over (chunk, vector) pairs
pub struct InMemoryVectorStore {
    id: Uuid,
    created_at: DateTime<Utc>,
    dimension: usize,
    entries: Vec<StoredVector>,
}

impl InMemoryVectorStore {
    /// Embed `chunks` with `embedder` and index them
    pub async fn from_documents(
        chunks: Vec<DocumentChunk>,
        embedder: &dyn EmbeddingClient,
    ) -> Result<Self> {
        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let vectors = embedder.embed_batch(&texts).await?;

        debug!(
            chunks = chunks.len(),
            model = embedder.model(),
            "Embedded chunks"
        );

        Self::from_vectors(chunks, vectors, embedder.dimension())
    }

    /// Index precomputed vectors; every vector must have `dimension` elements
    pub fn from_vectors(
        chunks: Vec<DocumentChunk>,
        vectors: Vec<Vec<f32>>,
        dimension: usize,
    ) -> Result<Self> {
        if chunks.len() != vectors.len() {
            return Err(VectorError::CountMismatch {
                chunks: chunks.len(),
                vectors: vectors.len(),
            });
        }
        if let Some(bad) = vectors.iter().find(|v| v.len() != dimension) {
            return Err(VectorError::DimensionMismatch {
                expected: dimension,
                actual: bad.len(),
            });
        }

        let entries = chunks
            .into_iter()
            .zip(vectors)
            .map(|(chunk, vector)| StoredVector { chunk, vector })
            .collect();

        Ok(Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            dimension,
            entries,
        })
    }

    /// Embed `query` and return the `limit` most similar chunks
    pub async fn similarity_search(
        &self,
        query: &str,
        limit: usize,
        embedder: &dyn EmbeddingClient,
    ) -> Result<Vec<SearchResult>> {
        let query_vector = embedder.embed(query).await?;
        self.search(&query_vector, limit).await
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Indexed chunks in insertion order
    pub fn chunks(&self) -> impl Iterator<Item = &DocumentChunk> {
        self.entries.iter().map(|e| &e.chunk)
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn search(&self, query_vector: &[f32], limit: usize) -> Result<Vec<SearchResult>> {
        if query_vector.len() != self.dimension {
            return Err(VectorError::DimensionMismatch {
                expected: self.dimension,
                actual: query_vector.len(),
            });
        }

        let mut scored: Vec<(f32, &StoredVector)> = self
            .entries
            .iter()
            .map(|e| (cosine_sim(query_vector, &e.vector), e))
            .collect();
        // Stable sort keeps insertion order among equal scores
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        Ok(scored
            .into_iter()
            .take(limit)
            .map(|(score, e)| SearchResult {
                chunk: e.chunk.clone(),
                score,
                store_id: self.id,
            })
            .collect())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

fn cosine_sim(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if mag_a < f32::EPSILON || mag_b < f32::EPSILON {
        0.0
    } else {
        dot / (mag_a * mag_b)
    }
}
