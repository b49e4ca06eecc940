//! Application state management
//!
//! Author: hephaex@gmail.com

use pdfask_core::AppConfig;
use pdfask_parser::{DocumentLoader, PdfLoader, RecursiveCharacterSplitter, TextSplitter};
use pdfask_rag::{create_answerer, Answerer};
use pdfask_vector::{EmbeddingClient, FakeEmbedding, InMemoryVectorStore};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

/// Application state shared across handlers
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Server start time
    pub start_time: Instant,
    /// Request counter
    pub request_count: AtomicU64,
    /// Successful upload counter
    pub upload_count: AtomicU64,
    /// Store built from the most recent upload; replaced wholesale
    pub vector_store: RwLock<Option<Arc<InMemoryVectorStore>>>,
    /// Extracts page text from uploaded files
    pub loader: Arc<dyn DocumentLoader>,
    /// Splits page text into chunks
    pub splitter: Arc<dyn TextSplitter>,
    /// Embeds chunks and queries
    pub embedder: Arc<dyn EmbeddingClient>,
    /// Backs `/api/ask`
    pub answerer: Arc<dyn Answerer>,
}

impl AppState {
    /// Create new application state with config
    pub fn new(config: AppConfig) -> pdfask_core::Result<Self> {
        let embedder: Arc<dyn EmbeddingClient> =
            Arc::new(FakeEmbedding::from_config(&config.embedding));
        let answerer = create_answerer(&config, embedder.clone())?;
        let splitter = Arc::new(RecursiveCharacterSplitter::new(
            config.ingest.chunk_size,
            config.ingest.chunk_overlap,
        ));

        Ok(Self {
            config,
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
            upload_count: AtomicU64::new(0),
            vector_store: RwLock::new(None),
            loader: Arc::new(PdfLoader::new()),
            splitter,
            embedder,
            answerer,
        })
    }

    /// Replace the document loader
    pub fn with_loader(mut self, loader: Arc<dyn DocumentLoader>) -> Self {
        self.loader = loader;
        self
    }

    /// Replace the answerer
    pub fn with_answerer(mut self, answerer: Arc<dyn Answerer>) -> Self {
        self.answerer = answerer;
        self
    }

    /// Increment request counter
    pub fn increment_requests(&self) -> u64 {
        self.request_count.fetch_add(1, Ordering::SeqCst)
    }

    /// Get total request count
    pub fn get_request_count(&self) -> u64 {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Get successful upload count
    pub fn get_upload_count(&self) -> u64 {
        self.upload_count.load(Ordering::SeqCst)
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Snapshot of the current store
    pub async fn current_store(&self) -> Option<Arc<InMemoryVectorStore>> {
        self.vector_store.read().await.clone()
    }

    /// Install a freshly built store, returning the one it supersedes
    pub async fn replace_store(
        &self,
        store: InMemoryVectorStore,
    ) -> Option<Arc<InMemoryVectorStore>> {
        self.upload_count.fetch_add(1, Ordering::SeqCst);
        self.vector_store.write().await.replace(Arc::new(store))
    }
}
