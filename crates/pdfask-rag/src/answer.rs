//! Answerers behind the ask endpoint

use std::sync::Arc;

use async_trait::async_trait;
use pdfask_core::{AnswerMode, LlmClient, Result};
use pdfask_vector::{EmbeddingClient, InMemoryVectorStore};
use tracing::{debug, info};

use crate::news::ContextSource;

/// Produces an answer for a question, optionally using the current store
#[async_trait]
pub trait Answerer: Send + Sync {
    /// Answer `question`; `store` is the most recently uploaded document, if any
    async fn answer(&self, question: &str, store: Option<&InMemoryVectorStore>) -> Result<String>;

    /// Mode this answerer implements
    fn mode(&self) -> AnswerMode;
}

/// Template used by the simulated answerer
pub fn simulated_answer(question: &str) -> String {
    format!("🧠 Simulated AI: You asked — \"{question}\". Here's a pretend answer!")
}

/// Echoes the question in a fixed template; never reads the store
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedAnswerer;

#[async_trait]
impl Answerer for SimulatedAnswerer {
    async fn answer(&self, question: &str, _store: Option<&InMemoryVectorStore>) -> Result<String> {
        Ok(simulated_answer(question))
    }

    fn mode(&self) -> AnswerMode {
        AnswerMode::Simulated
    }
}

/// Live news first, vector store second, then a local LLM
pub struct RetrievalAnswerer {
    llm: Arc<dyn LlmClient>,
    embedder: Arc<dyn EmbeddingClient>,
    news: Option<Arc<dyn ContextSource>>,
    top_k: usize,
}

impl RetrievalAnswerer {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        embedder: Arc<dyn EmbeddingClient>,
        news: Option<Arc<dyn ContextSource>>,
        top_k: usize,
    ) -> Self {
        Self {
            llm,
            embedder,
            news,
            top_k,
        }
    }

    async fn gather_context(
        &self,
        question: &str,
        store: Option<&InMemoryVectorStore>,
    ) -> Result<Option<String>> {
        if let Some(news) = &self.news {
            if let Some(context) = news.context_for(question).await {
                return Ok(Some(context));
            }
        }

        let Some(store) = store else {
            return Ok(None);
        };

        let results = store
            .similarity_search(question, self.top_k, self.embedder.as_ref())
            .await?;
        debug!(hits = results.len(), store = %store.id(), "Vector fallback context");

        let context = results
            .iter()
            .map(|r| r.chunk.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        Ok((!context.is_empty()).then_some(context))
    }
}

/// Prompt sent to the model; the bare question when there is no context
pub fn build_prompt(question: &str, context: Option<&str>) -> String {
    match context {
        Some(context) => format!(
            "Answer the question using the context below:\n\n{context}\n\nQuestion: {question}"
        ),
        None => question.to_string(),
    }
}

#[async_trait]
impl Answerer for RetrievalAnswerer {
    async fn answer(&self, question: &str, store: Option<&InMemoryVectorStore>) -> Result<String> {
        let context = self.gather_context(question, store).await?;
        info!(
            has_context = context.is_some(),
            model = self.llm.model(),
            "Querying LLM"
        );

        let prompt = build_prompt(question, context.as_deref());
        self.llm.generate(&prompt).await
    }

    fn mode(&self) -> AnswerMode {
        AnswerMode::Retrieval
    }
}
