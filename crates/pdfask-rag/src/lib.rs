//! pdfask RAG - Answer generation
//!
//! Two answerers back the ask endpoint:
//! - `SimulatedAnswerer` echoes the question in a fixed template (default)
//! - `RetrievalAnswerer` gathers live news or vector-store context and asks
//!   a local Ollama model (experimental, opt-in)
//!
//! Author: hephaex@gmail.com

use std::sync::Arc;

use pdfask_core::{AnswerMode, AppConfig};
use pdfask_vector::EmbeddingClient;

pub mod answer;
pub mod llm;
pub mod news;

pub use answer::{build_prompt, simulated_answer, Answerer, RetrievalAnswerer, SimulatedAnswerer};
pub use llm::OllamaClient;
pub use news::{ContextSource, NewsClient};

/// Build the answerer selected by `config.answer.mode`
pub fn create_answerer(
    config: &AppConfig,
    embedder: Arc<dyn EmbeddingClient>,
) -> pdfask_core::Result<Arc<dyn Answerer>> {
    match config.answer.mode {
        AnswerMode::Simulated => Ok(Arc::new(SimulatedAnswerer)),
        AnswerMode::Retrieval => {
            let llm = Arc::new(OllamaClient::from_config(&config.llm)?);
            let news: Option<Arc<dyn ContextSource>> = match config.news.api_key {
                Some(_) => Some(Arc::new(NewsClient::from_config(&config.news)?)),
                None => {
                    tracing::warn!("RAPIDAPI_KEY not set; live news context disabled");
                    None
                }
            };
            Ok(Arc::new(RetrievalAnswerer::new(
                llm,
                embedder,
                news,
                config.answer.retrieval_top_k,
            )))
        }
    }
}
