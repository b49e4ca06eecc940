//! pdfask CLI - Command-line interface
//!
//! Usage:
//!   pdfask ingest <path>
//!   pdfask ask <question> [--document <path>]
//!
//! Author: hephaex@gmail.com

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use pdfask_core::AppConfig;
use pdfask_parser::{LoaderRegistry, RecursiveCharacterSplitter, TextSplitter};
use pdfask_rag::create_answerer;
use pdfask_vector::{EmbeddingClient, FakeEmbedding, InMemoryVectorStore, VectorStore};

#[derive(Parser)]
#[command(name = "pdfask")]
#[command(about = "Ask questions about a PDF from the command line")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse, chunk and embed a document
    Ingest {
        /// Path to the document
        path: PathBuf,
    },
    /// Ask a question
    Ask {
        /// Question to ask
        question: String,

        /// Document to index before answering
        #[arg(short, long)]
        document: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;
    let embedder: Arc<dyn EmbeddingClient> =
        Arc::new(FakeEmbedding::from_config(&config.embedding));

    match cli.command {
        Commands::Ingest { path } => {
            let store = index_document(&config, embedder.as_ref(), &path).await?;
            println!("Ingested {}: {} chunks", path.display(), store.len());
        }
        Commands::Ask { question, document } => {
            let store = match document {
                Some(path) => Some(index_document(&config, embedder.as_ref(), &path).await?),
                None => None,
            };
            let answerer = create_answerer(&config, embedder)?;
            let answer = answerer.answer(&question, store.as_ref()).await?;
            println!("{answer}");
        }
    }

    Ok(())
}

async fn index_document(
    config: &AppConfig,
    embedder: &dyn EmbeddingClient,
    path: &Path,
) -> anyhow::Result<InMemoryVectorStore> {
    let document = LoaderRegistry::with_defaults()
        .load(path)
        .with_context(|| format!("Failed to load {}", path.display()))?;

    let splitter =
        RecursiveCharacterSplitter::new(config.ingest.chunk_size, config.ingest.chunk_overlap);
    let chunks: Vec<_> = splitter
        .split_document(&document)
        .into_iter()
        .map(|chunk| chunk.with_source(path.display().to_string()))
        .collect();

    tracing::info!(
        path = %path.display(),
        pages = document.pages.len(),
        chars = document.char_count(),
        chunks = chunks.len(),
        chunk_size = splitter.chunk_size(),
        chunk_overlap = splitter.chunk_overlap(),
        "Indexed document"
    );

    Ok(InMemoryVectorStore::from_documents(chunks, embedder).await?)
}
