//! pdfask API Server
//!
//! Upload a PDF, then ask questions about it.
//!
//! Author: hephaex@gmail.com

use pdfask_api::{create_router, init_tracing, state::AppState};
use pdfask_core::AppConfig;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration; PDFASK_CONFIG points at an optional TOML file
    let config = match std::env::var("PDFASK_CONFIG") {
        Ok(path) => AppConfig::from_file(path)?.with_env_override()?,
        Err(_) => AppConfig::from_env()?,
    };

    init_tracing(&config.logging);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!(
        mode = ?config.answer.mode,
        upload_dir = %config.ingest.upload_dir.display(),
        "Loaded configuration"
    );

    // Create application state
    let state = Arc::new(AppState::new(config)?);

    // Create router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Server running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);
    tracing::info!("OpenAPI spec at http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
