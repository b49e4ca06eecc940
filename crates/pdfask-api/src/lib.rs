//! pdfask API - HTTP server
//!
//! Provides REST endpoints for uploading a PDF and asking questions about it.
//!
//! Author: hephaex@gmail.com

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

use axum::{extract::DefaultBodyLimit, http::HeaderValue, routing::get, Router};
use pdfask_core::{LoggingConfig, ServerConfig};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::state::AppState;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "pdfask API",
        version = "0.1.0",
        description = "Upload a PDF and ask questions about it",
        contact(name = "hephaex", email = "hephaex@gmail.com"),
        license(name = "Apache-2.0")
    ),
    paths(
        handlers::ask::ask_handler,
        handlers::upload::upload_handler,
        handlers::health::health_check,
        handlers::health::readiness_check,
        handlers::health::metrics,
    ),
    components(schemas(
        error::ApiError,
        handlers::ask::AskRequest,
        handlers::ask::AskResponse,
        handlers::upload::UploadForm,
        handlers::upload::UploadResponse,
        handlers::health::HealthResponse,
        handlers::health::BuildInfo,
        handlers::health::ReadinessResponse,
        handlers::health::MetricsResponse,
    )),
    tags(
        (name = "ask", description = "Question answering"),
        (name = "upload", description = "Document upload and indexing"),
        (name = "health", description = "Health checks")
    )
)]
pub struct ApiDoc;

/// Create the main application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.server);
    let body_limit = DefaultBodyLimit::max(state.config.server.max_body_size);

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/metrics", get(handlers::health::metrics))
        .nest("/api", routes::api_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(body_limit)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Any origin when none are configured, otherwise exactly the listed ones
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.cors_origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    cors.allow_origin(origins)
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins over the configured level when set.
pub fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},tower_http=debug", config.level)));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.json_format {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_endpoints() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        assert!(paths.iter().any(|p| p.as_str() == "/api/ask"));
        assert!(paths.iter().any(|p| p.as_str() == "/api/upload"));
        assert!(paths.iter().any(|p| p.as_str() == "/health"));
    }
}
