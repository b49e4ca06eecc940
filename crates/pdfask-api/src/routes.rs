//! API route definitions
//!
//! Author: hephaex@gmail.com

use crate::handlers::{ask, upload};
use crate::state::AppState;
use axum::{routing::post, Router};
use std::sync::Arc;

/// Routes mounted under `/api`
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ask", post(ask::ask_handler))
        .route("/upload", post(upload::upload_handler))
}
