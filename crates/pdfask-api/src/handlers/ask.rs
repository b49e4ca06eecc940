//! Question answering handler
//!
//! Author: hephaex@gmail.com

use crate::error::{ApiError, AppError};
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// Ask request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AskRequest {
    /// Question text; absent, null and empty are all rejected
    #[serde(default)]
    #[schema(example = "What is in the document?")]
    pub question: Option<String>,
}

/// Ask response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AskResponse {
    pub answer: String,
}

/// Answer a question
#[utoipa::path(
    post,
    path = "/api/ask",
    tag = "ask",
    request_body = AskRequest,
    responses(
        (status = 200, description = "Answer generated", body = AskResponse),
        (status = 400, description = "Missing question", body = ApiError),
        (status = 500, description = "Answer generation failed", body = ApiError)
    )
)]
pub async fn ask_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<AskResponse>, AppError> {
    state.increment_requests();

    let question = parse_question(&headers, &body)?
        .filter(|q| !q.is_empty())
        .ok_or_else(AppError::missing_question)?;

    tracing::info!(question = %question, "Received question");

    let store = state.current_store().await;
    let answer = state.answerer.answer(&question, store.as_deref()).await?;

    tracing::debug!(answer_len = answer.len(), "Answer generated");

    Ok(Json(AskResponse { answer }))
}

/// Pull the question out of a JSON body
///
/// An empty body, or one not declared as JSON, carries no question at all.
fn parse_question(headers: &HeaderMap, body: &Bytes) -> Result<Option<String>, AppError> {
    if body.is_empty() || !is_json(headers) {
        return Ok(None);
    }

    Json::<AskRequest>::from_bytes(body)
        .map(|Json(request)| request.question)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| {
            let mime = mime.trim().to_ascii_lowercase();
            mime == "application/json"
                || (mime.starts_with("application/") && mime.ends_with("+json"))
        })
        .unwrap_or(false)
}
