//! API error handling
//!
//! Every failure leaves the server as `{ "error": <message> }`: client
//! errors carry a fixed message, server errors the underlying one.
//!
//! Author: hephaex@gmail.com

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pdfask_core::PdfAskError;
use pdfask_parser::ParserError;
use pdfask_vector::VectorError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Returned by `/api/ask` without a question
pub const MISSING_QUESTION: &str = "Missing question.";

/// Returned by `/api/upload` without a file
pub const NO_FILE_UPLOADED: &str = "No file uploaded.";

/// API error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Human-readable message
    #[schema(example = "Missing question.")]
    pub error: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Internal(String),
}

impl AppError {
    pub fn missing_question() -> Self {
        AppError::BadRequest(MISSING_QUESTION.to_string())
    }

    pub fn no_file_uploaded() -> Self {
        AppError::BadRequest(NO_FILE_UPLOADED.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => {
                tracing::warn!(error = %msg, "Rejected request");
                (StatusCode::BAD_REQUEST, msg)
            }
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(ApiError::new(message))).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        AppError::Internal(err.body_text())
    }
}

impl From<ParserError> for AppError {
    fn from(err: ParserError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<VectorError> for AppError {
    fn from(err: VectorError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<PdfAskError> for AppError {
    fn from(err: PdfAskError) -> Self {
        match err {
            PdfAskError::ValidationError(msg) => AppError::BadRequest(msg),
            PdfAskError::LlmError(msg) => AppError::Internal(msg),
            other => AppError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_bad_request_shape() {
        let response = AppError::missing_question().into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"error": "Missing question."})
        );
    }

    #[tokio::test]
    async fn test_internal_passes_message_through() {
        let err: AppError = ParserError::PdfError("bad xref".to_string()).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await["error"],
            "PDF parsing error: bad xref"
        );
    }

    #[test]
    fn test_llm_error_message_unwrapped() {
        let err: AppError = PdfAskError::LlmError("Failed to parse LLM response.".to_string()).into();
        assert!(matches!(err, AppError::Internal(ref m) if m == "Failed to parse LLM response."));
    }
}
