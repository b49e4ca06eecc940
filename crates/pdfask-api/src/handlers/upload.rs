//! PDF upload handler
//!
//! The uploaded file is spooled to a temporary file under the upload
//! directory, parsed off the async runtime, chunked, embedded and swapped in
//! as the current vector store. The spooled file is removed on every path.
//!
//! Author: hephaex@gmail.com

use crate::error::{ApiError, AppError};
use crate::state::AppState;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use pdfask_vector::{InMemoryVectorStore, VectorStore};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use utoipa::ToSchema;

/// Form field carrying the PDF
pub const FILE_FIELD: &str = "file";

/// Returned after a successful upload
pub const UPLOAD_SUCCESS: &str = "✅ PDF uploaded and embedded successfully.";

/// Multipart upload form
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    /// PDF document
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

/// Upload response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    #[schema(example = "✅ PDF uploaded and embedded successfully.")]
    pub status: String,
}

/// Uploaded file spooled to disk
struct SpooledUpload {
    file_name: String,
    size: usize,
    file: NamedTempFile,
}

/// Upload a PDF and make it the current document
#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "upload",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "PDF indexed", body = UploadResponse),
        (status = 400, description = "No file uploaded", body = ApiError),
        (status = 500, description = "Parsing or indexing failed", body = ApiError)
    )
)]
pub async fn upload_handler(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    state.increment_requests();

    let mut multipart = multipart.map_err(|rejection| {
        tracing::debug!(rejection = %rejection.body_text(), "Request is not multipart");
        AppError::no_file_uploaded()
    })?;

    let upload = spool_file_field(&mut multipart, &state.config.ingest.upload_dir)
        .await?
        .ok_or_else(AppError::no_file_uploaded)?;

    tracing::info!(
        file = %upload.file_name,
        size = upload.size,
        path = %upload.file.path().display(),
        "Received upload"
    );

    let store = index_upload(&state, &upload).await?;

    if let Err(e) = upload.file.close() {
        tracing::warn!(error = %e, "Failed to remove spooled upload");
    }

    let chunk_count = store.len();
    let store_id = store.id();
    state.replace_store(store).await;

    tracing::info!(%store_id, chunks = chunk_count, "Vector store replaced");

    Ok(Json(UploadResponse {
        status: UPLOAD_SUCCESS.to_string(),
    }))
}

/// Write the first `file` field to a temp file; other fields are skipped
async fn spool_file_field(
    multipart: &mut Multipart,
    upload_dir: &Path,
) -> Result<Option<SpooledUpload>, AppError> {
    while let Some(mut field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };

        tokio::fs::create_dir_all(upload_dir).await?;
        let temp = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(".pdf")
            .tempfile_in(upload_dir)?;

        let mut writer = tokio::fs::OpenOptions::new()
            .write(true)
            .open(temp.path())
            .await?;
        let mut size = 0;
        while let Some(bytes) = field.chunk().await? {
            size += bytes.len();
            writer.write_all(&bytes).await?;
        }
        writer.flush().await?;

        return Ok(Some(SpooledUpload {
            file_name,
            size,
            file: temp,
        }));
    }

    Ok(None)
}

/// Parse, split and embed the spooled file
async fn index_upload(
    state: &AppState,
    upload: &SpooledUpload,
) -> Result<InMemoryVectorStore, AppError> {
    let loader = state.loader.clone();
    let splitter = state.splitter.clone();
    let path = upload.file.path().to_path_buf();

    let chunks = tokio::task::spawn_blocking(move || {
        loader
            .load(&path)
            .map(|document| splitter.split_document(&document))
    })
    .await
    .map_err(|e| AppError::Internal(format!("PDF parsing task failed: {e}")))??;

    let chunks = chunks
        .into_iter()
        .map(|chunk| chunk.with_source(upload.file_name.as_str()))
        .collect();

    Ok(InMemoryVectorStore::from_documents(chunks, state.embedder.as_ref()).await?)
}
