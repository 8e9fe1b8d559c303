//! File upload and cache reset endpoints.

use std::time::Instant;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Path, State};
use axum::Json;

use portal_core::cache::IncomingFile;
use portal_types::error::CacheError;
use portal_types::outcome::{ResetOutcome, UploadOutcome};

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::PortalState;

/// Read every file part of the request into memory.
///
/// Parts without a file name are form values, not files, and are skipped.
/// Browsers send an empty file name for a file input left blank.
async fn collect_files(mut multipart: Multipart) -> Result<Vec<IncomingFile>, AppError> {
    let mut files = Vec::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) if files.is_empty() => return Err(AppError::MalformedMultipart(e.body_text())),
            Err(e) => {
                tracing::warn!(error = %e, "Multipart stream ended early");
                break;
            }
        };

        let Some(file_name) = field
            .file_name()
            .filter(|name| !name.is_empty())
            .map(str::to_string)
        else {
            continue;
        };
        let part_name = field.name().unwrap_or_default().to_string();

        let contents = field.bytes().await.map(|b| b.to_vec()).map_err(|e| e.body_text());
        let truncated = contents.is_err();
        files.push(IncomingFile {
            part_name,
            file_name,
            contents,
        });
        if truncated {
            break;
        }
    }

    Ok(files)
}

/// POST /upload - store files into their fields' cache directories.
pub async fn upload_files(
    State(state): State<PortalState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ApiResponse<UploadOutcome>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let multipart = multipart.map_err(|e| AppError::MalformedMultipart(e.body_text()))?;
    let files = collect_files(multipart).await?;
    if files.is_empty() {
        tracing::error!("No files detected in upload request");
        return Err(AppError::NoFilesProvided);
    }

    tracing::info!(total = files.len(), "Uploading file(s)");
    let outcome = state.context.cache.store_batch(files).await;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(ApiResponse::success(outcome, request_id, elapsed)))
}

/// POST /upload/reset/{label} - delete every file cached for a field.
pub async fn reset_upload(
    State(state): State<PortalState>,
    Path(label): Path<String>,
) -> Result<Json<ApiResponse<ResetOutcome>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let outcome = state.context.cache.reset_field(&label).await?;
    let elapsed = start.elapsed().as_millis() as u64;

    Ok(Json(ApiResponse::success(outcome, request_id, elapsed)))
}

/// POST /upload/reset - reset request without a field label.
pub async fn reset_upload_without_label() -> AppError {
    tracing::error!("Input field label not found in request");
    AppError::Cache(CacheError::InvalidInputFieldId)
}
