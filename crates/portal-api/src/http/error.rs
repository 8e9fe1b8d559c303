//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use portal_types::error::CacheError;

use crate::http::response::{ApiErrorDetail, ApiMeta, ApiResponse};

#[derive(Debug)]
pub enum AppError {
    Cache(CacheError),
    /// Upload request without a single file part.
    NoFilesProvided,
    /// Body could not be parsed as multipart form data.
    MalformedMultipart(String),
    /// A submit or cancel was already accepted for this session.
    SessionClosing,
    Internal(String),
}

impl From<CacheError> for AppError {
    fn from(e: CacheError) -> Self {
        AppError::Cache(e)
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Cache(
                CacheError::InvalidInputFieldId
                | CacheError::NoCacheDirFound(_)
                | CacheError::InvalidFileName(_),
            )
            | AppError::NoFilesProvided
            | AppError::MalformedMultipart(_) => StatusCode::BAD_REQUEST,
            AppError::SessionClosing => StatusCode::CONFLICT,
            AppError::Cache(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Cache(e) => e.key(),
            AppError::NoFilesProvided => "NoFilesProvidedWithUploadRequest",
            AppError::MalformedMultipart(_) => "MalformedMultipartRequest",
            AppError::SessionClosing => "SessionClosing",
            AppError::Internal(_) => "InternalError",
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::Cache(e) => e.to_string(),
            AppError::NoFilesProvided => {
                "No files detected. Verify file(s) submitted with upload request".to_string()
            }
            AppError::MalformedMultipart(reason) => {
                format!("Unable to parse multipart form data: {reason}")
            }
            AppError::SessionClosing => {
                "The portal has already been submitted or cancelled".to_string()
            }
            AppError::Internal(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let mut meta = ApiMeta::new(uuid::Uuid::now_v7().to_string(), 0);
        if let AppError::Cache(CacheError::UnableToRemoveCacheDirContents { outcome, .. }) = &self {
            meta.data = serde_json::to_value(outcome).ok();
        }

        let detail = ApiErrorDetail {
            code: self.code().to_string(),
            title: status.canonical_reason().unwrap_or("Error").to_string(),
            message: self.message(),
        };

        (status, Json(ApiResponse::error(detail, meta))).into_response()
    }
}
