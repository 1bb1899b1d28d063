//! Error types for the Cambia server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::convert::ConvertError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
///
/// Clients only ever see the `{success: false, message}` envelope; the
/// original error class is not preserved beyond the message string.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("No files uploaded.")]
    NoFilesProvided,

    #[error("{0}")]
    UnsupportedConversion(String),

    #[error("Conversion failed: {0}")]
    ConversionFailed(#[from] ConvertError),

    #[error("Invalid multipart request: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body, matching the success envelope shape
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NoFilesProvided
            | AppError::UnsupportedConversion(_)
            | AppError::Multipart(_) => StatusCode::BAD_REQUEST,
            AppError::ConversionFailed(e) => {
                tracing::error!("Conversion error: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Io(e) => {
                tracing::error!("IO error: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(ErrorResponse {
            success: false,
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}
