use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Only caller mistakes and genuine internal failures reach this type.
/// Provider outages are absorbed inside the pipeline (see `ProviderError`).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(r) => AppError::UnsupportedMediaType(r.body_text()),
            JsonRejection::BytesRejection(r) if r.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                AppError::PayloadTooLarge("Request body exceeds the size limit".to_string())
            }
            JsonRejection::JsonSyntaxError(r) => {
                AppError::Validation(format!("Request body is not valid JSON: {}", r.body_text()))
            }
            JsonRejection::JsonDataError(r) => {
                AppError::Validation(format!("Request body has the wrong shape: {}", r.body_text()))
            }
            other => AppError::Validation(other.body_text()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", msg.clone())
            }
            AppError::UnsupportedMediaType(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_MEDIA_TYPE",
                msg.clone(),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Failed to analyze resume. Please try again.".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

/// Failure of an external collaborator (embedding or feedback service).
///
/// Always recovered by the pipeline with a fixed fallback value; never mapped to a response.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed provider response: {0}")]
    Malformed(String),

    #[error("Provider returned empty content")]
    EmptyContent,

    #[error("Provider call timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("No provider configured")]
    NotConfigured,

    #[error("Embedding dimensions differ ({left} vs {right})")]
    DimensionMismatch { left: usize, right: usize },
}
