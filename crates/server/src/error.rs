// crates/server/src/error.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use plotgrid_store::StoreError;

/// Structured JSON error response for API errors
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

/// API error types that map to HTTP status codes
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing required parameters: {0}")]
    MissingParameters(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Plot not found: {0}")]
    PlotNotFound(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = match &self {
            ApiError::MissingParameters(params) => {
                tracing::warn!(params = %params, "Missing required parameters");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::with_details("Missing required parameters", params.clone()),
                )
            }
            ApiError::BadRequest(msg) => {
                tracing::warn!(message = %msg, "Bad request");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::with_details("Bad request", msg.clone()),
                )
            }
            ApiError::PlotNotFound(key) => {
                tracing::warn!(plot_key = %key, "Plot not found");
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse::with_details("Plot not found", format!("Plot key: {}", key)),
                )
            }
            ApiError::Store(store_err) => match store_err {
                StoreError::NotFound { key } => {
                    tracing::warn!(key = %key, "Object not found");
                    (
                        StatusCode::NOT_FOUND,
                        ErrorResponse::with_details("Plot not found", format!("Plot key: {}", key)),
                    )
                }
                StoreError::Metadata { message } => {
                    tracing::error!(error = %message, "Metadata index error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ErrorResponse::with_details("Metadata index error", message.clone()),
                    )
                }
                StoreError::Artifact { message } => {
                    tracing::error!(error = %message, "Artifact store error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ErrorResponse::with_details("Artifact store error", message.clone()),
                    )
                }
                StoreError::Malformed { message } => {
                    tracing::error!(error = %message, "Malformed stored record");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ErrorResponse::with_details("Malformed stored record", message.clone()),
                    )
                }
            },
            ApiError::Internal(msg) => {
                tracing::error!(message = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("Internal server error"),
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
