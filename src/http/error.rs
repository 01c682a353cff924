//! HTTP error handling and response types.

use crate::error::PrepError;
use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// API error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// Malformed request: missing form field or unreadable multipart body
    BadRequest(String),
    /// Failure from a core operation
    Prep(PrepError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Prep(err) if err.is_client_error() => StatusCode::BAD_REQUEST,
            Self::Prep(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ApiError {
        match self {
            Self::BadRequest(msg) => ApiError::new("BAD_REQUEST", msg.clone()),
            Self::Prep(err) => ApiError::new(err.code(), err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = self.body();
        if status.is_server_error() {
            tracing::error!("{} {}: {}", status.as_u16(), error.code, error.message);
        } else {
            tracing::warn!("{} {}: {}", status.as_u16(), error.code, error.message);
        }
        (status, Json(error)).into_response()
    }
}

impl From<PrepError> for AppError {
    fn from(err: PrepError) -> Self {
        Self::Prep(err)
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        Self::BadRequest(err.body_text())
    }
}
