//! Error handling module for the Recipe Box backend.
//!
//! Provides centralized error types with mapping to HTTP status codes and response envelopes.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::ingest::PipelineError;

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const UNAUTHENTICATED: &str = "UNAUTHENTICATED";
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const FORBIDDEN: &str = "FORBIDDEN";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const INVALID_INPUT: &str = "INVALID_INPUT";
    pub const INVALID_IMAGE_DATA: &str = "INVALID_IMAGE_DATA";
    pub const UPLOAD_FAILURE: &str = "UPLOAD_FAILURE";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

/// Message returned to clients for internal failures. Details only go to the log.
pub const GENERIC_INTERNAL_MESSAGE: &str = "Internal Server Error";

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Ingredient payload was not a string
    InvalidInput(String),
    /// Inline image payload did not match `data:<mime>;base64,<payload>`
    InvalidImageData(String),
    /// Decoding or storing an image failed
    UploadFailure(String),
    /// Create/update failed; carries the underlying cause
    Validation(String),
    /// Recipe missing
    NotFound(String),
    /// Collection is empty on list (reported as a bad request)
    EmptyCollection(String),
    /// Caller did not present the gateway key
    Unauthorized(String),
    /// Action requires a signed-in user
    Unauthenticated(String),
    /// Signed-in user may not touch this recipe
    Forbidden(String),
    /// Anything unexpected; the detail is logged, never returned
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_)
            | AppError::InvalidImageData(_)
            | AppError::UploadFailure(_)
            | AppError::Validation(_)
            | AppError::EmptyCollection(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) | AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => codes::INVALID_INPUT,
            AppError::InvalidImageData(_) => codes::INVALID_IMAGE_DATA,
            AppError::UploadFailure(_) => codes::UPLOAD_FAILURE,
            AppError::Validation(_) => codes::VALIDATION_ERROR,
            AppError::NotFound(_) | AppError::EmptyCollection(_) => codes::NOT_FOUND,
            AppError::Unauthorized(_) => codes::UNAUTHORIZED,
            AppError::Unauthenticated(_) => codes::UNAUTHENTICATED,
            AppError::Forbidden(_) => codes::FORBIDDEN,
            AppError::Internal(_) => codes::INTERNAL_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::InvalidInput(msg)
            | AppError::InvalidImageData(msg)
            | AppError::UploadFailure(msg)
            | AppError::Validation(msg)
            | AppError::NotFound(msg)
            | AppError::EmptyCollection(msg)
            | AppError::Unauthorized(msg)
            | AppError::Unauthenticated(msg)
            | AppError::Forbidden(msg)
            | AppError::Internal(msg) => msg.clone(),
        }
    }

    /// Message safe to hand to a client.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Internal(_) => GENERIC_INTERNAL_MESSAGE.to_string(),
            other => other.message(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {:?}", err);
        AppError::Internal(format!("Database error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        AppError::Internal(format!("JSON error: {}", err))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::InvalidInput(_) => AppError::InvalidInput(err.to_string()),
            PipelineError::InvalidImageData(_) => AppError::InvalidImageData(err.to_string()),
            PipelineError::UploadFailure(_) => AppError::UploadFailure(err.to_string()),
        }
    }
}

/// Error details in the response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
}

/// Error response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetails,
}

impl ErrorResponse {
    pub fn new(error: &AppError) -> Self {
        Self {
            success: false,
            error: ErrorDetails {
                code: error.error_code().to_string(),
                message: error.public_message(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Internal(detail) = &self {
            tracing::error!("Internal error: {}", detail);
        }
        let status = self.status_code();
        let body = ErrorResponse::new(&self);
        (status, Json(body)).into_response()
    }
}
