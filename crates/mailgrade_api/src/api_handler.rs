//! Shared API types, error handling, and conversions

use axum::{http::StatusCode, response::Json};
use mailgrade_core::{SavedList, ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for single validation
#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    /// Address to validate
    pub email: String,
}

/// Request body for batch submission
#[derive(Debug, Deserialize)]
pub struct SubmitBatchRequest {
    pub name: String,
    #[serde(default)]
    pub tags: String,
    /// Raw, not-yet-deduplicated candidate addresses
    pub emails: Vec<String>,
}

/// Response for single validation: the stored result plus a request id
#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub request_id: String,
    #[serde(flatten)]
    pub result: ValidationResult,
}

/// Response for batch submission
#[derive(Debug, Serialize)]
pub struct SubmitBatchResponse {
    pub request_id: String,
    #[serde(flatten)]
    pub list: SavedList,
}

/// Error response structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    pub request_id: String,
    pub timestamp: String,
}

/// Result type for API handlers
pub type ApiResult<T> = Result<Json<T>, ApiError>;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    InvalidInput(String),
    EmptyBatch,
    NotFound(Uuid),
    InternalError(String),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::InvalidEmail(msg) => ApiError::InvalidInput(msg),
            ValidationError::EmptyBatch => ApiError::EmptyBatch,
            ValidationError::ListNotFound(id) => ApiError::NotFound(id),
            ValidationError::Internal(e) => ApiError::InternalError(e.to_string()),
        }
    }
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_code, message) = match self {
            ApiError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, "INVALID_INPUT", msg),
            ApiError::EmptyBatch => (
                StatusCode::BAD_REQUEST,
                "EMPTY_BATCH",
                "no usable candidates after dedup and filtering".to_string(),
            ),
            ApiError::NotFound(id) => (
                StatusCode::NOT_FOUND,
                "LIST_NOT_FOUND",
                format!("no such list: {id}"),
            ),
            ApiError::InternalError(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg)
            }
        };

        let error_response = ErrorResponse {
            error: message,
            error_code: error_code.to_string(),
            request_id: Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(error_response)).into_response()
    }
}
