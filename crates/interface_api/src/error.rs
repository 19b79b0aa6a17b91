//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use domain_policy::ServiceError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    /// Policy creation produced no policy; answered with an empty body
    #[error("Policy could not be created")]
    CreateRejected,

    /// No policy has the requested id; answered with an empty body
    #[error("Policy not found")]
    PolicyNotFound,

    #[error("Request cancelled")]
    Cancelled,

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::CreateRejected => return StatusCode::BAD_REQUEST.into_response(),
            ApiError::PolicyNotFound => return StatusCode::NOT_FOUND.into_response(),
            ApiError::Cancelled => (
                StatusCode::SERVICE_UNAVAILABLE,
                "cancelled",
                "The request was cancelled".to_string(),
            ),
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone())
            }
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Cancelled => ApiError::Cancelled,
            ServiceError::Store(err) => {
                tracing::error!(error = %err, "Store failure");
                ApiError::Internal("The policy store failed".to_string())
            }
        }
    }
}
