//! Error types for the Search API.
//!
//! The client-visible contract on failure is a non-success status plus a
//! generic error message, never a partial or garbled payload. Details stay
//! in server-side logs.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use vitrine_core::CoreError;

/// Search API errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Upstream search failed: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<CoreError> for ApiError {
    fn from(error: CoreError) -> Self {
        if error.is_validation_error() {
            ApiError::InvalidRequest(error.to_string())
        } else {
            ApiError::Internal(error.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            // Upstream details stay server-side; the client gets a retryable
            // generic message.
            ApiError::Upstream(_) => (
                StatusCode::BAD_GATEWAY,
                "Search is temporarily unavailable".to_string(),
            ),
            ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_maps_to_bad_request() {
        let err: ApiError = CoreError::TooLong {
            field: "q".into(),
            max: 100,
        }
        .into();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }

    #[test]
    fn test_upstream_response_hides_details() {
        let response = ApiError::Upstream("connection reset by peer".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
