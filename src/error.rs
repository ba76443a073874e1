//! Error types for the chart service
//!
//! Provides the caller-facing error taxonomy using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use thiserror::Error;

use crate::models::ErrorResponse;

// == Chart Error Enum ==
/// Caller-facing error taxonomy of the chart service.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    /// Malformed or out-of-range request; never retried
    #[error("Invalid request: {0}")]
    InvalidInput(String),

    /// Daily quota used up; retry on the next UTC day
    #[error("Rate limit exceeded: {limit} requests per day")]
    QuotaExceeded { limit: u32 },

    /// Provider or computation failure; retryable later
    #[error("Chart computation unavailable: {0}")]
    Unavailable(String),

    /// Caller identity missing from the request
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Anything unexpected
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ChartError {
    /// Stable machine-readable code for the error class.
    pub fn code(&self) -> &'static str {
        match self {
            ChartError::InvalidInput(_) => "invalid-argument",
            ChartError::QuotaExceeded { .. } => "resource-exhausted",
            ChartError::Unavailable(_) => "unavailable",
            ChartError::Unauthenticated(_) => "unauthenticated",
            ChartError::Internal(_) => "internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ChartError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ChartError::QuotaExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            ChartError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ChartError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ChartError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ChartError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse::new(self.to_string(), self.code()));
        (self.status(), body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the chart service.
pub type Result<T> = std::result::Result<T, ChartError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ChartError::InvalidInput("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ChartError::QuotaExceeded { limit: 100 }.status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ChartError::Unavailable("x".into()).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ChartError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_quota_message_carries_limit() {
        let err = ChartError::QuotaExceeded { limit: 42 };
        assert!(err.to_string().contains("42"));
        assert_eq!(err.code(), "resource-exhausted");
    }
}
