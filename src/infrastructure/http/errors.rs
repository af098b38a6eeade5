//! HTTP error classification

use reqwest::StatusCode;
use thiserror::Error;

use crate::domain::errors::DomainError;

/// Errors that can occur when calling an external model service over HTTP
#[derive(Error, Debug)]
pub enum ApiError {
    /// Invalid request parameters (HTTP 400, 422)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid or missing API key (HTTP 401)
    #[error("Invalid API key - authentication failed")]
    InvalidApiKey,

    /// Forbidden - permission denied (HTTP 403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource not found (HTTP 404)
    #[error("Resource not found")]
    NotFound,

    /// Rate limit exceeded (HTTP 429)
    #[error("Rate limit exceeded - too many requests")]
    RateLimitExceeded,

    /// Server error from the service (HTTP 5xx)
    #[error("Server error ({0}): {1}")]
    ServerError(StatusCode, String),

    /// Network or connection error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Unknown or unexpected error
    #[error("Unknown error ({0}): {1}")]
    UnknownError(StatusCode, String),
}

impl ApiError {
    /// Classify a non-success response
    pub fn from_status(status: StatusCode, body: String) -> Self {
        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Self::InvalidRequest(body),
            StatusCode::UNAUTHORIZED => Self::InvalidApiKey,
            StatusCode::FORBIDDEN => Self::Forbidden(body),
            StatusCode::NOT_FOUND => Self::NotFound,
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimitExceeded,
            status if status.is_server_error() => Self::ServerError(status, body),
            _ => Self::UnknownError(status, body),
        }
    }

    /// Attach the failing service name and convert into a domain error
    pub fn into_domain(self, service: &'static str) -> DomainError {
        match self {
            Self::JsonError(e) => DomainError::UnexpectedResponse {
                service,
                message: e.to_string(),
            },
            other => DomainError::ServiceFailed {
                service,
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_REQUEST, "bad".to_string()),
            ApiError::InvalidRequest(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, String::new()),
            ApiError::InvalidApiKey
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, String::new()),
            ApiError::RateLimitExceeded
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_GATEWAY, "upstream".to_string()),
            ApiError::ServerError(StatusCode::BAD_GATEWAY, _)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::IM_A_TEAPOT, String::new()),
            ApiError::UnknownError(_, _)
        ));
    }

    #[test]
    fn test_into_domain() {
        let err = ApiError::ServerError(StatusCode::SERVICE_UNAVAILABLE, "down".to_string())
            .into_domain("rerank");
        match err {
            DomainError::ServiceFailed { service, message } => {
                assert_eq!(service, "rerank");
                assert!(message.contains("down"));
            }
            other => panic!("Expected ServiceFailed, got {other:?}"),
        }
    }
}
