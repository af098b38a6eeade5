//! Domain errors for the ragline pipeline.

use thiserror::Error;

/// Domain-level errors that can occur while indexing, retrieving or generating.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A configuration value is out of range or inconsistent
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Input data violates an invariant
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// An API key is required but not configured
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// An external service call failed
    #[error("{service} service failed: {message}")]
    ServiceFailed {
        /// Which service failed
        service: &'static str,
        /// Failure description
        message: String,
    },

    /// An external service answered with something unusable
    #[error("{service} service returned an unexpected response: {message}")]
    UnexpectedResponse {
        /// Which service answered
        service: &'static str,
        /// What was wrong with the response
        message: String,
    },

    /// A vector has the wrong number of components
    #[error("Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimension the index or service expects
        expected: usize,
        /// Dimension received
        actual: usize,
    },

    /// The scoring endpoint is missing, failed or not live in time
    #[error("Endpoint unavailable: {0}")]
    EndpointUnavailable(String),

    /// A model reply was rejected by the answer schema
    #[error("Model reply does not match the answer schema: {reason}")]
    MalformedAnswer {
        /// Why the reply was rejected
        reason: String,
        /// The reply as received
        raw: String,
    },

    /// JSON encoding or decoding failed
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Result alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_failed_display() {
        let err = DomainError::ServiceFailed {
            service: "embedding",
            message: "connection refused".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "embedding service failed: connection refused"
        );
    }

    #[test]
    fn test_from_serde_json() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: DomainError = parse_err.into();
        assert!(matches!(err, DomainError::SerializationError(_)));
    }
}
