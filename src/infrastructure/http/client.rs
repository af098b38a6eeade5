//! Shared JSON-over-HTTP plumbing for the model service adapters

use std::time::Duration;

use reqwest::{header, Client as ReqwestClient, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::errors::ApiError;
use crate::domain::errors::{DomainError, DomainResult};
use crate::infrastructure::logging::redaction::scrub_message;

/// Build a pooled HTTP client with the given default headers and timeout
pub fn build_client(timeout_secs: u64, headers: header::HeaderMap) -> DomainResult<ReqwestClient> {
    ReqwestClient::builder()
        .pool_max_idle_per_host(10)
        .timeout(Duration::from_secs(timeout_secs))
        .tcp_nodelay(true)
        .default_headers(headers)
        .build()
        .map_err(|e| DomainError::InvalidConfig(format!("Failed to build HTTP client: {e}")))
}

/// Build a header value, rejecting keys with characters HTTP cannot carry
pub fn header_value(value: &str) -> DomainResult<header::HeaderValue> {
    header::HeaderValue::from_str(value)
        .map_err(|e| DomainError::InvalidConfig(format!("Invalid header value: {e}")))
}

/// Send a request and decode a successful JSON body
pub async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
    let response = request.send().await?;
    let response = check_status(response).await?;
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

/// Turn a non-success response into a classified error
pub async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();

    debug!("Response status: {}", status);

    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read error body".to_string());

    warn!("API error ({}): {}", status, scrub_message(&body));

    Err(ApiError::from_status(status, body))
}

/// Strip a trailing slash so paths can be appended with `format!`
pub fn trim_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_base_url() {
        assert_eq!(trim_base_url("https://api.cohere.com/"), "https://api.cohere.com");
        assert_eq!(trim_base_url("http://localhost:1234"), "http://localhost:1234");
    }

    #[test]
    fn test_header_value_rejects_newlines() {
        assert!(header_value("Bearer abc").is_ok());
        assert!(header_value("bad\nkey").is_err());
    }

    #[tokio::test]
    async fn test_send_json_classifies_errors() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/thing")
            .with_status(503)
            .with_body("overloaded")
            .create_async()
            .await;

        let client = build_client(5, header::HeaderMap::new()).unwrap();
        let result: Result<serde_json::Value, ApiError> =
            send_json(client.get(format!("{}/thing", server.url()))).await;

        assert!(matches!(result, Err(ApiError::ServerError(_, body)) if body == "overloaded"));
    }
}
