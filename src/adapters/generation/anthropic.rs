//! Anthropic Messages API generation client

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use tracing::{debug, instrument};

use super::types::{Message, MessageRequest, MessageResponse};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::GenerationConfig;
use crate::domain::ports::{GenerationClient, GenerationRequest};
use crate::infrastructure::http::client::{build_client, header_value, send_json, trim_base_url};
use crate::infrastructure::logging::redaction::redact_key;

const SERVICE: &str = "generation";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// HTTP client for the Messages API
pub struct AnthropicClient {
    client: reqwest::Client,
    url: String,
}

impl AnthropicClient {
    /// Build a client from configuration; the key falls back to `ANTHROPIC_API_KEY`
    pub fn new(config: &GenerationConfig) -> DomainResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                DomainError::MissingCredentials(
                    "Anthropic API key not set. Set ANTHROPIC_API_KEY env var or configure generation.api_key."
                        .to_string(),
                )
            })?;

        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", header_value(&api_key)?);
        headers.insert("anthropic-version", HeaderValue::from_static(ANTHROPIC_VERSION));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let url = format!("{}/v1/messages", trim_base_url(&config.base_url));
        debug!(%url, key = %redact_key(&api_key), "anthropic client ready");

        Ok(Self {
            client: build_client(config.timeout_secs, headers)?,
            url,
        })
    }
}

#[async_trait]
impl GenerationClient for AnthropicClient {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    #[instrument(skip(self, request), fields(model = %request.sampling.model, turns = request.turns.len()))]
    async fn generate(&self, request: &GenerationRequest) -> DomainResult<String> {
        let body = MessageRequest {
            model: &request.sampling.model,
            system: &request.system,
            messages: request
                .turns
                .iter()
                .map(|turn| Message {
                    role: turn.role.as_str(),
                    content: &turn.content,
                })
                .collect(),
            max_tokens: request.sampling.max_tokens,
            temperature: request.sampling.temperature,
            top_p: request.sampling.top_p,
        };

        let response: MessageResponse = send_json(self.client.post(&self.url).json(&body))
            .await
            .map_err(|e| e.into_domain(SERVICE))?;

        debug!(
            id = response.id.as_deref().unwrap_or("-"),
            stop_reason = response.stop_reason.as_deref().unwrap_or("-"),
            "generation complete"
        );

        let text = response.text();
        if text.trim().is_empty() {
            return Err(DomainError::UnexpectedResponse {
                service: SERVICE,
                message: "reply contained no text".to_string(),
            });
        }

        Ok(text)
    }
}
