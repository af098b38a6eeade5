//! Cohere embedding provider adapter.
//!
//! Talks to a Cohere-compatible `/v1/embed` endpoint. The request carries the
//! input type so asymmetric models embed indexed chunks and queries
//! differently.

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Embedding, EmbeddingConfig, InputType};
use crate::domain::ports::EmbeddingProvider;
use crate::infrastructure::http::client::{build_client, header_value, send_json, trim_base_url};
use crate::infrastructure::logging::redaction::redact_key;

const SERVICE: &str = "embedding";

/// Hard per-request limit of the Cohere embed API
const COHERE_MAX_TEXTS: usize = 96;

/// Configuration for the Cohere embedding provider.
#[derive(Debug, Clone)]
pub struct CohereEmbeddingConfig {
    /// API key. Falls back to `CO_API_KEY` env var.
    pub api_key: Option<String>,
    /// Base URL for the API. Default: `https://api.cohere.com`.
    pub base_url: String,
    /// Embedding model. Default: `embed-multilingual-v3.0`.
    pub model: String,
    /// Expected embedding dimension. Default: 1024.
    pub dimension: usize,
    /// Request timeout in seconds. Default: 60.
    pub timeout_secs: u64,
}

impl Default for CohereEmbeddingConfig {
    fn default() -> Self {
        Self::from(&EmbeddingConfig::default())
    }
}

impl From<&EmbeddingConfig> for CohereEmbeddingConfig {
    fn from(config: &EmbeddingConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            dimension: config.dimension,
            timeout_secs: config.timeout_secs,
        }
    }
}

impl CohereEmbeddingConfig {
    fn get_api_key(&self) -> DomainResult<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("CO_API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                DomainError::MissingCredentials(
                    "Cohere API key not set. Set CO_API_KEY env var or configure embedding.api_key."
                        .to_string(),
                )
            })
    }
}

/// Cohere embedding provider.
pub struct CohereEmbeddingProvider {
    config: CohereEmbeddingConfig,
    client: reqwest::Client,
    endpoint: String,
}

impl CohereEmbeddingProvider {
    /// Build a provider; fails without an API key
    pub fn new(config: CohereEmbeddingConfig) -> DomainResult<Self> {
        let api_key = config.get_api_key()?;

        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header_value(&format!("Bearer {api_key}"))?,
        );
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = build_client(config.timeout_secs, headers)?;
        let endpoint = format!("{}/v1/embed", trim_base_url(&config.base_url));

        debug!(%endpoint, key = %redact_key(&api_key), model = %config.model, "cohere embedder ready");

        Ok(Self {
            config,
            client,
            endpoint,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for CohereEmbeddingProvider {
    fn name(&self) -> &'static str {
        "cohere"
    }

    fn dimension(&self) -> usize {
        self.config.dimension
    }

    async fn embed_batch(
        &self,
        texts: &[String],
        input_type: InputType,
    ) -> DomainResult<Vec<Embedding>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(
            model = %self.config.model,
            texts = texts.len(),
            input_type = %input_type,
            "requesting embeddings"
        );

        let request = EmbedRequest {
            model: &self.config.model,
            texts,
            input_type: input_type.as_str(),
            embedding_types: &["float"],
        };

        let response: EmbedResponse = send_json(self.client.post(&self.endpoint).json(&request))
            .await
            .map_err(|e| e.into_domain(SERVICE))?;

        let vectors = response.embeddings.into_vectors();

        if vectors.len() != texts.len() {
            return Err(DomainError::UnexpectedResponse {
                service: SERVICE,
                message: format!("expected {} embeddings, got {}", texts.len(), vectors.len()),
            });
        }

        Ok(vectors)
    }

    fn max_batch_size(&self) -> usize {
        COHERE_MAX_TEXTS
    }
}

// -- Cohere API request/response types --

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    texts: &'a [String],
    input_type: &'a str,
    embedding_types: &'a [&'a str],
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embeddings: EmbeddingsPayload,
}

/// `embeddings` is an object keyed by type when `embedding_types` is sent,
/// and a bare list of float vectors otherwise.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EmbeddingsPayload {
    ByType { float: Vec<Embedding> },
    Float(Vec<Embedding>),
}

impl EmbeddingsPayload {
    fn into_vectors(self) -> Vec<Embedding> {
        match self {
            Self::ByType { float } | Self::Float(float) => float,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CohereEmbeddingConfig::default();
        assert_eq!(config.model, "embed-multilingual-v3.0");
        assert_eq!(config.dimension, 1024);
        assert_eq!(config.base_url, "https://api.cohere.com");
    }

    #[test]
    fn test_missing_api_key() {
        temp_env::with_var_unset("CO_API_KEY", || {
            let result = CohereEmbeddingProvider::new(CohereEmbeddingConfig::default());
            assert!(matches!(result, Err(DomainError::MissingCredentials(_))));
        });
    }

    #[test]
    fn test_api_key_from_env() {
        temp_env::with_var("CO_API_KEY", Some("env-key"), || {
            let config = CohereEmbeddingConfig::default();
            assert_eq!(config.get_api_key().unwrap(), "env-key");
        });
    }

    #[test]
    fn test_request_serialization() {
        let texts = vec!["hola".to_string()];
        let request = EmbedRequest {
            model: "embed-multilingual-v3.0",
            texts: &texts,
            input_type: InputType::SearchQuery.as_str(),
            embedding_types: &["float"],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["input_type"], "search_query");
        assert_eq!(json["embedding_types"][0], "float");
        assert_eq!(json["texts"][0], "hola");
    }

    #[test]
    fn test_response_shapes() {
        let by_type: EmbedResponse =
            serde_json::from_str(r#"{"id":"x","embeddings":{"float":[[0.1,0.2]]}}"#).unwrap();
        assert_eq!(by_type.embeddings.into_vectors(), vec![vec![0.1, 0.2]]);

        let bare: EmbedResponse =
            serde_json::from_str(r#"{"embeddings":[[1.0],[2.0]]}"#).unwrap();
        assert_eq!(bare.embeddings.into_vectors().len(), 2);
    }
}
