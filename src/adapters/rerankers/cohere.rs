//! Cohere rerank adapter.
//!
//! Scores candidates against a query through a Cohere-compatible `/v1/rerank`
//! endpoint. A reranker can only be built from a live [`EndpointHandle`].

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{EndpointHandle, RerankerConfig};
use crate::domain::ports::{RelevanceScore, Reranker};
use crate::infrastructure::http::client::{build_client, header_value, send_json, trim_base_url};

const SERVICE: &str = "rerank";

/// Reranker bound to one provisioned endpoint
pub struct CohereReranker {
    client: reqwest::Client,
    url: String,
    model: String,
    endpoint_name: String,
}

impl CohereReranker {
    /// Bind a reranker to `handle`.
    ///
    /// Fails with [`DomainError::EndpointUnavailable`] unless the endpoint is
    /// in service. The API key falls back to `CO_API_KEY`; a control plane
    /// endpoint may not need one.
    pub fn new(handle: &EndpointHandle, config: &RerankerConfig) -> DomainResult<Self> {
        if !handle.is_live() {
            return Err(DomainError::EndpointUnavailable(format!(
                "endpoint '{}' is {}",
                handle.name, handle.status
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("CO_API_KEY").ok())
            .filter(|key| !key.trim().is_empty());
        if let Some(key) = api_key {
            headers.insert(header::AUTHORIZATION, header_value(&format!("Bearer {key}"))?);
        }

        Ok(Self {
            client: build_client(config.timeout_secs, headers)?,
            url: format!("{}/v1/rerank", trim_base_url(&handle.url)),
            model: config.model.clone(),
            endpoint_name: handle.name.clone(),
        })
    }
}

#[async_trait]
impl Reranker for CohereReranker {
    fn name(&self) -> &'static str {
        "cohere"
    }

    async fn score(
        &self,
        query: &str,
        documents: &[String],
        top_n: usize,
    ) -> DomainResult<Vec<RelevanceScore>> {
        if documents.is_empty() || top_n == 0 {
            return Ok(Vec::new());
        }

        debug!(
            endpoint = %self.endpoint_name,
            candidates = documents.len(),
            top_n,
            "requesting rerank"
        );

        let request = RerankRequest {
            model: &self.model,
            query,
            documents,
            top_n: top_n.min(documents.len()),
        };

        let response: RerankResponse = send_json(self.client.post(&self.url).json(&request))
            .await
            .map_err(|e| e.into_domain(SERVICE))?;

        Ok(response
            .results
            .into_iter()
            .map(|r| RelevanceScore {
                index: r.index,
                score: r.relevance_score,
            })
            .collect())
    }
}

#[derive(Debug, Serialize)]
struct RerankRequest<'a> {
    model: &'a str,
    query: &'a str,
    documents: &'a [String],
    top_n: usize,
}

#[derive(Debug, Deserialize)]
struct RerankResponse {
    results: Vec<RerankResult>,
}

#[derive(Debug, Deserialize)]
struct RerankResult {
    index: usize,
    relevance_score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::EndpointStatus;

    fn handle(status: EndpointStatus) -> EndpointHandle {
        EndpointHandle::new(
            "ragline-rerank".to_string(),
            "http://localhost:9/".to_string(),
            status,
            false,
        )
    }

    #[test]
    fn test_requires_live_endpoint() {
        let result = CohereReranker::new(&handle(EndpointStatus::Creating), &RerankerConfig::default());
        assert!(matches!(result, Err(DomainError::EndpointUnavailable(msg)) if msg.contains("creating")));
    }

    #[test]
    fn test_binds_to_handle_url() {
        let reranker =
            CohereReranker::new(&handle(EndpointStatus::InService), &RerankerConfig::default())
                .unwrap();
        assert_eq!(reranker.url, "http://localhost:9/v1/rerank");
        assert_eq!(reranker.model, "rerank-multilingual-v3.0");
    }

    #[test]
    fn test_response_parsing() {
        let response: RerankResponse = serde_json::from_str(
            r#"{"id":"r1","results":[{"index":2,"relevance_score":0.91},{"index":0,"relevance_score":0.12}]}"#,
        )
        .unwrap();
        assert_eq!(response.results.len(), 2);
        assert_eq!(response.results[0].index, 2);
    }
}
