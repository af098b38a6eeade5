//! Reranking port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;

/// A relevance score for one submitted candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelevanceScore {
    /// Position of the candidate in the submitted list
    pub index: usize,
    /// Service-assigned relevance (higher is better)
    pub score: f32,
}

/// Trait for external relevance scoring services.
///
/// Implementations are bound to a live endpoint; see
/// [`EndpointProvisioner`](super::EndpointProvisioner).
#[async_trait]
pub trait Reranker: Send + Sync {
    /// Reranker name (e.g., "cohere").
    fn name(&self) -> &'static str;

    /// Score `documents` against `query`, returning up to `top_n` scores.
    async fn score(
        &self,
        query: &str,
        documents: &[String],
        top_n: usize,
    ) -> DomainResult<Vec<RelevanceScore>>;
}
