//! Embedding provider port for semantic vector generation.
//!
//! Defines the trait for embedding providers that convert text into
//! dense vector representations for similarity search.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Embedding, InputType};

/// Trait for embedding providers.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Provider name (e.g., "cohere", "lexical").
    fn name(&self) -> &'static str;

    /// Embedding dimension for this provider/model.
    fn dimension(&self) -> usize;

    /// Embed texts in a single request.
    ///
    /// Returns one vector per input, in input order. Callers keep `texts`
    /// within [`EmbeddingProvider::max_batch_size`].
    async fn embed_batch(&self, texts: &[String], input_type: InputType)
        -> DomainResult<Vec<Embedding>>;

    /// Maximum number of texts per single request.
    fn max_batch_size(&self) -> usize;
}
