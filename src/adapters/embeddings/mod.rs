//! Embedding provider adapters.
//!
//! - `cohere`: hosted Cohere-compatible embedding API
//! - `lexical`: deterministic in-process hashing embedder

pub mod cohere;
pub mod lexical;

use std::sync::Arc;

pub use cohere::{CohereEmbeddingConfig, CohereEmbeddingProvider};
pub use lexical::LexicalEmbeddingProvider;

use crate::domain::errors::DomainResult;
use crate::domain::models::{EmbeddingConfig, EmbeddingProviderKind};
use crate::domain::ports::EmbeddingProvider;

/// Build the embedding provider selected by configuration
pub fn create_provider(config: &EmbeddingConfig) -> DomainResult<Arc<dyn EmbeddingProvider>> {
    let provider: Arc<dyn EmbeddingProvider> = match config.provider {
        EmbeddingProviderKind::Cohere => Arc::new(CohereEmbeddingProvider::new(
            CohereEmbeddingConfig::from(config),
        )?),
        EmbeddingProviderKind::Lexical => Arc::new(LexicalEmbeddingProvider::new(config.dimension)?),
    };

    tracing::debug!(provider = provider.name(), dimension = provider.dimension(), "embedding provider ready");

    Ok(provider)
}
