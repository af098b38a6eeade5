//! Batched embedding
//!
//! Splits inputs into fixed-size batches, sends them to the provider one after
//! another and checks every response before stitching results back together.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Embedding, InputType};
use crate::domain::ports::EmbeddingProvider;

/// Default number of texts per provider request
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Embedding service wrapping a provider with batching and response checks
pub struct EmbeddingService {
    provider: Arc<dyn EmbeddingProvider>,
    batch_size: usize,
}

impl EmbeddingService {
    /// Create a service sending at most `batch_size` texts per request.
    ///
    /// The effective batch size is also capped by the provider's own limit.
    pub fn new(provider: Arc<dyn EmbeddingProvider>, batch_size: usize) -> DomainResult<Self> {
        if batch_size == 0 {
            return Err(DomainError::InvalidConfig(
                "embedding batch_size must be at least 1".to_string(),
            ));
        }

        let batch_size = batch_size.min(provider.max_batch_size().max(1));
        Ok(Self {
            provider,
            batch_size,
        })
    }

    /// Vector dimension of the provider
    pub fn dimension(&self) -> usize {
        self.provider.dimension()
    }

    /// Effective texts per request
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Embed `texts`, returning one vector per input in input order.
    ///
    /// Any failed batch fails the whole call.
    #[instrument(skip(self, texts), fields(provider = self.provider.name(), count = texts.len()))]
    pub async fn embed(&self, texts: &[String], input_type: InputType) -> DomainResult<Vec<Embedding>> {
        let mut vectors = Vec::with_capacity(texts.len());

        for (batch_number, batch) in texts.chunks(self.batch_size).enumerate() {
            debug!(batch = batch_number, size = batch.len(), "embedding batch");

            let embedded = self.provider.embed_batch(batch, input_type).await?;
            self.check_batch(batch.len(), &embedded)?;
            vectors.extend(embedded);
        }

        Ok(vectors)
    }

    /// Embed texts for indexing
    pub async fn embed_documents(&self, texts: &[String]) -> DomainResult<Vec<Embedding>> {
        self.embed(texts, InputType::SearchDocument).await
    }

    /// Embed a single search query
    pub async fn embed_query(&self, query: &str) -> DomainResult<Embedding> {
        let mut vectors = self
            .embed(&[query.to_string()], InputType::SearchQuery)
            .await?;

        vectors.pop().ok_or_else(|| DomainError::UnexpectedResponse {
            service: "embedding",
            message: "no vector returned for query".to_string(),
        })
    }

    fn check_batch(&self, expected: usize, vectors: &[Embedding]) -> DomainResult<()> {
        if vectors.len() != expected {
            return Err(DomainError::UnexpectedResponse {
                service: "embedding",
                message: format!("expected {expected} vectors, got {}", vectors.len()),
            });
        }

        let dimension = self.provider.dimension();
        if let Some(bad) = vectors.iter().find(|v| v.len() != dimension) {
            return Err(DomainError::DimensionMismatch {
                expected: dimension,
                actual: bad.len(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Encodes each text's length and records the batch sizes it sees
    struct RecordingProvider {
        batches: Mutex<Vec<usize>>,
        max_batch: usize,
        drop_last: bool,
    }

    impl RecordingProvider {
        fn new(max_batch: usize) -> Self {
            Self {
                batches: Mutex::new(Vec::new()),
                max_batch,
                drop_last: false,
            }
        }
    }

    #[async_trait]
    impl EmbeddingProvider for RecordingProvider {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn dimension(&self) -> usize {
            2
        }

        async fn embed_batch(
            &self,
            texts: &[String],
            _input_type: InputType,
        ) -> DomainResult<Vec<Embedding>> {
            self.batches.lock().unwrap().push(texts.len());
            let mut out: Vec<Embedding> = texts.iter().map(|t| vec![t.len() as f32, 0.0]).collect();
            if self.drop_last {
                out.pop();
            }
            Ok(out)
        }

        fn max_batch_size(&self) -> usize {
            self.max_batch
        }
    }

    fn texts(n: usize) -> Vec<String> {
        (0..n).map(|i| "x".repeat(i + 1)).collect()
    }

    #[tokio::test]
    async fn test_batches_of_fifty() {
        let provider = Arc::new(RecordingProvider::new(1000));
        let service = EmbeddingService::new(provider.clone(), DEFAULT_BATCH_SIZE).unwrap();

        let vectors = service.embed_documents(&texts(120)).await.unwrap();

        assert_eq!(vectors.len(), 120);
        assert_eq!(*provider.batches.lock().unwrap(), vec![50, 50, 20]);
        for (i, v) in vectors.iter().enumerate() {
            assert_eq!(v[0], (i + 1) as f32);
        }
    }

    #[tokio::test]
    async fn test_provider_limit_caps_batch() {
        let provider = Arc::new(RecordingProvider::new(8));
        let service = EmbeddingService::new(provider.clone(), 50).unwrap();
        assert_eq!(service.batch_size(), 8);

        service.embed_documents(&texts(20)).await.unwrap();
        assert_eq!(*provider.batches.lock().unwrap(), vec![8, 8, 4]);
    }

    #[tokio::test]
    async fn test_empty_input() {
        let provider = Arc::new(RecordingProvider::new(10));
        let service = EmbeddingService::new(provider.clone(), 5).unwrap();

        assert!(service.embed_documents(&[]).await.unwrap().is_empty());
        assert!(provider.batches.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_count_mismatch_is_error() {
        let provider = Arc::new(RecordingProvider {
            drop_last: true,
            ..RecordingProvider::new(10)
        });
        let service = EmbeddingService::new(provider, 5).unwrap();

        let result = service.embed_documents(&texts(3)).await;
        assert!(matches!(result, Err(DomainError::UnexpectedResponse { .. })));
    }

    #[tokio::test]
    async fn test_embed_query() {
        let service = EmbeddingService::new(Arc::new(RecordingProvider::new(10)), 5).unwrap();
        assert_eq!(service.embed_query("abc").await.unwrap(), vec![3.0, 0.0]);
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let result = EmbeddingService::new(Arc::new(RecordingProvider::new(10)), 0);
        assert!(matches!(result, Err(DomainError::InvalidConfig(_))));
    }
}
