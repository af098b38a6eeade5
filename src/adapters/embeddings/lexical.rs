//! Deterministic lexical embedding provider.
//!
//! Hashes lowercase word tokens into a fixed number of buckets and normalizes
//! the counts to unit length. Texts sharing vocabulary land close together,
//! which is enough for offline runs and tests without an embedding service.
//! The input type is ignored: documents and queries share one space.

use async_trait::async_trait;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Embedding, InputType};
use crate::domain::ports::EmbeddingProvider;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Hashing bag-of-words embedder.
#[derive(Debug, Clone)]
pub struct LexicalEmbeddingProvider {
    dimension: usize,
}

impl LexicalEmbeddingProvider {
    /// Provider producing `dimension`-component vectors; 0 is rejected
    pub fn new(dimension: usize) -> DomainResult<Self> {
        if dimension == 0 {
            return Err(DomainError::InvalidConfig(
                "lexical embedding dimension must be at least 1".to_string(),
            ));
        }
        Ok(Self { dimension })
    }

    /// Embed one text. Text without any word token maps to the zero vector.
    pub fn embed_text(&self, text: &str) -> Embedding {
        let mut vector = vec![0.0_f32; self.dimension];

        for token in tokenize(text) {
            let bucket = (fnv1a(&token) % self.dimension as u64) as usize;
            vector[bucket] += 1.0;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }

        vector
    }
}

#[async_trait]
impl EmbeddingProvider for LexicalEmbeddingProvider {
    fn name(&self) -> &'static str {
        "lexical"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed_batch(
        &self,
        texts: &[String],
        _input_type: InputType,
    ) -> DomainResult<Vec<Embedding>> {
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }

    fn max_batch_size(&self) -> usize {
        usize::MAX
    }
}

/// Lowercase alphanumeric runs, skipping single characters
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().count() > 1)
        .map(str::to_lowercase)
}

fn fnv1a(token: &str) -> u64 {
    token.bytes().fold(FNV_OFFSET, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::vector::l2_distance;

    #[test]
    fn test_rejects_zero_dimension() {
        assert!(LexicalEmbeddingProvider::new(0).is_err());
    }

    #[test]
    fn test_deterministic_and_normalized() {
        let provider = LexicalEmbeddingProvider::new(64).unwrap();
        let a = provider.embed_text("Tacos are popular in Mexico");
        let b = provider.embed_text("Tacos are popular in Mexico");

        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_case_and_punctuation_insensitive() {
        let provider = LexicalEmbeddingProvider::new(32).unwrap();
        assert_eq!(
            provider.embed_text("Mexico, TACOS!"),
            provider.embed_text("mexico tacos")
        );
    }

    #[test]
    fn test_empty_text_is_zero_vector() {
        let provider = LexicalEmbeddingProvider::new(8).unwrap();
        assert!(provider.embed_text("  ...  ").iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_shared_vocabulary_is_closer() {
        let provider = LexicalEmbeddingProvider::new(256).unwrap();
        let query = provider.embed_text("popular food in Mexico");
        let related = provider.embed_text("Tacos are a popular food in Mexico");
        let unrelated = provider.embed_text("The glacier moved slowly across the valley");

        assert!(l2_distance(&query, &related) < l2_distance(&query, &unrelated));
    }

    #[tokio::test]
    async fn test_embed_batch_preserves_order() {
        let provider = LexicalEmbeddingProvider::new(16).unwrap();
        let texts = vec!["alpha".to_string(), "beta".to_string()];

        let vectors = provider
            .embed_batch(&texts, InputType::SearchDocument)
            .await
            .unwrap();

        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[0], provider.embed_text("alpha"));
        assert_eq!(vectors[1], provider.embed_text("beta"));
    }
}
