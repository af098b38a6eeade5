//! Flat (exhaustive) vector index
//!
//! Stores every vector of one corpus and answers nearest-neighbour queries by
//! comparing the query against all of them. Ids are insertion positions.
//! The index is immutable once built.

use std::cmp::Ordering;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Embedding, SearchHit};

/// In-memory L2 index with linear-scan search
#[derive(Debug, Clone, Default)]
pub struct FlatIndex {
    dimension: usize,
    vectors: Vec<Embedding>,
}

impl FlatIndex {
    /// Build an index over `vectors`; each vector's id is its position.
    ///
    /// The dimension is taken from the first vector. An empty input builds an
    /// empty index.
    pub fn build(vectors: Vec<Embedding>) -> DomainResult<Self> {
        let dimension = vectors.first().map_or(0, Vec::len);
        Self::with_dimension(dimension, vectors)
    }

    /// Build an index whose vectors must all have `dimension` components
    pub fn with_dimension(dimension: usize, vectors: Vec<Embedding>) -> DomainResult<Self> {
        if dimension == 0 && !vectors.is_empty() {
            return Err(DomainError::ValidationFailed(
                "vectors must have at least one dimension".to_string(),
            ));
        }

        if let Some(bad) = vectors.iter().find(|v| v.len() != dimension) {
            return Err(DomainError::DimensionMismatch {
                expected: dimension,
                actual: bad.len(),
            });
        }

        tracing::debug!(vectors = vectors.len(), dimension, "built flat index");

        Ok(Self { dimension, vectors })
    }

    /// The `k` nearest vectors to `query`, nearest first.
    ///
    /// Returns `min(k, len)` hits ordered by ascending Euclidean distance,
    /// ties broken by ascending id.
    pub fn search(&self, query: &[f32], k: usize) -> DomainResult<Vec<SearchHit>> {
        if self.vectors.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        if query.len() != self.dimension {
            return Err(DomainError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let mut hits: Vec<SearchHit> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(id, vector)| SearchHit {
                id,
                distance: l2_distance(query, vector),
            })
            .collect();

        hits.sort_by(compare_hits);
        hits.truncate(k);

        Ok(hits)
    }

    /// Number of stored vectors
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Returns true if no vectors are stored
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Vector dimension (0 for an empty index built without one)
    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

fn compare_hits(a: &SearchHit, b: &SearchHit) -> Ordering {
    a.distance
        .total_cmp(&b.distance)
        .then_with(|| a.id.cmp(&b.id))
}

/// Euclidean norm of `a - b`
pub fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum::<f32>()
        .sqrt()
}
