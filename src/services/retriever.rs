//! Retrieval of context chunks for a question
//!
//! Hits come back from the index nearest first, but they are handed on in
//! ascending id order so the prompt reads the chunks in document order.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::{debug, instrument};

use super::embedding_service::EmbeddingService;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Chunk, RetrievedChunk};
use crate::infrastructure::vector::FlatIndex;

static LINE_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\t\n\r]+").expect("valid regex"));

/// Collapse each run of tabs and line breaks into one space and trim
pub fn clean_chunk_text(text: &str) -> String {
    LINE_BREAKS.replace_all(text, " ").trim().to_string()
}

/// Query-side retrieval over one corpus
pub struct Retriever {
    embeddings: Arc<EmbeddingService>,
}

impl Retriever {
    /// Retriever embedding queries with `embeddings`
    pub fn new(embeddings: Arc<EmbeddingService>) -> Self {
        Self { embeddings }
    }

    /// The `k` chunks nearest to `query`, in ascending id order.
    ///
    /// `chunks` must be the sequence `index` was built from.
    #[instrument(skip(self, index, chunks, query), fields(indexed = index.len()))]
    pub async fn retrieve(
        &self,
        index: &FlatIndex,
        chunks: &[Chunk],
        query: &str,
        k: usize,
    ) -> DomainResult<Vec<RetrievedChunk>> {
        if index.len() != chunks.len() {
            return Err(DomainError::ValidationFailed(format!(
                "index holds {} vectors but {} chunks were supplied",
                index.len(),
                chunks.len()
            )));
        }

        if index.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let query_vector = self.embeddings.embed_query(query).await?;
        let mut hits = index.search(&query_vector, k)?;

        debug!(
            nearest = hits.first().map(|h| h.id),
            hits = hits.len(),
            "index searched"
        );

        hits.sort_by_key(|hit| hit.id);

        hits.into_iter()
            .map(|hit| {
                let chunk = chunks.get(hit.id).ok_or_else(|| {
                    DomainError::ValidationFailed(format!("no chunk for index id {}", hit.id))
                })?;
                Ok(RetrievedChunk {
                    id: hit.id,
                    distance: hit.distance,
                    text: clean_chunk_text(&chunk.content),
                })
            })
            .collect()
    }
}

/// Texts of retrieved chunks, in retrieval order
pub fn texts(retrieved: &[RetrievedChunk]) -> Vec<String> {
    retrieved.iter().map(|r| r.text.clone()).collect()
}
