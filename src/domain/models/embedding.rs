//! Embedding and retrieval domain models
//!
//! Vectors, search hits and the ordered results handed from retrieval to
//! reranking and generation.

use serde::{Deserialize, Serialize};

/// A dense embedding vector
pub type Embedding = Vec<f32>;

/// Role of the text being embedded.
///
/// Asymmetric embedding models produce different vectors for the same text
/// depending on whether it is indexed or used as a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputType {
    /// Text stored in the index
    SearchDocument,
    /// Text used to search the index
    SearchQuery,
}

impl InputType {
    /// Wire name used by embedding services
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SearchDocument => "search_document",
            Self::SearchQuery => "search_query",
        }
    }
}

impl std::fmt::Display for InputType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One nearest-neighbour match from the vector index
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Insertion-order id of the stored vector
    pub id: usize,

    /// Euclidean distance to the query (lower is closer, 0 = identical)
    pub distance: f32,
}

/// A chunk selected by retrieval, cleaned and ready for prompting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedChunk {
    /// Chunk id (its position in the corpus)
    pub id: usize,

    /// Distance from the query embedding
    pub distance: f32,

    /// Chunk text with tab/newline runs collapsed
    pub text: String,
}

/// A candidate scored by the reranking service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    /// Position of the candidate in the list passed to the reranker
    pub index: usize,

    /// Candidate text, exactly as submitted
    pub text: String,

    /// Relevance score assigned by the service (higher is better)
    pub score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_type_wire_names() {
        assert_eq!(InputType::SearchDocument.as_str(), "search_document");
        assert_eq!(InputType::SearchQuery.to_string(), "search_query");
        assert_eq!(
            serde_json::to_string(&InputType::SearchQuery).unwrap(),
            "\"search_query\""
        );
    }
}
