//! Port trait definitions (Hexagonal Architecture)
//!
//! Async trait interfaces that adapters implement:
//! - EmbeddingProvider: text to dense vectors
//! - Reranker: relevance scoring of retrieval candidates
//! - EndpointProvisioner: lifecycle of the scoring endpoint
//! - GenerationClient: grounded answer generation

pub mod embedding;
pub mod endpoint;
pub mod generation;
pub mod reranker;

pub use embedding::EmbeddingProvider;
pub use endpoint::EndpointProvisioner;
pub use generation::{GenerationClient, GenerationRequest, SamplingParams};
pub use reranker::{RelevanceScore, Reranker};
