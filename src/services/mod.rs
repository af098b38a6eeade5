//! Service layer
//!
//! Coordinates the ports into the indexing and question answering flow.

pub mod embedding_service;
pub mod generation_service;
pub mod rag_pipeline;
pub mod rerank_service;
pub mod retriever;

pub use embedding_service::EmbeddingService;
pub use generation_service::{build_user_prompt, GenerationOrchestrator, SYSTEM_PROMPT};
pub use rag_pipeline::{CorpusIndex, RagPipeline, Retrieval};
pub use rerank_service::RerankService;
pub use retriever::{clean_chunk_text, Retriever};
