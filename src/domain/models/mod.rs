//! Domain models

pub mod answer;
pub mod chunking;
pub mod config;
pub mod conversation;
pub mod document;
pub mod embedding;
pub mod endpoint;

pub use answer::{GroundedAnswer, ReplyOutcome, INSUFFICIENT_INFORMATION_ANSWER};
pub use chunking::{Chunk, ChunkingConfig, ChunkingResult};
pub use config::{
    Config, EmbeddingConfig, EmbeddingProviderKind, GenerationConfig, RerankerConfig,
    RetrievalConfig,
};
pub use conversation::{Conversation, Role, Turn};
pub use document::Document;
pub use embedding::{Embedding, InputType, RankedCandidate, RetrievedChunk, SearchHit};
pub use endpoint::{EndpointHandle, EndpointSpec, EndpointStatus};
