//! ragline - retrieval-augmented question answering
//!
//! Splits documents into overlapping chunks, embeds them through an external
//! service, keeps the vectors in an in-memory flat L2 index, retrieves the
//! chunks nearest to a question, optionally reranks them on a provisioned
//! scoring endpoint, and asks a language model for an answer grounded in
//! those chunks.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): models, port traits and errors
//! - **Adapters** (`adapters`): HTTP clients for the embedding, rerank,
//!   endpoint control plane and generation services
//! - **Infrastructure Layer** (`infrastructure`): chunker, flat index,
//!   configuration, logging and shared HTTP plumbing
//! - **Service Layer** (`services`): batching, retrieval, reranking,
//!   generation and the end-to-end pipeline
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use ragline::adapters::embeddings::LexicalEmbeddingProvider;
//! use ragline::domain::models::{Config, Document};
//! use ragline::services::RagPipeline;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::default();
//! let provider = Arc::new(LexicalEmbeddingProvider::new(256)?);
//! let pipeline = RagPipeline::new(&config, provider)?;
//!
//! let corpus = pipeline
//!     .index_document(&Document::new("Mexico", "en", "Tacos are common street food in Mexico City."))
//!     .await?;
//! let retrieval = pipeline.retrieve(&corpus, "What food is eaten in Mexico?").await?;
//! println!("{:?}", retrieval.texts());
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    Chunk, ChunkingConfig, Config, Conversation, Document, EndpointHandle, EndpointSpec,
    GroundedAnswer, ReplyOutcome,
};
pub use infrastructure::vector::{Chunker, FlatIndex};
pub use services::{CorpusIndex, RagPipeline};
