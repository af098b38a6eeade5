//! Adapters for the external model services.

pub mod embeddings;
pub mod endpoints;
pub mod generation;
pub mod rerankers;
