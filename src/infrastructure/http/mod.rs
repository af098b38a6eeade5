//! HTTP plumbing shared by the embedding, reranking, provisioning and
//! generation adapters.

pub mod client;
pub mod errors;

pub use errors::ApiError;
