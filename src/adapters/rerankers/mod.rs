//! Reranking service adapters.

pub mod cohere;

pub use cohere::CohereReranker;
