//! Text generation port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::Turn;

/// Sampling parameters for one generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingParams {
    /// Model identifier
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Nucleus sampling threshold
    pub top_p: f32,
    /// Maximum tokens per reply
    pub max_tokens: u32,
}

/// A complete generation request.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// System instructions
    pub system: String,
    /// Conversation so far, ending with the new user turn
    pub turns: Vec<Turn>,
    /// Sampling parameters
    pub sampling: SamplingParams,
}

/// Trait for language model backends.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Backend name (e.g., "anthropic").
    fn name(&self) -> &'static str;

    /// Generate the assistant reply text for `request`.
    async fn generate(&self, request: &GenerationRequest) -> DomainResult<String>;
}
