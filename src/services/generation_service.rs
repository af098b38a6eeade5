//! Grounded answer generation
//!
//! Builds the prompt from retrieved chunks, calls the generation backend with
//! the caller's conversation, and validates the reply against the answer
//! schema. The conversation is taken by value and handed back with the new
//! exchange appended.

use std::fmt::Write as _;
use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::domain::errors::DomainResult;
use crate::domain::models::{Conversation, GenerationConfig, GroundedAnswer, ReplyOutcome, Turn};
use crate::domain::ports::{GenerationClient, GenerationRequest, SamplingParams};

/// System instructions sent with every generation request
pub const SYSTEM_PROMPT: &str = "You are a question answering assistant. \
Answer the user's question using only the information in the documents provided with it. \
Do not use prior knowledge and do not guess.\n\
Respond with a single JSON object and nothing else, in exactly this form:\n\
{\"answer\": \"<the answer>\", \"reasoning\": \"<which documents support the answer and how>\"}\n\
If no documents are provided, or the documents do not contain the information needed, respond with:\n\
{\"answer\": \"I do not have enough information to answer that question.\", \"reasoning\": \"<what is missing>\"}";

const NO_DOCUMENTS_REASONING: &str = "No documents were supplied for this question.";

/// Render the user turn for `question` with the numbered context documents
pub fn build_user_prompt(documents: &[String], question: &str) -> String {
    let mut prompt = String::from("Documents:\n");

    if documents.is_empty() {
        prompt.push_str("(none)\n");
    }
    for (i, document) in documents.iter().enumerate() {
        let _ = writeln!(prompt, "[{}] {}", i + 1, document);
    }

    let _ = write!(prompt, "\nQuestion: {question}");
    prompt
}

impl From<&GenerationConfig> for SamplingParams {
    fn from(config: &GenerationConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            top_p: config.top_p,
            max_tokens: config.max_tokens,
        }
    }
}

/// Generation step of the pipeline
pub struct GenerationOrchestrator {
    client: Arc<dyn GenerationClient>,
    sampling: SamplingParams,
}

impl GenerationOrchestrator {
    /// Orchestrator calling `client` with fixed `sampling`
    pub fn new(client: Arc<dyn GenerationClient>, sampling: SamplingParams) -> Self {
        Self { client, sampling }
    }

    /// Answer `question` from `documents`, continuing `conversation`.
    ///
    /// With no documents the fixed fallback answer is produced without calling
    /// the backend. In every case the user turn and the reply are appended to
    /// the returned conversation.
    #[instrument(skip_all, fields(backend = self.client.name(), documents = documents.len(), history = conversation.len()))]
    pub async fn generate(
        &self,
        documents: &[String],
        question: &str,
        conversation: Conversation,
    ) -> DomainResult<(ReplyOutcome, Conversation)> {
        let prompt = build_user_prompt(documents, question);

        if documents.is_empty() {
            info!("no documents retrieved, answering with fallback");
            let answer = GroundedAnswer::insufficient_information(NO_DOCUMENTS_REASONING);
            let reply = answer.to_json()?;
            return Ok((
                ReplyOutcome::Grounded(answer),
                conversation.with_exchange(prompt, reply),
            ));
        }

        let mut turns = conversation.turns().to_vec();
        turns.push(Turn::user(prompt.clone()));

        let request = GenerationRequest {
            system: SYSTEM_PROMPT.to_string(),
            turns,
            sampling: self.sampling.clone(),
        };

        let reply = self.client.generate(&request).await?;
        let outcome = ReplyOutcome::from_raw(&reply);

        if let ReplyOutcome::Malformed { reason, .. } = &outcome {
            warn!(%reason, "model reply does not match the answer schema");
        }

        Ok((outcome, conversation.with_exchange(prompt, reply)))
    }
}
