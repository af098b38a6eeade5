//! Request and response types for the Anthropic Messages API

use serde::{Deserialize, Serialize};

/// Message request sent to `/v1/messages`
#[derive(Debug, Clone, Serialize)]
pub struct MessageRequest<'a> {
    /// Model identifier (e.g., "claude-3-5-sonnet-20241022")
    pub model: &'a str,

    /// System prompt
    pub system: &'a str,

    /// Conversation, alternating user and assistant turns
    pub messages: Vec<Message<'a>>,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Nucleus sampling threshold
    pub top_p: f32,
}

/// A single message in a conversation
#[derive(Debug, Clone, Serialize)]
pub struct Message<'a> {
    /// "user" or "assistant"
    pub role: &'a str,

    /// Message text
    pub content: &'a str,
}

/// Response from `/v1/messages`
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    /// Message id
    #[serde(default)]
    pub id: Option<String>,

    /// Reply content blocks
    pub content: Vec<ContentBlock>,

    /// Why generation stopped (e.g. "end_turn")
    #[serde(default)]
    pub stop_reason: Option<String>,

    /// Token accounting, when reported
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl MessageResponse {
    /// Concatenated text of all text blocks
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                ContentBlock::Other => None,
            })
            .collect()
    }
}

/// Content block in a response
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ContentBlock {
    /// Plain text
    #[serde(rename = "text")]
    Text {
        /// Block text
        text: String,
    },
    /// Any other block type (tool use, thinking); ignored
    #[serde(other)]
    Other,
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Usage {
    /// Tokens in the prompt
    pub input_tokens: u32,
    /// Tokens generated
    pub output_tokens: u32,
}
