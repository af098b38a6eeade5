//! Source document model

use serde::{Deserialize, Serialize};

/// Raw text for one corpus, held in memory for the lifetime of a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Human readable title (e.g. the encyclopedia article name)
    pub title: String,

    /// Language tag of the content (e.g. "en", "es", "de")
    pub language: String,

    /// Full document text
    pub text: String,
}

impl Document {
    /// Create a new document
    pub fn new(title: impl Into<String>, language: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            language: language.into(),
            text: text.into(),
        }
    }

    /// Size of the document in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}
