//! Shared test doubles for integration tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use ragline::domain::errors::{DomainError, DomainResult};
use ragline::domain::models::{Embedding, InputType};
use ragline::domain::ports::{
    EmbeddingProvider, GenerationClient, GenerationRequest, RelevanceScore, Reranker,
};

/// Embeds known texts to fixed vectors; unknown text is an error
pub struct TableEmbeddingProvider {
    vectors: HashMap<String, Embedding>,
    dimension: usize,
}

impl TableEmbeddingProvider {
    pub fn new(entries: &[(&str, Embedding)]) -> Self {
        let dimension = entries.first().map_or(0, |(_, v)| v.len());
        Self {
            vectors: entries
                .iter()
                .map(|(text, v)| ((*text).to_string(), v.clone()))
                .collect(),
            dimension,
        }
    }
}

#[async_trait]
impl EmbeddingProvider for TableEmbeddingProvider {
    fn name(&self) -> &'static str {
        "table"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed_batch(
        &self,
        texts: &[String],
        _input_type: InputType,
    ) -> DomainResult<Vec<Embedding>> {
        texts
            .iter()
            .map(|text| {
                self.vectors.get(text).cloned().ok_or_else(|| DomainError::ServiceFailed {
                    service: "embedding",
                    message: format!("unknown text {text:?}"),
                })
            })
            .collect()
    }

    fn max_batch_size(&self) -> usize {
        50
    }
}

/// Scores each candidate by its length; optionally adds a bogus index
pub struct LengthReranker {
    pub invent_candidate: bool,
}

#[async_trait]
impl Reranker for LengthReranker {
    fn name(&self) -> &'static str {
        "length"
    }

    async fn score(
        &self,
        _query: &str,
        documents: &[String],
        _top_n: usize,
    ) -> DomainResult<Vec<RelevanceScore>> {
        let mut scores: Vec<RelevanceScore> = documents
            .iter()
            .enumerate()
            .map(|(index, d)| RelevanceScore {
                index,
                score: d.len() as f32,
            })
            .collect();
        if self.invent_candidate {
            scores.push(RelevanceScore {
                index: documents.len() + 5,
                score: f32::MAX,
            });
        }
        Ok(scores)
    }
}

/// Replies with a fixed text and records every request
pub struct ScriptedGenerator {
    reply: String,
    pub requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerationClient for ScriptedGenerator {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn generate(&self, request: &GenerationRequest) -> DomainResult<String> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(self.reply.clone())
    }
}
