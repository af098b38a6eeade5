//! End-to-end RAG pipeline
//!
//! Wires chunking, embedding, the flat index, retrieval, optional reranking
//! and generation. Each document becomes its own [`CorpusIndex`]; corpora
//! share nothing but the configured services.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument};

use super::embedding_service::EmbeddingService;
use super::generation_service::GenerationOrchestrator;
use super::rerank_service::RerankService;
use super::retriever::{self, Retriever};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    Chunk, Config, Conversation, Document, RankedCandidate, ReplyOutcome, RetrievalConfig,
    RetrievedChunk,
};
use crate::domain::ports::{EmbeddingProvider, GenerationClient, Reranker, SamplingParams};
use crate::infrastructure::vector::{Chunker, FlatIndex};

/// Chunks and vectors of one document
#[derive(Debug, Clone)]
pub struct CorpusIndex {
    /// Document title
    pub title: String,
    /// Document language tag
    pub language: String,
    /// Chunks; position equals index id
    pub chunks: Vec<Chunk>,
    /// Vectors of `chunks`
    pub index: FlatIndex,
}

impl CorpusIndex {
    /// Number of chunks
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Returns true for a document without text
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// Context selected for one question
#[derive(Debug, Clone, Serialize)]
pub struct Retrieval {
    /// Nearest chunks in ascending id order
    pub chunks: Vec<RetrievedChunk>,

    /// Reranked subset, present when reranking is enabled
    pub reranked: Option<Vec<RankedCandidate>>,
}

impl Retrieval {
    /// Context texts in the order they are handed to generation
    pub fn texts(&self) -> Vec<String> {
        match &self.reranked {
            Some(ranked) => ranked.iter().map(|r| r.text.clone()).collect(),
            None => retriever::texts(&self.chunks),
        }
    }
}

/// Chunking, embedding, retrieval, optional reranking and generation
pub struct RagPipeline {
    chunker: Chunker,
    embeddings: Arc<EmbeddingService>,
    retriever: Retriever,
    reranker: Option<RerankService>,
    generator: Option<GenerationOrchestrator>,
    retrieval: RetrievalConfig,
    sampling: SamplingParams,
}

impl RagPipeline {
    /// Build a pipeline for indexing and retrieval.
    ///
    /// Reranking and generation are attached with [`Self::with_reranker`]
    /// and [`Self::with_generator`].
    pub fn new(config: &Config, provider: Arc<dyn EmbeddingProvider>) -> DomainResult<Self> {
        let chunker = Chunker::with_config(config.chunking.clone())?;
        let embeddings = Arc::new(EmbeddingService::new(provider, config.embedding.batch_size)?);

        Ok(Self {
            chunker,
            retriever: Retriever::new(Arc::clone(&embeddings)),
            embeddings,
            reranker: None,
            generator: None,
            retrieval: config.retrieval.clone(),
            sampling: SamplingParams::from(&config.generation),
        })
    }

    /// Rerank retrieved candidates with `reranker`
    #[must_use]
    pub fn with_reranker(mut self, reranker: Arc<dyn Reranker>) -> Self {
        self.reranker = Some(RerankService::new(reranker));
        self
    }

    /// Generate answers with `client`
    #[must_use]
    pub fn with_generator(mut self, client: Arc<dyn GenerationClient>) -> Self {
        self.generator = Some(GenerationOrchestrator::new(client, self.sampling.clone()));
        self
    }

    /// Chunk, embed and index one document
    #[instrument(skip_all, fields(title = %document.title, language = %document.language))]
    pub async fn index_document(&self, document: &Document) -> DomainResult<CorpusIndex> {
        let chunks = self.chunker.chunk_document(document).chunks;
        let contents: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();

        let vectors = self.embeddings.embed_documents(&contents).await?;
        let index = FlatIndex::with_dimension(self.embeddings.dimension(), vectors)?;

        info!(chunks = chunks.len(), "document indexed");

        Ok(CorpusIndex {
            title: document.title.clone(),
            language: document.language.clone(),
            chunks,
            index,
        })
    }

    /// Select the context for `question`.
    ///
    /// Without a reranker the `top_k` nearest chunks are returned in document
    /// order. With one, `rerank_candidates` chunks are retrieved and the
    /// `rerank_top_n` most relevant are kept, highest score first.
    #[instrument(skip_all, fields(corpus = %corpus.title))]
    pub async fn retrieve(&self, corpus: &CorpusIndex, question: &str) -> DomainResult<Retrieval> {
        let k = if self.reranker.is_some() {
            self.retrieval.rerank_candidates
        } else {
            self.retrieval.top_k
        };

        let chunks = self
            .retriever
            .retrieve(&corpus.index, &corpus.chunks, question, k)
            .await?;

        let reranked = match &self.reranker {
            Some(reranker) => Some(
                reranker
                    .rerank(question, &retriever::texts(&chunks), self.retrieval.rerank_top_n)
                    .await?,
            ),
            None => None,
        };

        Ok(Retrieval { chunks, reranked })
    }

    /// Retrieve context for `question` and generate a grounded answer
    pub async fn ask(
        &self,
        corpus: &CorpusIndex,
        question: &str,
        conversation: Conversation,
    ) -> DomainResult<(ReplyOutcome, Conversation)> {
        let generator = self.generator.as_ref().ok_or_else(|| {
            DomainError::InvalidConfig("no generation backend configured".to_string())
        })?;

        let retrieval = self.retrieve(corpus, question).await?;
        generator.generate(&retrieval.texts(), question, conversation).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::embeddings::LexicalEmbeddingProvider;
    use crate::domain::models::{EmbeddingConfig, EmbeddingProviderKind};

    fn lexical_config() -> Config {
        Config {
            embedding: EmbeddingConfig {
                provider: EmbeddingProviderKind::Lexical,
                dimension: 128,
                ..EmbeddingConfig::default()
            },
            ..Config::default()
        }
    }

    fn pipeline() -> RagPipeline {
        let config = lexical_config();
        let provider = Arc::new(LexicalEmbeddingProvider::new(128).unwrap());
        RagPipeline::new(&config, provider).unwrap()
    }

    #[tokio::test]
    async fn test_index_document() {
        let doc = Document::new("Mexico", "en", "Tacos are common street food in Mexico City.");
        let corpus = pipeline().index_document(&doc).await.unwrap();

        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.index.len(), 1);
        assert_eq!(corpus.index.dimension(), 128);
        assert_eq!(corpus.language, "en");
    }

    #[tokio::test]
    async fn test_empty_document_gives_empty_corpus() {
        let corpus = pipeline()
            .index_document(&Document::new("Nothing", "en", ""))
            .await
            .unwrap();
        assert!(corpus.is_empty());

        let retrieval = pipeline().retrieve(&corpus, "anything").await.unwrap();
        assert!(retrieval.texts().is_empty());
    }

    #[tokio::test]
    async fn test_ask_requires_generator() {
        let corpus = pipeline()
            .index_document(&Document::new("t", "en", "text here"))
            .await
            .unwrap();
        let result = pipeline().ask(&corpus, "q", Conversation::new()).await;
        assert!(matches!(result, Err(DomainError::InvalidConfig(_))));
    }
}
