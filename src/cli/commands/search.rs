//! `search`: index a document and show the chunks retrieved for a query

use anyhow::{Context, Result};
use serde::Serialize;

use super::{embedding_provider, finish_session, load_document, RerankSession};
use crate::cli::output::{create_spinner, heading, list_table, output, truncate, CommandOutput};
use crate::cli::types::SearchArgs;
use crate::domain::models::{Config, Document};
use crate::services::{RagPipeline, Retrieval};

/// Result of `search`
#[derive(Debug, Serialize)]
pub struct SearchOutput {
    /// Document title
    pub title: String,
    /// Query text
    pub query: String,
    /// Number of chunks in the index
    pub indexed_chunks: usize,
    /// Retrieved and, if enabled, reranked chunks
    pub retrieval: Retrieval,
}

impl CommandOutput for SearchOutput {
    fn to_human(&self) -> String {
        if self.retrieval.chunks.is_empty() {
            return format!("No chunks found in '{}'.", self.title);
        }

        let mut table = list_table(&["id", "distance", "text"]);
        for chunk in &self.retrieval.chunks {
            table.add_row(vec![
                chunk.id.to_string(),
                format!("{:.4}", chunk.distance),
                truncate(&chunk.text, 80),
            ]);
        }

        let mut rendered = format!(
            "{}\n{table}",
            heading(&format!(
                "Nearest chunks of '{}' ({} indexed), in document order:",
                self.title, self.indexed_chunks
            ))
        );

        if let Some(ranked) = &self.retrieval.reranked {
            let mut table = list_table(&["rank", "candidate", "score", "text"]);
            for (rank, candidate) in ranked.iter().enumerate() {
                table.add_row(vec![
                    (rank + 1).to_string(),
                    candidate.index.to_string(),
                    format!("{:.4}", candidate.score),
                    truncate(&candidate.text, 80),
                ]);
            }
            rendered.push_str(&format!("\n\n{}\n{table}", heading("After reranking:")));
        }

        rendered
    }
}

/// Run `search`
pub async fn execute(args: SearchArgs, config: &Config, json: bool) -> Result<()> {
    let mut config = config.clone();
    if let Some(k) = args.top_k {
        config.retrieval.top_k = k;
    }

    let document = load_document(&args.file, &args.document.language)?;
    let provider = embedding_provider(&config, args.document.offline)?;
    let mut pipeline = RagPipeline::new(&config, provider).context("Failed to build pipeline")?;

    let session = RerankSession::start(args.reranking, &config, json).await?;
    if let Some(session) = &session {
        pipeline = pipeline.with_reranker(session.reranker.clone());
    }

    let result = search(&pipeline, &document, args.query, json).await;
    let out = finish_session(session, args.reranking.release_endpoint, result).await?;

    output(&out, json);
    Ok(())
}

async fn search(
    pipeline: &RagPipeline,
    document: &Document,
    query: String,
    json: bool,
) -> Result<SearchOutput> {
    let spinner = create_spinner(format!("Indexing {}...", document.title), json);
    let corpus = pipeline.index_document(document).await;
    spinner.finish_and_clear();
    let corpus = corpus.context("Failed to index document")?;

    let retrieval = pipeline
        .retrieve(&corpus, &query)
        .await
        .context("Retrieval failed")?;

    Ok(SearchOutput {
        title: corpus.title.clone(),
        query,
        indexed_chunks: corpus.len(),
        retrieval,
    })
}
