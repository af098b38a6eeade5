//! `ask`: answer questions from each document with its own conversation

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;

use super::{embedding_provider, finish_session, load_document, RerankSession};
use crate::adapters::generation::AnthropicClient;
use crate::cli::output::{create_spinner, dim, heading, output, CommandOutput};
use crate::cli::types::AskArgs;
use crate::domain::models::{Config, Conversation, ReplyOutcome};
use crate::services::RagPipeline;

/// One question and its validated reply
#[derive(Debug, Serialize)]
pub struct Exchange {
    /// The question as asked
    pub question: String,
    /// Validated model reply
    pub outcome: ReplyOutcome,
}

/// Answers drawn from one document
#[derive(Debug, Serialize)]
pub struct CorpusAnswers {
    /// Document title
    pub title: String,
    /// Document language tag
    pub language: String,
    /// Number of indexed chunks
    pub chunks: usize,
    /// Exchanges in conversation order
    pub exchanges: Vec<Exchange>,
}

/// Result of `ask`
#[derive(Debug, Serialize)]
pub struct AskOutput {
    /// One entry per input file
    pub corpora: Vec<CorpusAnswers>,
}

impl CommandOutput for AskOutput {
    fn to_human(&self) -> String {
        let mut sections = Vec::new();

        for corpus in &self.corpora {
            let mut lines = vec![heading(&format!(
                "{} [{}] ({} chunks)",
                corpus.title, corpus.language, corpus.chunks
            ))];

            for exchange in &corpus.exchanges {
                lines.push(format!("Q: {}", exchange.question));
                match &exchange.outcome {
                    ReplyOutcome::Grounded(answer) => {
                        lines.push(format!("A: {}", answer.answer));
                        lines.push(dim(&format!("   {}", answer.reasoning)));
                    }
                    ReplyOutcome::Malformed { raw, reason } => {
                        lines.push(format!("A (unvalidated): {raw}"));
                        lines.push(dim(&format!("   reply did not match the answer schema: {reason}")));
                    }
                }
            }

            sections.push(lines.join("\n"));
        }

        sections.join("\n\n")
    }
}

/// Run `ask`
pub async fn execute(args: AskArgs, config: &Config, json: bool) -> Result<()> {
    let provider = embedding_provider(config, args.document.offline)?;
    let generator = Arc::new(
        AnthropicClient::new(&config.generation).context("Failed to create generation client")?,
    );
    let mut pipeline = RagPipeline::new(config, provider)
        .context("Failed to build pipeline")?
        .with_generator(generator);

    let session = RerankSession::start(args.reranking, config, json).await?;
    if let Some(session) = &session {
        pipeline = pipeline.with_reranker(session.reranker.clone());
    }

    let result = answer_all(&pipeline, &args, json).await;
    let answers = finish_session(session, args.reranking.release_endpoint, result).await?;

    output(&answers, json);
    Ok(())
}

async fn answer_all(pipeline: &RagPipeline, args: &AskArgs, json: bool) -> Result<AskOutput> {
    let mut corpora = Vec::with_capacity(args.files.len());

    for path in &args.files {
        let document = load_document(path, &args.document.language)?;

        let spinner = create_spinner(format!("Indexing {}...", document.title), json);
        let corpus = pipeline.index_document(&document).await;
        spinner.finish_and_clear();
        let corpus = corpus.with_context(|| format!("Failed to index {}", path.display()))?;

        let mut conversation = Conversation::new();
        let mut exchanges = Vec::with_capacity(args.questions.len());

        for question in &args.questions {
            let spinner = create_spinner("Generating answer...", json);
            let result = pipeline.ask(&corpus, question, conversation).await;
            spinner.finish_and_clear();

            let (outcome, updated) = result
                .with_context(|| format!("Failed to answer from {}", corpus.title))?;
            conversation = updated;
            exchanges.push(Exchange {
                question: question.clone(),
                outcome,
            });
        }

        corpora.push(CorpusAnswers {
            title: corpus.title.clone(),
            language: corpus.language.clone(),
            chunks: corpus.len(),
            exchanges,
        });
    }

    Ok(AskOutput { corpora })
}
