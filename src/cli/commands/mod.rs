//! CLI command implementations.

pub mod ask;
pub mod chunk;
pub mod endpoint;
pub mod search;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::warn;

use crate::adapters::embeddings::{create_provider, LexicalEmbeddingProvider};
use crate::adapters::endpoints::create_provisioner;
use crate::adapters::rerankers::CohereReranker;
use crate::cli::output::create_spinner;
use crate::cli::types::RerankArgs;
use crate::domain::models::{Config, Document, EndpointHandle};
use crate::domain::ports::{EmbeddingProvider, EndpointProvisioner};

/// Read a document from a UTF-8 text file, titled after the file stem
pub fn load_document(path: &Path, language: &str) -> Result<Document> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read document {}", path.display()))?;

    let title = path
        .file_stem()
        .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned());

    Ok(Document::new(title, language, text))
}

/// Configured embedding provider, or the lexical one when running offline
pub fn embedding_provider(config: &Config, offline: bool) -> Result<Arc<dyn EmbeddingProvider>> {
    if offline {
        return Ok(Arc::new(
            LexicalEmbeddingProvider::new(config.embedding.dimension)
                .context("Failed to create lexical embedder")?,
        ));
    }

    create_provider(&config.embedding).context("Failed to create embedding provider")
}

/// True if the `--rerank` flag or `reranker.enabled` asks for reranking
pub fn rerank_requested(args: RerankArgs, config: &Config) -> bool {
    args.rerank || config.reranker.enabled
}

/// A reranker bound to an ensured endpoint, plus what is needed to release it
pub struct RerankSession {
    /// Provisioner that issued `handle`
    pub provisioner: Arc<dyn EndpointProvisioner>,
    /// The live endpoint
    pub handle: EndpointHandle,
    /// Reranker bound to `handle`
    pub reranker: Arc<CohereReranker>,
}

impl RerankSession {
    /// Open a session when reranking is requested by flag or config
    pub async fn start(args: RerankArgs, config: &Config, json: bool) -> Result<Option<Self>> {
        if !rerank_requested(args, config) {
            return Ok(None);
        }

        let spinner = create_spinner("Waiting for reranking endpoint...", json);
        let session = Self::open(config).await;
        spinner.finish_and_clear();
        session.map(Some)
    }

    /// Ensure the configured endpoint and bind a reranker to it
    pub async fn open(config: &Config) -> Result<Self> {
        let provisioner =
            create_provisioner(&config.reranker).context("Failed to create endpoint provisioner")?;
        let handle = provisioner
            .ensure_endpoint(&config.reranker.endpoint_spec())
            .await
            .context("Failed to ensure reranking endpoint")?;
        let reranker = Arc::new(
            CohereReranker::new(&handle, &config.reranker).context("Failed to create reranker")?,
        );

        Ok(Self {
            provisioner,
            handle,
            reranker,
        })
    }

    /// Tear the endpoint down, consuming the handle
    pub async fn release(self) -> Result<()> {
        self.provisioner
            .release(self.handle)
            .await
            .context("Failed to release reranking endpoint")
    }
}

/// Finish a command that may hold a rerank session.
///
/// With `release` set the endpoint is released even when `outcome` failed.
/// The command's own error wins; a release failure is attached to it.
/// Without `release` an endpoint created by this run is left running with a
/// warning.
pub async fn finish_session<T>(
    session: Option<RerankSession>,
    release: bool,
    outcome: Result<T>,
) -> Result<T> {
    let Some(session) = session else {
        return outcome;
    };

    if !release {
        if session.handle.newly_created {
            warn!(
                endpoint = %session.handle.name,
                "reranking endpoint was created and is still running; pass --release-endpoint or run `ragline endpoint release`"
            );
        }
        return outcome;
    }

    settle(outcome, session.release().await)
}

/// Combine a command outcome with the result of its cleanup step
fn settle<T>(outcome: Result<T>, cleanup: Result<()>) -> Result<T> {
    match (outcome, cleanup) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(cleanup_err)) => Err(cleanup_err),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(cleanup_err)) => {
            Err(err.context(format!("cleanup also failed: {cleanup_err:#}")))
        }
    }
}
