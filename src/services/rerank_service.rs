//! Reranking of retrieval candidates
//!
//! Scores from the service are checked against the submitted candidate list:
//! unknown or repeated indices are dropped, so the result is always a subset
//! of the input.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{instrument, warn};

use crate::domain::errors::DomainResult;
use crate::domain::models::RankedCandidate;
use crate::domain::ports::{RelevanceScore, Reranker};

/// Validates and orders scores from a [`Reranker`]
pub struct RerankService {
    reranker: Arc<dyn Reranker>,
}

impl RerankService {
    /// Service over `reranker`
    pub fn new(reranker: Arc<dyn Reranker>) -> Self {
        Self { reranker }
    }

    /// Up to `top_n` candidates, highest relevance first
    #[instrument(skip(self, query, candidates), fields(reranker = self.reranker.name(), candidates = candidates.len()))]
    pub async fn rerank(
        &self,
        query: &str,
        candidates: &[String],
        top_n: usize,
    ) -> DomainResult<Vec<RankedCandidate>> {
        if candidates.is_empty() || top_n == 0 {
            return Ok(Vec::new());
        }

        let scores = self.reranker.score(query, candidates, top_n).await?;
        Ok(merge_scores(candidates, scores, top_n))
    }
}

/// Attach scores to candidates, order by descending score and keep `top_n`
pub fn merge_scores(
    candidates: &[String],
    scores: Vec<RelevanceScore>,
    top_n: usize,
) -> Vec<RankedCandidate> {
    let mut seen = HashSet::new();
    let mut ranked: Vec<RankedCandidate> = Vec::with_capacity(scores.len());

    for RelevanceScore { index, score } in scores {
        let Some(text) = candidates.get(index) else {
            warn!(index, "reranker returned an unknown candidate index");
            continue;
        };
        if !seen.insert(index) {
            continue;
        }
        ranked.push(RankedCandidate {
            index,
            text: text.clone(),
            score,
        });
    }

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.index.cmp(&b.index)));
    ranked.truncate(top_n);
    ranked
}
