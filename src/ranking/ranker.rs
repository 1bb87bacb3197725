use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::embedding::{EmbeddingBackend, EmbeddingError, l2_normalize};

use super::config::RankerConfig;
use super::error::RankingError;
use super::types::{Candidate, NormalizationPolicy, RankOutcome, RankedResult, ScoredCandidate};

/// Threshold-or-fallback relevance ranking over a shared embedding backend.
#[derive(Clone)]
pub struct RelevanceRanker {
    backend: Arc<dyn EmbeddingBackend>,
    policy: NormalizationPolicy,
}

impl std::fmt::Debug for RelevanceRanker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelevanceRanker")
            .field("backend", &self.backend.mode())
            .field("embedding_dim", &self.backend.embedding_dim())
            .field("policy", &self.policy)
            .finish()
    }
}

impl RelevanceRanker {
    pub fn new(backend: Arc<dyn EmbeddingBackend>, policy: NormalizationPolicy) -> Self {
        Self { backend, policy }
    }

    pub fn backend(&self) -> &Arc<dyn EmbeddingBackend> {
        &self.backend
    }

    pub fn policy(&self) -> NormalizationPolicy {
        self.policy
    }

    /// Ranks `candidates` against `query`.
    ///
    /// Candidates scoring `>= threshold` are returned in input order, capped at
    /// `max_results`. If none qualify, the `max_results` best-scoring candidates of the
    /// whole set are returned in descending score order (input order among ties) and the
    /// result is flagged [`RankOutcome::Fallback`]. An empty set short-circuits to
    /// [`RankOutcome::NoCandidates`] without touching the backend.
    #[instrument(skip(self, query, candidates), fields(query_len = query.len(), candidates = candidates.len()))]
    pub fn rank<C: Candidate>(
        &self,
        query: &str,
        candidates: Vec<C>,
        threshold: f32,
        max_results: usize,
    ) -> Result<RankedResult<C>, RankingError> {
        RankerConfig {
            threshold,
            max_results,
        }
        .validate()?;

        if candidates.is_empty() {
            debug!("No candidates to rank");
            return Ok(RankedResult::no_candidates());
        }

        let scores = self.score(query, &candidates)?;
        let result = select(candidates, &scores, threshold, max_results);

        info!(
            outcome = %result.outcome,
            returned = result.len(),
            top_score = result.top_score(),
            threshold,
            "Ranking complete"
        );

        Ok(result)
    }

    pub fn rank_with<C: Candidate>(
        &self,
        query: &str,
        candidates: Vec<C>,
        config: &RankerConfig,
    ) -> Result<RankedResult<C>, RankingError> {
        self.rank(query, candidates, config.threshold, config.max_results)
    }

    /// Scores every candidate against `query`, index-aligned with `candidates`.
    pub fn score<C: Candidate>(
        &self,
        query: &str,
        candidates: &[C],
    ) -> Result<Vec<f32>, RankingError> {
        let texts: Vec<String> = candidates
            .iter()
            .map(Candidate::textual_representation)
            .collect();

        let mut inputs: Vec<&str> = Vec::with_capacity(texts.len() + 1);
        inputs.push(query);
        inputs.extend(texts.iter().map(String::as_str));

        let mut embeddings = self.backend.embed(&inputs)?;
        if embeddings.len() != inputs.len() {
            return Err(EmbeddingError::OutputMismatch {
                expected: inputs.len(),
                actual: embeddings.len(),
            }
            .into());
        }

        if self.policy == NormalizationPolicy::L2 {
            for v in &mut embeddings {
                l2_normalize(v);
            }
        }

        let candidate_embeddings = embeddings.split_off(1);
        let query_embedding = &embeddings[0];

        Ok(self
            .backend
            .similarity_pairwise(query_embedding, &candidate_embeddings))
    }
}

fn select<C>(
    candidates: Vec<C>,
    scores: &[f32],
    threshold: f32,
    max_results: usize,
) -> RankedResult<C> {
    let relevant: Vec<usize> = scores
        .iter()
        .enumerate()
        .filter(|(_, s)| **s >= threshold)
        .map(|(i, _)| i)
        .take(max_results)
        .collect();

    let (indices, outcome) = if relevant.is_empty() {
        let mut order: Vec<usize> = (0..scores.len()).collect();
        // Stable sort keeps input order among equal scores; NaN sorts last.
        order.sort_by(|a, b| fallback_key(scores[*b]).total_cmp(&fallback_key(scores[*a])));
        order.truncate(max_results);
        (order, RankOutcome::Fallback)
    } else {
        (relevant, RankOutcome::Relevant)
    };

    let mut slots: Vec<Option<C>> = candidates.into_iter().map(Some).collect();
    let items = indices
        .into_iter()
        .filter_map(|index| {
            slots[index].take().map(|candidate| ScoredCandidate {
                candidate,
                score: scores[index],
                index,
            })
        })
        .collect();

    RankedResult { items, outcome }
}

fn fallback_key(score: f32) -> f32 {
    if score.is_nan() {
        f32::NEG_INFINITY
    } else {
        score
    }
}
