use serde::{Deserialize, Serialize};

/// An item that can be ranked against a query.
pub trait Candidate {
    /// Deterministic string form used as embedding input.
    fn textual_representation(&self) -> String;
}

impl Candidate for String {
    fn textual_representation(&self) -> String {
        self.clone()
    }
}

impl Candidate for &str {
    fn textual_representation(&self) -> String {
        (*self).to_string()
    }
}

/// Whether embeddings are scaled to unit length before scoring.
///
/// Scores are dot products, so `L2` yields cosine similarity in `[-1, 1]`. The two
/// policies order candidates identically when the backend already normalizes, but are
/// not interchangeable against a fixed threshold in general.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalizationPolicy {
    #[default]
    L2,
    Raw,
}

impl NormalizationPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            NormalizationPolicy::L2 => "l2",
            NormalizationPolicy::Raw => "raw",
        }
    }
}

impl std::str::FromStr for NormalizationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "l2" | "normalized" => Ok(NormalizationPolicy::L2),
            "raw" | "none" => Ok(NormalizationPolicy::Raw),
            other => Err(format!("unknown normalization policy '{}'", other)),
        }
    }
}

/// Which selection path produced a [`RankedResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankOutcome {
    /// At least one candidate met the threshold; items are those matches.
    Relevant,
    /// Nothing met the threshold; items are the closest candidates overall.
    Fallback,
    /// The candidate set was empty; no embedding work was done.
    NoCandidates,
}

impl RankOutcome {
    /// `true` for anything that is not a genuine threshold match.
    pub fn is_fallback(&self) -> bool {
        !matches!(self, RankOutcome::Relevant)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RankOutcome::Relevant => "relevant",
            RankOutcome::Fallback => "fallback",
            RankOutcome::NoCandidates => "no_candidates",
        }
    }
}

impl std::fmt::Display for RankOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A candidate together with its similarity to the query.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate<C> {
    pub candidate: C,
    pub score: f32,
    /// Position of the candidate in the input sequence.
    pub index: usize,
}

/// Ordered ranking output plus the path that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedResult<C> {
    pub items: Vec<ScoredCandidate<C>>,
    pub outcome: RankOutcome,
}

impl<C> RankedResult<C> {
    pub fn no_candidates() -> Self {
        Self {
            items: Vec::new(),
            outcome: RankOutcome::NoCandidates,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.outcome.is_fallback()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Highest score among the returned items.
    pub fn top_score(&self) -> Option<f32> {
        self.items.iter().map(|i| i.score).reduce(f32::max)
    }

    pub fn into_candidates(self) -> Vec<C> {
        self.items.into_iter().map(|i| i.candidate).collect()
    }
}
