//! Relevance ranking of candidates against a free-text query.
//!
//! [`RelevanceRanker::rank`] embeds the query and every candidate's textual representation
//! in one batched backend call, scores each candidate by similarity, and keeps those at or
//! above the threshold. When nothing clears the threshold it returns the closest candidates
//! instead, flagged as a fallback so callers never have to infer it from logs.

pub mod config;
pub mod error;
pub mod ranker;
pub mod types;


pub use config::RankerConfig;
pub use error::RankingError;
pub use ranker::RelevanceRanker;
pub use types::{Candidate, NormalizationPolicy, RankOutcome, RankedResult, ScoredCandidate};
