use serde::{Deserialize, Serialize};

use crate::ranking::{RankOutcome, RankedResult};
use crate::synthesis::{CodeSummary, RequirementsSummary};
use crate::tracker::TrackerIssue;

#[derive(Debug, Clone, Deserialize)]
pub struct CalculationRequest {
    pub summary: String,
    #[serde(default)]
    pub max_items: Option<usize>,
    #[serde(default)]
    pub threshold: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredIssue {
    #[serde(flatten)]
    pub issue: TrackerIssue,
    pub score: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationResponse {
    pub request_id: String,
    pub outcome: RankOutcome,
    pub is_fallback: bool,
    pub relevant_issues: Vec<ScoredIssue>,
}

impl CalculationResponse {
    pub fn from_ranked(request_id: String, ranked: RankedResult<TrackerIssue>) -> Self {
        let outcome = ranked.outcome;
        let relevant_issues = ranked
            .items
            .into_iter()
            .map(|scored| ScoredIssue {
                issue: scored.candidate,
                score: scored.score,
            })
            .collect();

        Self {
            request_id,
            outcome,
            is_fallback: outcome.is_fallback(),
            relevant_issues,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentRequest {
    pub issue_key: String,
    pub comment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub issue_key: String,
    pub status: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiffsRequest {
    pub diffs: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RequirementsRequest {
    pub requirements: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComparisonRequest {
    pub code_summary: CodeSummary,
    pub requirements_summary: RequirementsSummary,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SynthesisRequest {
    pub diffs: String,
    pub requirements: String,
}
