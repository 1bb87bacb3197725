//! Blast-radius library crate (used by the server binary and integration tests).
//!
//! Given a code-change summary, the service finds the tracked issues it most likely touches:
//! every issue is embedded alongside the summary, scored by similarity, and kept when it
//! clears a threshold. When none does, the closest issues are returned instead and the
//! result says so. A second surface asks an LLM for structured summaries of code diffs and
//! requirements documents and compares the two category by category.
//!
//! ## Modules
//! - [`ranking`] - [`RelevanceRanker`], the threshold-or-fallback procedure
//! - [`embedding`] - [`EmbeddingBackend`] and the MiniLM / stub embedder
//! - [`tracker`] - the issue model and the Jira [`CandidateSource`]
//! - [`credentials`] - tenant settings, feature flags and credential resolution
//! - [`synthesis`] - structured LLM summaries and comparisons
//! - [`gateway`] - the Axum HTTP surface
//! - [`config`] - environment-backed [`Config`]
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod constants;
pub mod credentials;
pub mod embedding;
pub mod gateway;
pub mod ranking;
pub mod synthesis;
pub mod tracker;

pub use config::{Config, ConfigError};
pub use credentials::{
    CredentialError, CredentialResolver, EnvCredentialResolver, FeatureFlags,
    MemorySettingsStore, ResolverChain, SettingsStore, StoreCredentialResolver, TenantSettings,
};
pub use embedding::{
    EmbedderMode, EmbeddingBackend, EmbeddingError, MiniLmConfig, MiniLmEmbedder,
};
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbeddingBackend;
pub use gateway::{AppContext, GatewayError, create_router};
pub use ranking::{
    Candidate, NormalizationPolicy, RankOutcome, RankedResult, RankerConfig, RankingError,
    RelevanceRanker, ScoredCandidate,
};
pub use synthesis::{
    CodeSummary, ComparisonCategory, ComparisonSummary, GenaiGenerator, RequirementsSummary,
    StructuredGenerator, StubGenerator, SynthesisError, Synthesizer,
};
#[cfg(any(test, feature = "mock"))]
pub use tracker::StaticCandidateSource;
pub use tracker::{CandidateSource, JiraClient, TrackerCredentials, TrackerError, TrackerIssue};
