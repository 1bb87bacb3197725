use std::sync::Arc;

use crate::credentials::{CredentialResolver, SettingsStore};
use crate::ranking::{RankerConfig, RelevanceRanker};
use crate::synthesis::Synthesizer;
use crate::tracker::CandidateSource;

/// Shared handler state, built once at startup and cloned per request.
#[derive(Clone)]
pub struct AppContext {
    pub ranker: RelevanceRanker,

    /// Threshold and result cap used when a request omits them.
    pub ranking_defaults: RankerConfig,

    pub source: Arc<dyn CandidateSource>,

    pub credentials: Arc<dyn CredentialResolver>,

    pub settings: Arc<dyn SettingsStore>,

    pub synthesizer: Arc<Synthesizer>,
}

impl AppContext {
    pub fn new(
        ranker: RelevanceRanker,
        ranking_defaults: RankerConfig,
        source: Arc<dyn CandidateSource>,
        credentials: Arc<dyn CredentialResolver>,
        settings: Arc<dyn SettingsStore>,
        synthesizer: Arc<Synthesizer>,
    ) -> Self {
        Self {
            ranker,
            ranking_defaults,
            source,
            credentials,
            settings,
            synthesizer,
        }
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("ranker", &self.ranker)
            .field("ranking_defaults", &self.ranking_defaults)
            .field("credentials", &self.credentials.name())
            .field("synthesizer", &self.synthesizer)
            .finish_non_exhaustive()
    }
}
