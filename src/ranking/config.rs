use crate::constants::{DEFAULT_MAX_ITEMS, DEFAULT_RELEVANCE_THRESHOLD};

use super::error::RankingError;

/// Threshold and result cap applied to one ranking call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankerConfig {
    pub threshold: f32,
    pub max_results: usize,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_RELEVANCE_THRESHOLD,
            max_results: DEFAULT_MAX_ITEMS,
        }
    }
}

impl RankerConfig {
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn validate(&self) -> Result<(), RankingError> {
        if self.max_results == 0 {
            return Err(RankingError::InvalidInput {
                reason: "max_results must be greater than 0".to_string(),
            });
        }
        if !self.threshold.is_finite() {
            return Err(RankingError::InvalidInput {
                reason: format!("threshold must be finite, got {}", self.threshold),
            });
        }
        Ok(())
    }
}
