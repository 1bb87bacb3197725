use std::path::PathBuf;
use thiserror::Error;

/// Failures raised while loading or running an embedder.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("sentence model directory not found: {path}")]
    ModelNotFound { path: PathBuf },

    #[error("could not load sentence model: {reason}")]
    ModelLoadFailed { reason: String },

    #[error("embedding forward pass failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("could not tokenize input: {reason}")]
    TokenizationFailed { reason: String },

    #[error("invalid embedder configuration: {reason}")]
    InvalidConfig { reason: String },

    /// The backend broke the one-vector-per-input contract.
    #[error("embedding backend returned {actual} vectors for {expected} inputs")]
    OutputMismatch { expected: usize, actual: usize },
}

impl EmbeddingError {
    /// True when the failure came from loading rather than running the model.
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            EmbeddingError::ModelNotFound { .. }
                | EmbeddingError::ModelLoadFailed { .. }
                | EmbeddingError::InvalidConfig { .. }
        )
    }
}

impl From<candle_core::Error> for EmbeddingError {
    fn from(err: candle_core::Error) -> Self {
        EmbeddingError::InferenceFailed {
            reason: err.to_string(),
        }
    }
}

impl From<std::io::Error> for EmbeddingError {
    fn from(err: std::io::Error) -> Self {
        EmbeddingError::ModelLoadFailed {
            reason: err.to_string(),
        }
    }
}
