use thiserror::Error;

use crate::embedding::EmbeddingError;

#[derive(Debug, Error)]
pub enum RankingError {
    /// The embedding backend failed; nothing is retried and no partial result is returned.
    #[error("embedding backend error: {0}")]
    EmbeddingBackend(#[from] EmbeddingError),

    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },
}
