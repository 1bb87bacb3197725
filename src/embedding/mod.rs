//! Embedding backends.
//!
//! - [`EmbeddingBackend`] is the seam the ranker consumes.
//! - [`minilm`] provides the candle sentence embedder (with a stub mode).

/// Backend trait and vector helpers.
pub mod backend;
/// BERT encoder with mean pooling.
pub mod bert;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
/// MiniLM sentence embedder.
pub mod minilm;
#[cfg(any(test, feature = "mock"))]
mod mock;
/// Tokenizer loading helpers.
pub mod utils;

pub use backend::{EmbedderMode, EmbeddingBackend, dot, l2_normalize};
pub use error::EmbeddingError;
pub use minilm::{MINILM_EMBEDDING_DIM, MINILM_MAX_SEQ_LEN, MiniLmConfig, MiniLmEmbedder};

#[cfg(any(test, feature = "mock"))]
pub use mock::MockEmbeddingBackend;
