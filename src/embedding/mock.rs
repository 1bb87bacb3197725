use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;

use super::backend::{EmbedderMode, EmbeddingBackend};
use super::error::EmbeddingError;

/// In-memory backend returning preset vectors per text (unknown texts map to `default`).
#[derive(Debug)]
pub struct MockEmbeddingBackend {
    vectors: RwLock<HashMap<String, Vec<f32>>>,
    default: Vec<f32>,
    fail: bool,
    missing_outputs: usize,
    calls: AtomicUsize,
    texts_embedded: AtomicUsize,
}

impl MockEmbeddingBackend {
    pub fn new(dim: usize) -> Self {
        Self {
            vectors: RwLock::new(HashMap::new()),
            default: vec![0.0; dim],
            fail: false,
            missing_outputs: 0,
            calls: AtomicUsize::new(0),
            texts_embedded: AtomicUsize::new(0),
        }
    }

    /// A backend whose every `embed` call fails.
    pub fn failing(dim: usize) -> Self {
        Self {
            fail: true,
            ..Self::new(dim)
        }
    }

    /// Drops the last `count` vectors from every `embed` response.
    pub fn with_missing_outputs(mut self, count: usize) -> Self {
        self.missing_outputs = count;
        self
    }

    pub fn with_vector(self, text: impl Into<String>, vector: Vec<f32>) -> Self {
        self.vectors.write().insert(text.into(), vector);
        self
    }

    /// Two-dimensional setup: `query` maps to `[1, 0]` and each candidate text to a unit
    /// vector whose dot product with the query is exactly its score.
    pub fn with_scores<'a>(query: &str, scored: impl IntoIterator<Item = (&'a str, f32)>) -> Self {
        let mut backend = Self::new(2).with_vector(query, vec![1.0, 0.0]);
        for (text, score) in scored {
            let rest = (1.0 - score * score).max(0.0).sqrt();
            backend = backend.with_vector(text, vec![score, rest]);
        }
        backend
    }

    /// Number of `embed` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Total texts passed to `embed` so far.
    pub fn texts_embedded(&self) -> usize {
        self.texts_embedded.load(Ordering::SeqCst)
    }
}

impl EmbeddingBackend for MockEmbeddingBackend {
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.texts_embedded.fetch_add(texts.len(), Ordering::SeqCst);

        if self.fail {
            return Err(EmbeddingError::InferenceFailed {
                reason: "mock backend failure".to_string(),
            });
        }

        let vectors = self.vectors.read();
        let returned = texts.len().saturating_sub(self.missing_outputs);
        Ok(texts[..returned]
            .iter()
            .map(|t| vectors.get(*t).cloned().unwrap_or_else(|| self.default.clone()))
            .collect())
    }

    fn embedding_dim(&self) -> usize {
        self.default.len()
    }

    fn mode(&self) -> EmbedderMode {
        EmbedderMode::Mock
    }
}
