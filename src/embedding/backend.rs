use super::error::EmbeddingError;

/// How an [`EmbeddingBackend`] produces its vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedderMode {
    /// A loaded transformer model.
    Model,
    /// Deterministic hashed embeddings, no model files.
    Stub,
    /// Fixed vectors supplied by a test.
    Mock,
}

impl EmbedderMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmbedderMode::Model => "model",
            EmbedderMode::Stub => "stub",
            EmbedderMode::Mock => "mock",
        }
    }
}

impl std::fmt::Display for EmbedderMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text embedding backend shared read-only by all requests.
///
/// Implementations are initialized once at startup and must not carry per-request state.
/// `embed` returns exactly one vector per input text, in input order.
pub trait EmbeddingBackend: Send + Sync {
    /// Embeds a batch of texts.
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Dimension of every vector returned by [`embed`](Self::embed).
    fn embedding_dim(&self) -> usize;

    fn mode(&self) -> EmbedderMode;

    /// Similarity of two embeddings. Higher means more similar.
    fn similarity(&self, a: &[f32], b: &[f32]) -> f32 {
        dot(a, b)
    }

    /// Similarity of `query` against each of `others`, index-aligned with `others`.
    fn similarity_pairwise(&self, query: &[f32], others: &[Vec<f32>]) -> Vec<f32> {
        others
            .iter()
            .map(|other| self.similarity(query, other))
            .collect()
    }
}

/// Dot product; mismatched or empty inputs score `0.0`.
#[inline]
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Scales `v` to unit length in place. Zero vectors are left untouched.
#[inline]
pub fn l2_normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}
