//! Cross-cutting, shared constants.
//!
//! The embedding dimension and sequence length describe the all-MiniLM-L6-v2 layout the
//! embedder is built around. Thresholds are defaults for the service; the ranker itself
//! always takes its threshold as an explicit argument.

/// Output dimension of the MiniLM sentence embedder (and the stub embedder).
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Token budget per text before truncation.
pub const DEFAULT_MAX_SEQ_LEN: usize = 256;

/// Service-level relevance threshold (cosine similarity over L2-normalized embeddings).
pub const DEFAULT_RELEVANCE_THRESHOLD: f32 = 0.5;

/// Default cap on returned issues when a request does not name one.
pub const DEFAULT_MAX_ITEMS: usize = 20;

/// Page size requested from the issue tracker search API.
pub const TRACKER_PAGE_SIZE: usize = 100;

/// Default LLM used to summarize code diffs.
pub const DEFAULT_CODE_MODEL: &str = "gemini-1.5-pro-latest";

/// Default LLM used for requirements summaries and comparisons.
pub const DEFAULT_SYNTHESIS_MODEL: &str = "gemini-2.0-flash";

/// Response header carrying a short machine-readable status.
pub const STATUS_HEADER: &str = "x-blast-radius-status";

/// Request header carrying the tenant (user) id used for credential lookup.
pub const TENANT_HEADER: &str = "x-tenant-id";

/// Request header carrying a caller-supplied tracker base URL.
pub const TRACKER_URL_HEADER: &str = "jira_url";

pub const STATUS_HEALTHY: &str = "healthy";
pub const STATUS_READY: &str = "ready";
pub const STATUS_NOT_READY: &str = "not_ready";
