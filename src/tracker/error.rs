use thiserror::Error;

/// Failures talking to the issue tracker.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("tracker request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("tracker returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed tracker response: {reason}")]
    Malformed { reason: String },

    #[error("invalid issue key '{key}'")]
    InvalidIssueKey { key: String },

    #[error("invalid tracker URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}
