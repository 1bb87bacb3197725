use async_trait::async_trait;

use super::error::TrackerError;
use super::issue::TrackerIssue;

/// How requests to the tracker authenticate.
#[derive(Clone, PartialEq, Eq)]
pub enum TrackerAuth {
    /// Account email plus API token, sent as HTTP basic auth.
    Basic { email: String, token: String },
    /// A caller-supplied `Authorization` header value, forwarded verbatim.
    Header(String),
}

impl std::fmt::Debug for TrackerAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackerAuth::Basic { email, .. } => f
                .debug_struct("Basic")
                .field("email", email)
                .field("token", &"<redacted>")
                .finish(),
            TrackerAuth::Header(_) => f.debug_tuple("Header").field(&"<redacted>").finish(),
        }
    }
}

/// Where and how to reach one tenant's tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerCredentials {
    /// Site root, e.g. `https://example.atlassian.net` (no API suffix).
    pub base_url: String,
    pub auth: TrackerAuth,
}

impl TrackerCredentials {
    pub fn new(base_url: &str, auth: TrackerAuth) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            auth,
        }
    }

    pub fn basic(base_url: &str, email: &str, token: &str) -> Self {
        Self::new(
            base_url,
            TrackerAuth::Basic {
                email: email.to_string(),
                token: token.to_string(),
            },
        )
    }

    /// Browser URL of an issue.
    pub fn browse_url(&self, key: &str) -> String {
        format!("{}/browse/{}", self.base_url, key)
    }

    pub fn api_url(&self, path: &str) -> String {
        format!("{}/rest/api/3/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// `issue/{key}/{resource}` under the API root, with `issue_key` pushed as a single
    /// percent-encoded path segment.
    pub fn issue_api_url(
        &self,
        issue_key: &str,
        resource: &str,
    ) -> Result<reqwest::Url, TrackerError> {
        let base = self.api_url("issue");
        let mut url = reqwest::Url::parse(&base).map_err(|e| TrackerError::InvalidUrl {
            url: base.clone(),
            reason: e.to_string(),
        })?;
        url.path_segments_mut()
            .map_err(|_| TrackerError::InvalidUrl {
                url: base.clone(),
                reason: "not a hierarchical URL".to_string(),
            })?
            .push(issue_key)
            .push(resource);
        Ok(url)
    }
}

/// Strips trailing slashes and a trailing `/rest/api/3` so URLs can be joined uniformly.
pub fn normalize_base_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    let trimmed = trimmed.strip_suffix("/rest/api/3").unwrap_or(trimmed);
    trimmed.trim_end_matches('/').to_string()
}

/// Supplier of ranking candidates, and sink for comments on them.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Fetches every issue visible with `credentials`, in tracker order.
    async fn fetch_all(
        &self,
        credentials: &TrackerCredentials,
    ) -> Result<Vec<TrackerIssue>, TrackerError>;

    /// Posts a plain-text comment on `issue_key`.
    async fn add_comment(
        &self,
        credentials: &TrackerCredentials,
        issue_key: &str,
        body: &str,
    ) -> Result<(), TrackerError>;
}
