use async_trait::async_trait;
use parking_lot::Mutex;

use super::error::TrackerError;
use super::issue::TrackerIssue;
use super::source::{CandidateSource, TrackerCredentials};

/// Candidate source serving a fixed issue list and recording comments.
#[derive(Debug, Default)]
pub struct StaticCandidateSource {
    issues: Vec<TrackerIssue>,
    fail_with_status: Option<u16>,
    comments: Mutex<Vec<(String, String)>>,
}

impl StaticCandidateSource {
    pub fn new(issues: Vec<TrackerIssue>) -> Self {
        Self {
            issues,
            ..Default::default()
        }
    }

    /// A source whose every call fails with the given HTTP status.
    pub fn failing(status: u16) -> Self {
        Self {
            fail_with_status: Some(status),
            ..Default::default()
        }
    }

    /// `(issue_key, body)` pairs posted so far.
    pub fn comments(&self) -> Vec<(String, String)> {
        self.comments.lock().clone()
    }

    fn check(&self) -> Result<(), TrackerError> {
        match self.fail_with_status {
            Some(status) => Err(TrackerError::Status {
                status,
                body: "static source failure".to_string(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CandidateSource for StaticCandidateSource {
    async fn fetch_all(
        &self,
        _credentials: &TrackerCredentials,
    ) -> Result<Vec<TrackerIssue>, TrackerError> {
        self.check()?;
        Ok(self.issues.clone())
    }

    async fn add_comment(
        &self,
        _credentials: &TrackerCredentials,
        issue_key: &str,
        body: &str,
    ) -> Result<(), TrackerError> {
        self.check()?;
        self.comments
            .lock()
            .push((issue_key.to_string(), body.to_string()));
        Ok(())
    }
}
