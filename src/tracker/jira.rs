use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::error::TrackerError;
use super::issue::{TrackerIssue, comment_document, flatten_description, is_valid_issue_key};
use super::source::{CandidateSource, TrackerAuth, TrackerCredentials};
use crate::constants::TRACKER_PAGE_SIZE;

const SEARCH_FIELDS: &str = "summary,description,issuetype";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchPage {
    #[serde(default)]
    issues: Vec<RawIssue>,
    total: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct RawIssue {
    id: String,
    key: String,
    #[serde(default)]
    fields: RawFields,
}

#[derive(Debug, Default, Deserialize)]
struct RawFields {
    summary: Option<String>,
    description: Option<Value>,
    issuetype: Option<RawIssueType>,
}

#[derive(Debug, Deserialize)]
struct RawIssueType {
    name: String,
}

/// REST client for Jira Cloud (`/rest/api/3`).
#[derive(Debug, Clone)]
pub struct JiraClient {
    http: reqwest::Client,
    page_size: usize,
}

impl Default for JiraClient {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

impl JiraClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            page_size: TRACKER_PAGE_SIZE,
        }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, TrackerError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::new(http))
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    fn authorize(&self, request: RequestBuilder, credentials: &TrackerCredentials) -> RequestBuilder {
        match &credentials.auth {
            TrackerAuth::Basic { email, token } => request.basic_auth(email, Some(token)),
            TrackerAuth::Header(value) => request.header(reqwest::header::AUTHORIZATION, value),
        }
    }

    async fn fetch_page(
        &self,
        credentials: &TrackerCredentials,
        start_at: usize,
    ) -> Result<SearchPage, TrackerError> {
        let request = self
            .http
            .get(credentials.api_url("search"))
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[
                ("fields", SEARCH_FIELDS.to_string()),
                ("startAt", start_at.to_string()),
                ("maxResults", self.page_size.to_string()),
            ]);

        let response = self.authorize(request, credentials).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TrackerError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<SearchPage>()
            .await
            .map_err(|e| TrackerError::Malformed {
                reason: e.to_string(),
            })
    }

    fn convert(credentials: &TrackerCredentials, raw: RawIssue) -> Result<TrackerIssue, TrackerError> {
        let issue_id = raw.id.parse::<i64>().map_err(|_| TrackerError::Malformed {
            reason: format!("issue {} has non-numeric id '{}'", raw.key, raw.id),
        })?;

        Ok(TrackerIssue {
            issue_id,
            url: credentials.browse_url(&raw.key),
            summary: raw.fields.summary.unwrap_or_default(),
            description: flatten_description(raw.fields.description.as_ref()),
            issue_type: raw
                .fields
                .issuetype
                .map(|t| t.name)
                .unwrap_or_default(),
            key: raw.key,
        })
    }
}

#[async_trait]
impl CandidateSource for JiraClient {
    #[instrument(skip(self, credentials), fields(base_url = %credentials.base_url))]
    async fn fetch_all(
        &self,
        credentials: &TrackerCredentials,
    ) -> Result<Vec<TrackerIssue>, TrackerError> {
        let mut issues = Vec::new();
        let mut start_at = 0;

        loop {
            let page = self.fetch_page(credentials, start_at).await?;
            let fetched = page.issues.len();
            debug!(start_at, fetched, total = page.total, "Fetched search page");

            for raw in page.issues {
                issues.push(Self::convert(credentials, raw)?);
            }

            start_at += fetched;
            let exhausted = match page.total {
                Some(total) => start_at >= total,
                None => fetched < self.page_size,
            };
            if fetched == 0 || exhausted {
                break;
            }
        }

        info!(count = issues.len(), "Fetched tracker issues");
        Ok(issues)
    }

    #[instrument(skip(self, credentials, body), fields(base_url = %credentials.base_url))]
    async fn add_comment(
        &self,
        credentials: &TrackerCredentials,
        issue_key: &str,
        body: &str,
    ) -> Result<(), TrackerError> {
        if !is_valid_issue_key(issue_key) {
            return Err(TrackerError::InvalidIssueKey {
                key: issue_key.to_string(),
            });
        }

        let request = self
            .http
            .post(credentials.issue_api_url(issue_key, "comment")?)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&comment_document(body));

        let response = self.authorize(request, credentials).send().await?;
        let status = response.status();

        if status == StatusCode::CREATED {
            info!(issue_key, "Comment added");
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            warn!(issue_key, status = status.as_u16(), "Failed to add comment");
            Err(TrackerError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}
