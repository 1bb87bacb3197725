//! HTTP client helpers for tests.

use blast_radius::gateway::payload::{CalculationResponse, CommentResponse};
use blast_radius::synthesis::{CodeSummary, ComparisonSummary, RequirementsSummary};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(DEFAULT_TIMEOUT_SECS);
const STATUS_HEADER: &str = "x-blast-radius-status";

pub struct TestClient {
    client: reqwest::Client,
    base_url: String,
    headers: Vec<(String, String)>,
}

impl TestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
            headers: Vec::new(),
        }
    }

    /// Adds a header sent with every POST.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{}", self.base_url, path)
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &Value,
    ) -> Result<(T, String), TestClientError> {
        let mut builder = self
            .client
            .post(self.url(path))
            .header("Content-Type", "application/json");
        for (name, value) in &self.headers {
            builder = builder.header(name, value);
        }

        let resp = builder.json(body).send().await?;

        let status_header = resp
            .headers()
            .get(STATUS_HEADER)
            .and_then(|h| h.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        match resp.status().as_u16() {
            200 | 201 => Ok((resp.json().await?, status_header)),
            400 => Err(TestClientError::BadRequest(resp.text().await?)),
            status => {
                let body = resp.text().await.unwrap_or_default();
                Err(TestClientError::UnexpectedStatus(status, body))
            }
        }
    }

    pub async fn calculation(
        &self,
        body: Value,
    ) -> Result<(CalculationResponse, String), TestClientError> {
        self.post("/blast-radius/calculation", &body).await
    }

    pub async fn comment(
        &self,
        issue_key: &str,
        comment: &str,
    ) -> Result<CommentResponse, TestClientError> {
        let body = json!({"issue_key": issue_key, "comment": comment});
        Ok(self.post("/blast-radius/comment", &body).await?.0)
    }

    pub async fn summarize_code(&self, diffs: &str) -> Result<CodeSummary, TestClientError> {
        let body = json!({ "diffs": diffs });
        Ok(self.post("/syntropy/code/summarize", &body).await?.0)
    }

    pub async fn summarize_requirements(
        &self,
        requirements: &str,
    ) -> Result<RequirementsSummary, TestClientError> {
        let body = json!({ "requirements": requirements });
        Ok(self.post("/syntropy/requirements/summarize", &body).await?.0)
    }

    pub async fn compare(
        &self,
        code: &CodeSummary,
        requirements: &RequirementsSummary,
    ) -> Result<ComparisonSummary, TestClientError> {
        let body = json!({"code_summary": code, "requirements_summary": requirements});
        Ok(self.post("/syntropy/comparison/summarize", &body).await?.0)
    }

    pub async fn synthesize(
        &self,
        diffs: &str,
        requirements: &str,
    ) -> Result<ComparisonSummary, TestClientError> {
        let body = json!({"diffs": diffs, "requirements": requirements});
        Ok(self.post("/syntropy/synthesis", &body).await?.0)
    }

    pub async fn health(&self) -> Result<HealthResponse, TestClientError> {
        let resp = self.client.get(self.url("/healthz")).send().await?;

        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(TestClientError::UnexpectedStatus(status, body))
        }
    }

    pub async fn ready(&self) -> Result<ReadyResponse, TestClientError> {
        let resp = self.client.get(self.url("/ready")).send().await?;

        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(TestClientError::UnexpectedStatus(status, body))
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ComponentStatus {
    pub http: String,
    pub embedding: String,
    pub embedder_mode: String,
    pub embedding_dim: usize,
    pub normalization: String,
    pub llm_provider: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReadyResponse {
    pub status: String,
    pub components: ComponentStatus,
}

impl ReadyResponse {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TestClientError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Unexpected HTTP status: {0} - Body: {1}")]
    UnexpectedStatus(u16, String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl TestClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            TestClientError::UnexpectedStatus(status, _) => Some(*status),
            TestClientError::BadRequest(_) => Some(400),
            TestClientError::RequestFailed(e) => e.status().map(|s| s.as_u16()),
        }
    }
}
