//! Test server harness.

use blast_radius::credentials::{
    EnvCredentialResolver, FeatureFlags, MemorySettingsStore, ResolverChain, SettingsStore,
    StoreCredentialResolver,
};
use blast_radius::embedding::{MiniLmConfig, MiniLmEmbedder};
use blast_radius::gateway::{AppContext, create_router};
use blast_radius::ranking::{NormalizationPolicy, RankerConfig, RelevanceRanker};
use blast_radius::synthesis::{StubGenerator, Synthesizer};
use blast_radius::tracker::{StaticCandidateSource, TrackerIssue};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

const STARTUP_WAIT_TIMEOUT_SECS: u64 = 5;
const STARTUP_POLL_INTERVAL_MS: u64 = 50;
pub const TEST_TRACKER_URL: &str = "https://test.atlassian.net";

#[derive(Debug, Clone)]
pub struct TestServerConfig {
    pub port: u16,
    pub issues: Vec<TrackerIssue>,
    pub threshold: f32,
    pub max_items: usize,
    pub env_credentials: bool,
    pub default_flags: FeatureFlags,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            port: 0,
            issues: Vec::new(),
            threshold: 0.5,
            max_items: 20,
            env_credentials: true,
            default_flags: FeatureFlags::default(),
        }
    }
}

impl TestServerConfig {
    pub fn with_issues(mut self, issues: Vec<TrackerIssue>) -> Self {
        self.issues = issues;
        self
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn without_env_credentials(mut self) -> Self {
        self.env_credentials = false;
        self
    }

    pub fn with_default_flags(mut self, flags: FeatureFlags) -> Self {
        self.default_flags = flags;
        self
    }
}

pub fn issue(key: &str, summary: &str, description: &str) -> TrackerIssue {
    TrackerIssue {
        issue_id: 10_000 + key.len() as i64,
        key: key.to_string(),
        summary: summary.to_string(),
        description: description.to_string(),
        issue_type: "Story".to_string(),
        url: format!("{}/browse/{}", TEST_TRACKER_URL, key),
    }
}

pub struct TestServer {
    pub addr: SocketAddr,
    pub source: Arc<StaticCandidateSource>,
    pub generator: Arc<StubGenerator>,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        tokio::time::sleep(Duration::from_millis(STARTUP_POLL_INTERVAL_MS)).await;
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

pub async fn find_available_port() -> std::io::Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    Ok(addr.port())
}

pub async fn wait_for_server_ready(
    addr: SocketAddr,
    timeout: Duration,
    interval: Duration,
) -> Result<(), ServerStartupError> {
    let start = std::time::Instant::now();

    loop {
        if start.elapsed() > timeout {
            return Err(ServerStartupError::Timeout);
        }

        match tokio::net::TcpStream::connect(addr).await {
            Ok(_) => return Ok(()),
            Err(_) => {
                tokio::time::sleep(interval).await;
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerStartupError {
    #[error("Server failed to start within timeout")]
    Timeout,
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
    #[error("Server startup failed: {0}")]
    StartupFailed(String),
}

/// Spawns the full router with every external dependency replaced:
/// stub embedder, stub LLM generator, and a static issue list instead of Jira.
pub async fn spawn_test_server(config: TestServerConfig) -> Result<TestServer, ServerStartupError> {
    let port = if config.port == 0 {
        find_available_port().await?
    } else {
        config.port
    };

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;

    let embedder = MiniLmEmbedder::load(MiniLmConfig::stub())
        .map_err(|e| ServerStartupError::StartupFailed(e.to_string()))?;
    let ranker = RelevanceRanker::new(Arc::new(embedder), NormalizationPolicy::L2);

    let settings: Arc<dyn SettingsStore> =
        Arc::new(MemorySettingsStore::new().with_default_flags(config.default_flags));

    let mut credentials =
        ResolverChain::new().then(Arc::new(StoreCredentialResolver::new(settings.clone())));
    if config.env_credentials {
        credentials = credentials.then(Arc::new(EnvCredentialResolver::new(
            Some(TEST_TRACKER_URL),
            Some("bot@example.com"),
            Some("test-token"),
        )));
    }

    let source = Arc::new(StaticCandidateSource::new(config.issues));
    let generator = Arc::new(StubGenerator::new());
    let synthesizer = Synthesizer::new(generator.clone(), "test-code-model", "test-synth-model");

    let ctx = AppContext::new(
        ranker,
        RankerConfig::default()
            .with_threshold(config.threshold)
            .with_max_results(config.max_items),
        source.clone(),
        Arc::new(credentials),
        settings,
        Arc::new(synthesizer),
    );

    let app = create_router(ctx);

    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    wait_for_server_ready(
        local_addr,
        Duration::from_secs(STARTUP_WAIT_TIMEOUT_SECS),
        Duration::from_millis(STARTUP_POLL_INTERVAL_MS),
    )
    .await?;

    Ok(TestServer {
        addr: local_addr,
        source,
        generator,
        _server_handle: server_handle,
        shutdown_tx: Some(shutdown_tx),
    })
}
