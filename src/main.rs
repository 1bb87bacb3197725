//! Blast-radius HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use blast_radius::config::Config;
use blast_radius::credentials::{
    EnvCredentialResolver, MemorySettingsStore, ResolverChain, SettingsStore,
    StoreCredentialResolver,
};
use blast_radius::embedding::{EmbeddingBackend, MiniLmConfig, MiniLmEmbedder};
use blast_radius::gateway::{AppContext, create_router};
use blast_radius::ranking::RelevanceRanker;
use blast_radius::synthesis::{GenaiGenerator, StructuredGenerator, StubGenerator, Synthesizer};
use blast_radius::tracker::JiraClient;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const TRACKER_TIMEOUT_SECS: u64 = 30;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!(
        r#"
 ___ _      _   ___ _____   ___    _   ___ ___ _   _ ___
| _ ) |    /_\ / __|_   _| | _ \  /_\ |   \_ _| | | / __|
| _ \ |__ / _ \\__ \ | |   |   / / _ \| |) | || |_| \__ \
|___/____/_/ \_\___/ |_|   |_|_\/_/ \_\___/___|\___/|___/

        WHAT DOES THIS CHANGE TOUCH?
                                        AGPL-3.0
"#
    );

    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        threshold = config.threshold,
        normalization = %config.normalization.as_str(),
        "Blast radius starting"
    );

    let minilm_config = if let Some(path) = &config.model_path {
        MiniLmConfig::new(path.clone())
    } else {
        tracing::warn!("No BLAST_RADIUS_MODEL_PATH configured, running embedder in stub mode");
        MiniLmConfig::stub()
    };
    let embedder = MiniLmEmbedder::load(minilm_config).inspect_err(|e| {
        if e.is_load_failure() {
            tracing::error!(error = %e, "Sentence model unavailable, unset BLAST_RADIUS_MODEL_PATH to run in stub mode");
        }
    })?;
    let embedder: Arc<dyn EmbeddingBackend> = Arc::new(embedder);
    let ranker = RelevanceRanker::new(embedder, config.normalization);

    let settings: Arc<dyn SettingsStore> = match &config.tenant_settings_path {
        Some(path) => Arc::new(MemorySettingsStore::from_file(path)?),
        None => Arc::new(MemorySettingsStore::new()),
    };

    let env_resolver = EnvCredentialResolver::new(
        config.jira_url.as_deref(),
        config.jira_email.as_deref(),
        config.jira_api_token.as_deref(),
    );
    if !env_resolver.is_configured() {
        tracing::warn!("No JIRA_URL configured, requests need tenant or header credentials");
    }
    let credentials = ResolverChain::new()
        .then(Arc::new(StoreCredentialResolver::new(settings.clone())))
        .then(Arc::new(env_resolver));
    tracing::info!(resolvers = ?credentials, "Credential resolution order");

    let generator: Arc<dyn StructuredGenerator> = if config.mock_provider {
        tracing::warn!("BLAST_RADIUS_MOCK_PROVIDER set, LLM responses are stubbed");
        Arc::new(StubGenerator::new())
    } else {
        Arc::new(GenaiGenerator::default())
    };
    let synthesizer = Synthesizer::new(
        generator,
        config.code_model.clone(),
        config.synthesis_model.clone(),
    );

    let source = JiraClient::with_timeout(Duration::from_secs(TRACKER_TIMEOUT_SECS))?;

    let ctx = AppContext::new(
        ranker,
        config.ranker_config(),
        Arc::new(source),
        Arc::new(credentials),
        settings,
        Arc::new(synthesizer),
    );

    let app = create_router(ctx);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Blast radius shutdown complete");
    Ok(())
}

fn run_health_check() -> i32 {
    let port = std::env::var("BLAST_RADIUS_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let Ok(rt) = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    else {
        return 1;
    };

    rt.block_on(async {
        let Ok(client) = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
        else {
            return 1;
        };

        match client.get(&url).send().await {
            Ok(res) if res.status().is_success() => 0,
            _ => 1,
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
