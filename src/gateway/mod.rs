//! HTTP gateway (Axum) for blast-radius ranking and code/requirements synthesis.

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;


use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::{
    calculation_handler, code_summary_handler, comment_handler, comparison_handler,
    requirements_summary_handler, synthesis_handler,
};
pub use state::AppContext;

use crate::constants::{STATUS_HEADER, STATUS_HEALTHY, STATUS_NOT_READY, STATUS_READY};

pub fn create_router(ctx: AppContext) -> Router {
    let blast_radius = Router::new()
        .route("/calculation", post(calculation_handler))
        .route("/comment", post(comment_handler));

    let syntropy = Router::new()
        .route("/code/summarize", post(code_summary_handler))
        .route("/requirements/summarize", post(requirements_summary_handler))
        .route("/comparison/summarize", post(comparison_handler))
        .route("/synthesis", post(synthesis_handler));

    Router::new()
        .route("/", get(root_handler))
        .route("/healthz", get(health_handler))
        .route("/health", get(legacy_health_handler))
        .route("/ready", get(ready_handler))
        .nest("/blast-radius", blast_radius)
        .nest("/syntropy", syntropy)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}

#[derive(serde::Serialize)]
pub struct RootResponse {
    pub message: &'static str,
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub embedding: &'static str,
    pub embedder_mode: &'static str,
    pub embedding_dim: usize,
    pub normalization: &'static str,
    pub llm_provider: &'static str,
}

pub async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Blast Radius API is running",
    })
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    health_response("ok")
}

/// `/health` keeps the `{"status": "healthy"}` body existing app callers check for.
#[tracing::instrument]
pub async fn legacy_health_handler() -> Response {
    health_response(STATUS_HEALTHY)
}

fn health_response(status: &'static str) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(STATUS_HEADER, HeaderValue::from_static(STATUS_HEALTHY));

    (StatusCode::OK, headers, Json(HealthResponse { status })).into_response()
}

#[tracing::instrument(skip(ctx))]
pub async fn ready_handler(State(ctx): State<AppContext>) -> Response {
    let backend = ctx.ranker.backend();
    let embedding_dim = backend.embedding_dim();
    let embedding_status = if embedding_dim > 0 {
        STATUS_READY
    } else {
        STATUS_NOT_READY
    };

    let components = ComponentStatus {
        http: STATUS_READY,
        embedding: embedding_status,
        embedder_mode: backend.mode().as_str(),
        embedding_dim,
        normalization: ctx.ranker.policy().as_str(),
        llm_provider: ctx.synthesizer.generator_name(),
    };

    let is_ready = components.embedding == STATUS_READY;
    let (status_code, status_msg) = if is_ready {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "pending")
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        STATUS_HEADER,
        HeaderValue::from_static(if is_ready { STATUS_READY } else { STATUS_NOT_READY }),
    );

    (
        status_code,
        headers,
        Json(ReadyResponse {
            status: status_msg,
            components,
        }),
    )
        .into_response()
}
