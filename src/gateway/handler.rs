use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::constants::{STATUS_HEADER, TENANT_HEADER, TRACKER_URL_HEADER};
use crate::credentials::FeatureFlags;
use crate::gateway::error::GatewayError;
use crate::gateway::payload::{
    CalculationRequest, CalculationResponse, CommentRequest, CommentResponse, ComparisonRequest,
    DiffsRequest, RequirementsRequest, SynthesisRequest,
};
use crate::gateway::state::AppContext;
use crate::ranking::{RankOutcome, RankedResult, RankerConfig};
use crate::tracker::{TrackerAuth, TrackerCredentials, TrackerIssue, is_valid_issue_key};

#[instrument(skip(ctx, headers, body), fields(request_id = tracing::field::Empty))]
pub async fn calculation_handler(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Result<Response, GatewayError> {
    let request: CalculationRequest = parse_body(body)?;
    if request.summary.trim().is_empty() {
        return Err(GatewayError::InvalidRequest(
            "summary must not be empty".to_string(),
        ));
    }

    let config = RankerConfig {
        threshold: request
            .threshold
            .unwrap_or(ctx.ranking_defaults.threshold),
        max_results: request
            .max_items
            .unwrap_or(ctx.ranking_defaults.max_results),
    };
    config.validate()?;

    let request_id = Uuid::new_v4().to_string();
    tracing::Span::current().record("request_id", tracing::field::display(&request_id));

    let credentials = resolve_credentials(&ctx, &headers).await?;
    let issues = ctx.source.fetch_all(&credentials).await?;
    debug!(issues = issues.len(), "Fetched candidate issues");

    let ranker = ctx.ranker.clone();
    let summary = request.summary;
    let ranked = tokio::task::spawn_blocking(move || ranker.rank_with(&summary, issues, &config))
        .await
        .map_err(|e| GatewayError::InternalError(format!("Ranking task failed: {}", e)))??;

    log_ranked(&ranked);

    let outcome = ranked.outcome;
    let response = CalculationResponse::from_ranked(request_id, ranked);
    Ok((StatusCode::OK, status_headers(outcome), Json(response)).into_response())
}

#[instrument(skip(ctx, headers, body))]
pub async fn comment_handler(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Result<Response, GatewayError> {
    let request: CommentRequest = parse_body(body)?;
    if request.issue_key.trim().is_empty() || request.comment.trim().is_empty() {
        return Err(GatewayError::InvalidRequest(
            "issue_key and comment must not be empty".to_string(),
        ));
    }

    if !is_valid_issue_key(&request.issue_key) {
        return Err(GatewayError::InvalidRequest(format!(
            "invalid issue key '{}'",
            request.issue_key
        )));
    }

    let flags = feature_flags(&ctx, &headers).await?;
    if !flags.jira_ticket_enabled {
        return Err(GatewayError::FeatureDisabled("jira_ticket_enabled"));
    }

    let credentials = resolve_credentials(&ctx, &headers).await?;
    ctx.source
        .add_comment(&credentials, &request.issue_key, &request.comment)
        .await?;
    info!(issue_key = %request.issue_key, "Comment posted");

    Ok((
        StatusCode::CREATED,
        Json(CommentResponse {
            issue_key: request.issue_key,
            status: "created".to_string(),
        }),
    )
        .into_response())
}

#[instrument(skip(ctx, headers, body))]
pub async fn code_summary_handler(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Result<Response, GatewayError> {
    let request: DiffsRequest = parse_body(body)?;
    require_summaries_enabled(&ctx, &headers).await?;

    let summary = ctx.synthesizer.summarize_code(&request.diffs).await?;
    Ok(Json(summary).into_response())
}

#[instrument(skip(ctx, headers, body))]
pub async fn requirements_summary_handler(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Result<Response, GatewayError> {
    let request: RequirementsRequest = parse_body(body)?;
    require_summaries_enabled(&ctx, &headers).await?;

    let summary = ctx
        .synthesizer
        .summarize_requirements(&request.requirements)
        .await?;
    Ok(Json(summary).into_response())
}

#[instrument(skip(ctx, headers, body))]
pub async fn comparison_handler(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Result<Response, GatewayError> {
    let request: ComparisonRequest = parse_body(body)?;
    require_summaries_enabled(&ctx, &headers).await?;

    let comparison = ctx
        .synthesizer
        .compare(&request.code_summary, &request.requirements_summary)
        .await?;
    Ok(Json(comparison).into_response())
}

#[instrument(skip(ctx, headers, body))]
pub async fn synthesis_handler(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    Json(body): Json<serde_json::Value>,
) -> Result<Response, GatewayError> {
    let request: SynthesisRequest = parse_body(body)?;
    require_summaries_enabled(&ctx, &headers).await?;

    let comparison = ctx
        .synthesizer
        .synthesize(&request.diffs, &request.requirements)
        .await?;
    Ok(Json(comparison).into_response())
}

pub(crate) fn parse_body<T: DeserializeOwned>(body: serde_json::Value) -> Result<T, GatewayError> {
    serde_json::from_value(body)
        .map_err(|e| GatewayError::InvalidRequest(format!("Invalid request schema: {}", e)))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

pub(crate) fn tenant_id(headers: &HeaderMap) -> Option<&str> {
    header_str(headers, TENANT_HEADER)
}

/// Request headers win outright; otherwise the resolver chain decides.
pub(crate) async fn resolve_credentials(
    ctx: &AppContext,
    headers: &HeaderMap,
) -> Result<TrackerCredentials, GatewayError> {
    if let (Some(url), Some(auth)) = (
        header_str(headers, TRACKER_URL_HEADER),
        header_str(headers, AUTHORIZATION.as_str()),
    ) {
        debug!("Using request-scoped tracker credentials");
        return Ok(TrackerCredentials::new(
            url,
            TrackerAuth::Header(auth.to_string()),
        ));
    }

    ctx.credentials
        .resolve(tenant_id(headers))
        .await
        .map_err(|e| GatewayError::InternalError(e.to_string()))?
        .ok_or(GatewayError::MissingCredentials)
}

async fn feature_flags(ctx: &AppContext, headers: &HeaderMap) -> Result<FeatureFlags, GatewayError> {
    ctx.settings
        .feature_flags(tenant_id(headers))
        .await
        .map_err(|e| GatewayError::InternalError(e.to_string()))
}

async fn require_summaries_enabled(
    ctx: &AppContext,
    headers: &HeaderMap,
) -> Result<(), GatewayError> {
    if feature_flags(ctx, headers).await?.pr_summaries_enabled {
        Ok(())
    } else {
        Err(GatewayError::FeatureDisabled("pr_summaries_enabled"))
    }
}

fn status_headers(outcome: RankOutcome) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(STATUS_HEADER, HeaderValue::from_static(outcome.as_str()));
    headers
}

fn log_ranked(ranked: &RankedResult<TrackerIssue>) {
    match ranked.outcome {
        RankOutcome::Relevant => info!(count = ranked.len(), "Relevant issues found"),
        RankOutcome::Fallback => info!(
            count = ranked.len(),
            "No relevant issues found, returning closest matches"
        ),
        RankOutcome::NoCandidates => info!("Tracker returned no issues"),
    }

    for item in &ranked.items {
        info!(
            key = %item.candidate.key,
            summary = %item.candidate.summary,
            url = %item.candidate.url,
            score = item.score,
            "Ranked issue"
        );
    }
}
