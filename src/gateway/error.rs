use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::constants::STATUS_HEADER;
use crate::ranking::RankingError;
use crate::synthesis::SynthesisError;
use crate::tracker::TrackerError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("no tracker credentials available for this request")]
    MissingCredentials,

    #[error("feature disabled: {0}")]
    FeatureDisabled(&'static str),

    #[error("tracker request failed: {0}")]
    UpstreamFetch(#[from] TrackerError),

    #[error("provider error: {0}")]
    ProviderError(String),

    #[error("ranking failed: {0}")]
    RankingFailed(String),

    #[error("internal error: {0}")]
    InternalError(String),
}

impl From<RankingError> for GatewayError {
    fn from(err: RankingError) -> Self {
        match err {
            RankingError::InvalidInput { reason } => GatewayError::InvalidRequest(reason),
            other => GatewayError::RankingFailed(other.to_string()),
        }
    }
}

impl From<SynthesisError> for GatewayError {
    fn from(err: SynthesisError) -> Self {
        match err {
            SynthesisError::EmptyInput { .. } => GatewayError::InvalidRequest(err.to_string()),
            other => GatewayError::ProviderError(other.to_string()),
        }
    }
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl GatewayError {
    pub fn status(&self) -> (StatusCode, &'static str) {
        match self {
            GatewayError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            GatewayError::MissingCredentials => {
                (StatusCode::UNPROCESSABLE_ENTITY, "missing_credentials")
            }
            GatewayError::FeatureDisabled(_) => (StatusCode::FORBIDDEN, "feature_disabled"),
            GatewayError::UpstreamFetch(_) => (StatusCode::BAD_GATEWAY, "upstream_error"),
            GatewayError::ProviderError(_) => (StatusCode::BAD_GATEWAY, "provider_error"),
            GatewayError::RankingFailed(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "ranking_error")
            }
            GatewayError::InternalError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, status_tag) = self.status();

        let mut headers = HeaderMap::new();
        headers.insert(STATUS_HEADER, HeaderValue::from_static(status_tag));

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, headers, body).into_response()
    }
}
