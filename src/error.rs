//! Error types shared across the pipeline.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// A non-success HTTP status returned by the generative API.
#[derive(Debug, Clone, Error)]
#[error("upstream returned {status}: {body}")]
pub struct UpstreamStatus {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("GENAI_API_KEY is not configured")]
    MissingApiKey,

    #[error("video request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("video API error: {0}")]
    Upstream(#[from] UpstreamStatus),

    #[error("video API response could not be decoded: {0}")]
    Decode(String),

    #[error("operation {operation} failed: {message}")]
    OperationFailed { operation: String, message: String },

    #[error("operation {operation} finished without a usable video uri")]
    MissingMedia { operation: String },

    #[error("video generation timed out after {attempts} polls (operation={operation})")]
    Timeout { operation: String, attempts: u32 },
}

#[derive(Debug, Error)]
pub enum InsightError {
    #[error("GENAI_API_KEY is not configured")]
    MissingApiKey,

    #[error("completion request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("completion API error: {0}")]
    Upstream(#[from] UpstreamStatus),

    #[error("completion response carried no content")]
    EmptyContent,

    #[error("completion content violates the output schema: {0}")]
    Schema(String),
}

impl InsightError {
    pub fn is_schema_violation(&self) -> bool {
        matches!(self, InsightError::EmptyContent | InsightError::Schema(_))
    }
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache storage unavailable: {0}")]
    Unavailable(#[from] std::io::Error),

    #[error("prompt hash {prompt_hash} is already cached")]
    Conflict { prompt_hash: String },

    #[error("cache record {key} is corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Errors rendered by the UI-facing HTTP entry point.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("insight generation timed out")]
    Timeout,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Timeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_map_to_client_and_gateway_statuses() {
        assert_eq!(
            ApiError::bad_request("missing required fields: role")
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Timeout.into_response().status(),
            StatusCode::GATEWAY_TIMEOUT
        );
    }
}
