use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::{get, post},
};
use serde_json::{Value, json};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::models::{Insight, InsightRequest};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/insights.generate", post(generate_insight))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

async fn generate_insight(
    State(state): State<AppState>,
    payload: Result<Json<InsightRequest>, JsonRejection>,
) -> ApiResult<Json<Insight>> {
    let Json(request) = payload.map_err(|err| ApiError::bad_request(err.body_text()))?;
    request.validate().map_err(ApiError::BadRequest)?;
    info!(
        signal = %request.signal_id,
        format = ?request.resolved_format(),
        "insight requested"
    );

    let insight = tokio::time::timeout(state.config.request_timeout, state.insights.generate(&request))
        .await
        .map_err(|_| ApiError::Timeout)?;
    Ok(Json(insight))
}
