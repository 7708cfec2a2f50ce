use rmcp::{ErrorData as McpError, handler::server::wrapper::Parameters, model::CallToolResult};

use crate::{models::InsightRequest, state::AppState, tools::json_result};

pub async fn generate_insight(
    state: &AppState,
    Parameters(request): Parameters<InsightRequest>,
) -> Result<CallToolResult, McpError> {
    request
        .validate()
        .map_err(|msg| McpError::invalid_params(msg, None))?;
    let insight = tokio::time::timeout(state.config.request_timeout, state.insights.generate(&request))
        .await
        .map_err(|_| McpError::internal_error("insight generation timed out", None))?;
    json_result(&insight)
}
