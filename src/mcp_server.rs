use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};

use crate::models::InsightRequest;
use crate::state::AppState;
use crate::tools::GenerateSceneVideoRequest;

#[derive(Clone)]
pub struct InsightServer {
    tool_router: ToolRouter<Self>,
    state: AppState,
}

impl InsightServer {
    pub fn new(state: AppState) -> Self {
        Self {
            tool_router: Self::tool_router(),
            state,
        }
    }
}

#[tool_router]
impl InsightServer {
    #[tool(
        description = "Generate a strategic insight for a signal, role and industry. Returns a narrative (title, body, implication, 3 metrics) or, when rawInput is given or format is storyboard, a 5-scene storyboard with generated background videos. Storyboards can take several minutes."
    )]
    async fn generate_insight(
        &self,
        Parameters(request): Parameters<InsightRequest>,
    ) -> Result<CallToolResult, McpError> {
        crate::tools::generate_insight(&self.state, Parameters(request)).await
    }

    #[tool(
        description = "Get or generate the background video for one visual prompt. Cached prompts return immediately; new prompts can take several minutes."
    )]
    async fn generate_scene_video(
        &self,
        Parameters(request): Parameters<GenerateSceneVideoRequest>,
    ) -> Result<CallToolResult, McpError> {
        crate::tools::generate_scene_video(&self.state, Parameters(request)).await
    }
}

#[tool_handler]
impl ServerHandler for InsightServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
