use rmcp::{
    ErrorData as McpError,
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars::JsonSchema,
};
use serde::Deserialize;

use crate::{
    models::{Mood, VideoStyle},
    state::AppState,
    tools::json_result,
    video::{SceneMetadata, VideoStatus},
};

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GenerateSceneVideoRequest {
    #[schemars(description = "Text-to-video prompt for one scene")]
    pub visual_prompt: String,
    #[schemars(description = "cinematic, glitch, abstract or documentary")]
    pub video_style: Option<VideoStyle>,
    #[schemars(description = "dark, bright, urgent or calm")]
    pub mood: Option<Mood>,
}

pub async fn generate_scene_video(
    state: &AppState,
    Parameters(request): Parameters<GenerateSceneVideoRequest>,
) -> Result<CallToolResult, McpError> {
    let prompt = request.visual_prompt.trim();
    if prompt.is_empty() {
        return Err(McpError::invalid_params("visual_prompt must not be empty", None));
    }
    let metadata = SceneMetadata {
        video_style: request.video_style,
        mood: request.mood,
    };
    let outcome = state.videos.get_or_generate(prompt, metadata).await;
    if outcome.status == VideoStatus::Failed {
        return Err(McpError::internal_error(
            "generate video failed",
            outcome.error.map(serde_json::Value::String),
        ));
    }
    json_result(&outcome)
}
