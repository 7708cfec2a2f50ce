pub mod generate_insight;
pub mod generate_scene_video;

use rmcp::{ErrorData as McpError, model::{CallToolResult, Content}};
use serde::Serialize;

pub use generate_insight::generate_insight;
pub use generate_scene_video::{GenerateSceneVideoRequest, generate_scene_video};

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string(value).map_err(|err| {
        McpError::internal_error(
            "serialize tool response failed",
            Some(serde_json::Value::String(err.to_string())),
        )
    })?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}
