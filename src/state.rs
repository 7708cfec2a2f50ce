use std::sync::Arc;

use crate::cache::{FileVideoCache, LocalFileStorage};
use crate::config::AppConfig;
use crate::insight::{ChatCompletionClient, InsightService};
use crate::video::{StoryboardFanout, VideoCache, VideoGenerationClient};

/// Services shared by the HTTP routes and the MCP tools.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub insights: Arc<InsightService>,
    pub videos: Arc<VideoCache>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let store = Arc::new(FileVideoCache::new(LocalFileStorage::new(
            config.cache_dir.clone(),
        )));
        let generator = Arc::new(VideoGenerationClient::new(
            config.credentials.clone(),
            config.video_model.clone(),
            config.poll_budget,
        ));
        let videos = Arc::new(VideoCache::new(
            store,
            generator,
            config.video_options.clone(),
        ));
        let model = Arc::new(ChatCompletionClient::new(
            config.credentials.clone(),
            config.insight_model.clone(),
        ));
        let insights = Arc::new(InsightService::new(
            model,
            StoryboardFanout::new(videos.clone()),
        ));
        Self::from_parts(config, insights, videos)
    }

    pub fn from_parts(
        config: AppConfig,
        insights: Arc<InsightService>,
        videos: Arc<VideoCache>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            insights,
            videos,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use super::*;
    use crate::config::{ApiCredentials, PollBudget, VideoOptions};

    pub(crate) fn config(dir: &tempfile::TempDir, request_timeout: Duration) -> AppConfig {
        AppConfig {
            port: 0,
            secret_key: None,
            credentials: ApiCredentials::new("http://127.0.0.1:9", None),
            insight_model: "gemini-test".to_string(),
            video_model: "veo-test".to_string(),
            video_options: VideoOptions::default(),
            poll_budget: PollBudget::default(),
            request_timeout,
            cache_dir: PathBuf::from(dir.path()),
        }
    }

    /// Wires `videos` behind a keyless chat client, so every model call falls back.
    pub(crate) fn assemble(config: AppConfig, videos: VideoCache) -> AppState {
        let videos = Arc::new(videos);
        let model = Arc::new(ChatCompletionClient::new(
            config.credentials.clone(),
            "gemini-test",
        ));
        let insights = Arc::new(InsightService::new(
            model,
            StoryboardFanout::new(videos.clone()),
        ));
        AppState::from_parts(config, insights, videos)
    }
}
