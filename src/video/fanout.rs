use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::models::StoryboardScene;
use crate::video::{SceneMetadata, VideoCache, VideoOutcome, VideoStatus};

/// Resolves every scene of a storyboard concurrently and waits for all of them.
#[derive(Clone)]
pub struct StoryboardFanout {
    videos: Arc<VideoCache>,
}

impl StoryboardFanout {
    pub fn new(videos: Arc<VideoCache>) -> Self {
        Self { videos }
    }

    pub async fn resolve_all(&self, scenes: &[StoryboardScene]) -> BTreeMap<u32, VideoOutcome> {
        let mut join_set = JoinSet::new();

        for scene in scenes {
            let videos = self.videos.clone();
            let scene_id = scene.id;
            let prompt = scene.visual_prompt.clone();
            let metadata = SceneMetadata {
                video_style: Some(scene.video_style),
                mood: Some(scene.mood),
            };
            join_set.spawn(async move {
                let outcome = videos.get_or_generate(&prompt, metadata).await;
                (scene_id, outcome)
            });
        }

        let mut results = BTreeMap::new();
        while let Some(task_result) = join_set.join_next().await {
            match task_result {
                Ok((scene_id, outcome)) => {
                    results.insert(scene_id, outcome);
                }
                Err(err) => warn!(error = %err, "scene video task aborted"),
            }
        }

        // A panicked task has no id to report; mark whatever is still missing.
        for scene in scenes {
            results
                .entry(scene.id)
                .or_insert_with(|| VideoOutcome::failed("scene video task aborted"));
        }

        let completed = results
            .values()
            .filter(|outcome| outcome.status == VideoStatus::Completed)
            .count();
        info!(scenes = results.len(), completed, "storyboard videos resolved");
        results
    }
}
