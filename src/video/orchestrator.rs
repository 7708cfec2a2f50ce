use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::cache::{NewCacheRecord, VideoCacheStore, prompt_hash};
use crate::config::VideoOptions;
use crate::error::CacheError;
use crate::models::{Mood, VideoStyle};
use crate::video::VideoGenerator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoStatus {
    Completed,
    Failed,
}

/// Result of one get-or-generate call. Failures are values, not errors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoOutcome {
    pub status: VideoStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub cached: bool,
}

impl VideoOutcome {
    fn completed(video_url: String, cached: bool) -> Self {
        Self {
            status: VideoStatus::Completed,
            video_url: Some(video_url),
            error: None,
            cached,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: VideoStatus::Failed,
            video_url: None,
            error: Some(error.into()),
            cached: false,
        }
    }
}

/// Tags stored alongside a generated video.
#[derive(Debug, Clone, Copy, Default)]
pub struct SceneMetadata {
    pub video_style: Option<VideoStyle>,
    pub mood: Option<Mood>,
}

/// Memoizes video generation by prompt hash.
pub struct VideoCache {
    store: Arc<dyn VideoCacheStore>,
    generator: Arc<dyn VideoGenerator>,
    options: VideoOptions,
}

impl VideoCache {
    pub fn new(
        store: Arc<dyn VideoCacheStore>,
        generator: Arc<dyn VideoGenerator>,
        options: VideoOptions,
    ) -> Self {
        Self {
            store,
            generator,
            options,
        }
    }

    pub async fn get_or_generate(&self, prompt: &str, metadata: SceneMetadata) -> VideoOutcome {
        let hash = prompt_hash(prompt);
        let short = &hash[..12];

        match self.store.lookup(&hash).await {
            Ok(Some(record)) => {
                if let Err(err) = self.store.record_hit(&hash).await {
                    warn!(hash = short, error = %err, "failed to record cache hit");
                }
                info!(hash = short, hits = record.hit_count + 1, "video cache hit");
                return VideoOutcome::completed(record.video_url, true);
            }
            Ok(None) => {
                info!(hash = short, "video cache miss");
            }
            Err(err) => {
                warn!(hash = short, error = %err, "video cache unavailable, generating without it");
            }
        }

        let generated = match self.generator.generate(prompt, &self.options).await {
            Ok(generated) => generated,
            Err(err) => {
                warn!(hash = short, error = %err, "video generation failed");
                return VideoOutcome::failed(err.to_string());
            }
        };

        let record = NewCacheRecord {
            prompt_hash: hash.clone(),
            visual_prompt: prompt.to_string(),
            video_url: generated.video_url.clone(),
            video_style: metadata.video_style,
            mood: metadata.mood,
        };
        match self.store.insert(record).await {
            Ok(_) => info!(hash = short, operation = %generated.operation, "video cached"),
            Err(CacheError::Conflict { .. }) => {
                info!(hash = short, "video was cached concurrently, keeping existing record");
            }
            Err(err) => warn!(hash = short, error = %err, "failed to cache generated video"),
        }

        VideoOutcome::completed(generated.video_url, false)
    }
}
