use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Mood, VideoStyle};

/// One generated video, keyed by the hash of its visual prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord {
    pub prompt_hash: String,
    pub visual_prompt: String,
    pub video_url: String,
    pub video_style: Option<VideoStyle>,
    pub mood: Option<Mood>,
    pub hit_count: u64,
    pub last_accessed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCacheRecord {
    pub prompt_hash: String,
    pub visual_prompt: String,
    pub video_url: String,
    pub video_style: Option<VideoStyle>,
    pub mood: Option<Mood>,
}

impl NewCacheRecord {
    pub fn into_record(self, now: DateTime<Utc>) -> CacheRecord {
        CacheRecord {
            prompt_hash: self.prompt_hash,
            visual_prompt: self.visual_prompt,
            video_url: self.video_url,
            video_style: self.video_style,
            mood: self.mood,
            hit_count: 0,
            last_accessed_at: now,
            created_at: now,
        }
    }
}
