use async_trait::async_trait;
use chrono::Utc;

use crate::cache::{CacheRecord, LocalFileStorage, NewCacheRecord, PutNew};
use crate::error::CacheError;

/// Persistent prompt-hash -> video record table.
#[async_trait]
pub trait VideoCacheStore: Send + Sync {
    async fn lookup(&self, prompt_hash: &str) -> Result<Option<CacheRecord>, CacheError>;

    /// Fails with [`CacheError::Conflict`] if a readable record is already stored
    /// for the hash; a readable record is never overwritten. An unreadable one is
    /// replaced.
    async fn insert(&self, record: NewCacheRecord) -> Result<CacheRecord, CacheError>;

    /// Bumps `hit_count` and refreshes `last_accessed_at`.
    async fn record_hit(&self, prompt_hash: &str) -> Result<(), CacheError>;
}

/// File-backed store: one JSON document per hash under `videos/{hash}/meta.json`.
#[derive(Clone, Debug)]
pub struct FileVideoCache {
    storage: LocalFileStorage,
}

impl FileVideoCache {
    pub fn new(storage: LocalFileStorage) -> Self {
        Self { storage }
    }

    fn meta_key(prompt_hash: &str) -> String {
        LocalFileStorage::get_meta_key(&LocalFileStorage::get_video_prefix(prompt_hash))
    }

    async fn read(&self, key: &str) -> Result<Option<CacheRecord>, CacheError> {
        let Some(bytes) = self.storage.get(key).await? else {
            return Ok(None);
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| CacheError::Corrupt {
                key: key.to_string(),
                source,
            })
    }

    fn encode(key: &str, record: &CacheRecord) -> Result<Vec<u8>, CacheError> {
        serde_json::to_vec_pretty(record).map_err(|source| CacheError::Corrupt {
            key: key.to_string(),
            source,
        })
    }
}

#[async_trait]
impl VideoCacheStore for FileVideoCache {
    async fn lookup(&self, prompt_hash: &str) -> Result<Option<CacheRecord>, CacheError> {
        self.read(&Self::meta_key(prompt_hash)).await
    }

    async fn insert(&self, record: NewCacheRecord) -> Result<CacheRecord, CacheError> {
        let key = Self::meta_key(&record.prompt_hash);
        let record = record.into_record(Utc::now());
        let payload = Self::encode(&key, &record)?;
        match self.storage.put_new(&key, &payload).await? {
            PutNew::Created => Ok(record),
            PutNew::AlreadyExists => match self.read(&key).await {
                Err(CacheError::Corrupt { .. }) => {
                    self.storage.put(&key, &payload).await?;
                    Ok(record)
                }
                _ => Err(CacheError::Conflict {
                    prompt_hash: record.prompt_hash,
                }),
            },
        }
    }

    async fn record_hit(&self, prompt_hash: &str) -> Result<(), CacheError> {
        let key = Self::meta_key(prompt_hash);
        let Some(mut record) = self.read(&key).await? else {
            return Ok(());
        };
        record.hit_count += 1;
        record.last_accessed_at = Utc::now();
        let payload = Self::encode(&key, &record)?;
        self.storage.put(&key, &payload).await?;
        Ok(())
    }
}
