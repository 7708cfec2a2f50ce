use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use tokio::fs;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Outcome of an exclusive write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutNew {
    Created,
    AlreadyExists,
}

#[derive(Clone, Debug)]
pub struct LocalFileStorage {
    base_dir: PathBuf,
}

impl LocalFileStorage {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub async fn get(&self, key: &str) -> std::io::Result<Option<Vec<u8>>> {
        let path = self.resolve_path(key);
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Replaces the value at `key`. Readers see either the old or the new bytes.
    pub async fn put(&self, key: &str, data: &[u8]) -> std::io::Result<()> {
        let path = self.resolve_path(key);
        let temp = self.write_temp(&path, data).await?;
        if let Err(err) = fs::rename(&temp, &path).await {
            let _ = fs::remove_file(&temp).await;
            return Err(err);
        }
        Ok(())
    }

    /// Writes `key` only if nothing is stored there yet.
    pub async fn put_new(&self, key: &str, data: &[u8]) -> std::io::Result<PutNew> {
        let path = self.resolve_path(key);
        let temp = self.write_temp(&path, data).await?;
        let linked = fs::hard_link(&temp, &path).await;
        let _ = fs::remove_file(&temp).await;
        match linked {
            Ok(()) => Ok(PutNew::Created),
            Err(err) if err.kind() == ErrorKind::AlreadyExists => Ok(PutNew::AlreadyExists),
            Err(err) => Err(err),
        }
    }

    pub fn get_video_prefix(hash: &str) -> String {
        format!("videos/{hash}")
    }

    pub fn get_meta_key(prefix: &str) -> String {
        format!("{prefix}/meta.json")
    }

    pub fn resolve_path(&self, key: &str) -> PathBuf {
        let normalized = key.trim_start_matches('/');
        self.base_dir.join(Path::new(normalized))
    }

    async fn write_temp(&self, path: &Path, data: &[u8]) -> std::io::Result<PathBuf> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("entry");
        let suffix = format!(
            "{}.{}.{}",
            std::process::id(),
            Utc::now().timestamp_nanos_opt().unwrap_or_default(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        );
        let temp = path.with_file_name(format!(".{file_name}.{suffix}.tmp"));
        fs::write(&temp, data).await?;
        Ok(temp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_new_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path().to_path_buf());
        let key = LocalFileStorage::get_meta_key(&LocalFileStorage::get_video_prefix("abc"));

        assert_eq!(storage.put_new(&key, b"first").await.unwrap(), PutNew::Created);
        assert_eq!(storage.put_new(&key, b"second").await.unwrap(), PutNew::AlreadyExists);
        assert_eq!(storage.get(&key).await.unwrap(), Some(b"first".to_vec()));
    }

    #[tokio::test]
    async fn put_replaces_and_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path().to_path_buf());

        storage.put("videos/x/meta.json", b"one").await.unwrap();
        storage.put("videos/x/meta.json", b"two").await.unwrap();
        assert_eq!(storage.get("videos/x/meta.json").await.unwrap(), Some(b"two".to_vec()));

        let entries: Vec<_> = std::fs::read_dir(dir.path().join("videos/x"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("meta.json")]);
    }

    #[tokio::test]
    async fn missing_key_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path().to_path_buf());
        assert_eq!(storage.get("videos/none/meta.json").await.unwrap(), None);
    }
}
