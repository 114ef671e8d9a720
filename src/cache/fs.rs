//! Filesystem cache backend: one pretty-printed JSON file per key.
use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use super::CacheStore;

pub struct FsStore {
    dir: PathBuf,
}

impl FsStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    async fn ensure_dir(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir).await
    }
}

#[async_trait]
impl CacheStore for FsStore {
    async fn get(&self, key: &str) -> Option<Value> {
        let data = fs::read_to_string(self.entry_path(key)).await.ok()?;
        match serde_json::from_str(&data) {
            Ok(value) => Some(value),
            Err(err) => {
                debug!(key, ?err, "malformed cache entry treated as miss");
                None
            }
        }
    }

    async fn set(&self, key: &str, value: &Value) {
        if self.ensure_dir().await.is_err() {
            debug!(key, "cache dir unavailable; dropping write");
            return;
        }
        let pretty = match serde_json::to_string_pretty(value) {
            Ok(s) => s,
            Err(err) => {
                debug!(key, ?err, "unserializable cache value; dropping write");
                return;
            }
        };
        if let Err(err) = fs::write(self.entry_path(key), pretty).await {
            debug!(key, ?err, "cache write failed");
        }
    }

    async fn clear(&self, key: Option<&str>) {
        match key {
            Some(key) => {
                let _ = fs::remove_file(self.entry_path(key)).await;
            }
            None => {
                let mut entries = match fs::read_dir(&self.dir).await {
                    Ok(entries) => entries,
                    Err(_) => return,
                };
                while let Ok(Some(entry)) = entries.next_entry().await {
                    if entry.path().extension().and_then(|e| e.to_str()) == Some("json") {
                        let _ = fs::remove_file(entry.path()).await;
                    }
                }
            }
        }
    }
}

impl FsStore {
    /// Directory holding the cache files. Exposed for diagnostics.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
