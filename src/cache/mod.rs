//! Cache store: a dumb key/value layer in front of the content service.
//!
//! Two interchangeable backends (local filesystem, remote object
//! storage), selected once at startup from configuration. The cache is
//! best-effort and never load-bearing: every failure is swallowed and
//! surfaces to callers as a miss or a dropped write.
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::config;

pub mod blob;
pub mod fs;

pub use blob::BlobStore;
pub use fs::FsStore;

#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Fetch the entry under `key`; `None` on miss or any backend failure.
    async fn get(&self, key: &str) -> Option<Value>;

    /// Replace the entry under `key` wholesale. Failures are dropped.
    async fn set(&self, key: &str, value: &Value);

    /// Remove one entry, or every entry when `key` is `None`.
    async fn clear(&self, key: Option<&str>);
}

/// Build the cache backend the configuration selects: the blob block
/// switches to remote object storage, otherwise the local filesystem.
pub fn from_config(cfg: &config::Cache) -> Arc<dyn CacheStore> {
    match &cfg.blob {
        Some(blob) => Arc::new(BlobStore::new(
            blob.base_url.clone(),
            blob.token.clone(),
            blob.prefix.clone(),
        )),
        None => Arc::new(FsStore::new(cfg.dir.clone())),
    }
}
