//! Object-storage cache backend.
//!
//! Each key maps to a fixed object address `<base>/<prefix>/<key>.json`
//! and writes overwrite in place (no random suffix), so the same key
//! always resolves to the same object. Clear-all lists the store by
//! prefix and deletes whatever is found.
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::CacheStore;

pub struct BlobStore {
    http: Client,
    base_url: String,
    token: String,
    prefix: String,
}

#[derive(Debug, Deserialize)]
struct ListResp {
    #[serde(default)]
    blobs: Vec<ListedBlob>,
}

#[derive(Debug, Deserialize)]
struct ListedBlob {
    url: String,
}

impl BlobStore {
    pub fn new(base_url: String, token: String, prefix: String) -> Self {
        let http = Client::builder()
            .user_agent("folio/0.1")
            .no_proxy()
            .build()
            .expect("reqwest client");
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            prefix,
        }
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/{}/{key}.json", self.base_url, self.prefix)
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    async fn list_by_prefix(&self) -> Vec<String> {
        let res = self
            .http
            .get(&self.base_url)
            .query(&[("prefix", format!("{}/", self.prefix))])
            .header("Authorization", self.bearer())
            .send()
            .await;
        match res {
            Ok(res) if res.status().is_success() => res
                .json::<ListResp>()
                .await
                .map(|l| l.blobs.into_iter().map(|b| b.url).collect())
                .unwrap_or_default(),
            Ok(res) => {
                debug!(status = %res.status(), "blob list failed");
                Vec::new()
            }
            Err(err) => {
                debug!(?err, "blob list unreachable");
                Vec::new()
            }
        }
    }

    async fn delete_object(&self, url: &str) {
        let res = self
            .http
            .delete(url)
            .header("Authorization", self.bearer())
            .send()
            .await;
        if let Err(err) = res {
            debug!(?err, url, "blob delete failed");
        }
    }
}

#[async_trait]
impl CacheStore for BlobStore {
    async fn get(&self, key: &str) -> Option<Value> {
        let res = self
            .http
            .get(self.object_url(key))
            .header("Authorization", self.bearer())
            .send()
            .await
            .ok()?;
        if !res.status().is_success() {
            return None;
        }
        res.json().await.ok()
    }

    async fn set(&self, key: &str, value: &Value) {
        let pretty = match serde_json::to_string_pretty(value) {
            Ok(s) => s,
            Err(err) => {
                debug!(key, ?err, "unserializable cache value; dropping write");
                return;
            }
        };
        let res = self
            .http
            .put(self.object_url(key))
            .header("Authorization", self.bearer())
            .header("Content-Type", "application/json")
            // Same key, same address: never append a random suffix.
            .header("x-add-random-suffix", "0")
            .body(pretty)
            .send()
            .await;
        match res {
            Ok(res) if !res.status().is_success() => {
                warn!(key, status = %res.status(), "blob cache write rejected");
            }
            Err(err) => warn!(key, ?err, "blob cache write failed"),
            _ => {}
        }
    }

    async fn clear(&self, key: Option<&str>) {
        match key {
            Some(key) => self.delete_object(&self.object_url(key)).await,
            None => {
                for url in self.list_by_prefix().await {
                    self.delete_object(&url).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_addresses_are_deterministic() {
        let store = BlobStore::new(
            "https://blob.example/store/".into(),
            "tok".into(),
            "cache".into(),
        );
        assert_eq!(store.object_url("books"), "https://blob.example/store/cache/books.json");
        // Repeated calls must map to the identical address.
        assert_eq!(store.object_url("books"), store.object_url("books"));
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_miss() {
        let store = BlobStore::new("http://127.0.0.1:1".into(), "tok".into(), "cache".into());
        assert_eq!(store.get("books").await, None);
        // Writes and clears must swallow the failure too.
        store.set("books", &serde_json::json!([])).await;
        store.clear(None).await;
    }
}
