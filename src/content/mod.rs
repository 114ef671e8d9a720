//! Domain repositories: read-through-cached, normalized views over the
//! remote databases.
//!
//! This module holds the shared plumbing; each entity contributes its
//! own impl block from a submodule. The uniform algorithm: cache hit
//! unless forced, empty result when the entity's database id is not
//! configured, query sorted newest-first, normalize via the property
//! extractor, best-effort cache write, and degrade every fetch error to
//! an empty result at the public boundary.
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::cache::CacheStore;
use crate::config::Databases;
use crate::notion::NotionApi;

pub mod blog;
pub mod books;
pub mod model;
pub mod movies;
pub mod profile;
pub mod settings;

/// Fixed cache keys, one per entity collection.
pub mod keys {
    pub const PROFILE: &str = "profile";
    pub const BLOG_POSTS: &str = "blog-posts";
    pub const MOVIES: &str = "movies";
    pub const BOOKS: &str = "books";
    pub const SETTINGS: &str = "settings";
}

pub struct ContentRepo {
    notion: Arc<dyn NotionApi>,
    cache: Arc<dyn CacheStore>,
    databases: Databases,
}

/// Per-entity counts reported by a full sync.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub profile: bool,
    pub blog_posts: usize,
    pub movies: usize,
    pub books: usize,
    pub settings: bool,
}

impl ContentRepo {
    pub fn new(
        notion: Arc<dyn NotionApi>,
        cache: Arc<dyn CacheStore>,
        databases: Databases,
    ) -> Self {
        Self {
            notion,
            cache,
            databases,
        }
    }

    pub(crate) fn notion(&self) -> &dyn NotionApi {
        self.notion.as_ref()
    }

    pub(crate) fn databases(&self) -> &Databases {
        &self.databases
    }

    /// Cache read typed to the entity shape. A deserialization failure
    /// (stale shape after a model change) is a miss.
    pub(crate) async fn cached<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.cache.get(key).await?;
        match serde_json::from_value(raw) {
            Ok(value) => {
                debug!(key, "cache hit");
                Some(value)
            }
            Err(err) => {
                debug!(key, ?err, "cache entry has stale shape; treating as miss");
                None
            }
        }
    }

    /// Best-effort cache write.
    pub(crate) async fn store<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_value(value) {
            Ok(raw) => self.cache.set(key, &raw).await,
            Err(err) => warn!(key, ?err, "failed to serialize cache entry"),
        }
    }

    /// Clear the cache and force-refetch every entity. The five fetches
    /// share no state and run concurrently.
    pub async fn sync_all(&self) -> SyncReport {
        self.cache.clear(None).await;

        let (profile, posts, movies, books, settings) = futures::join!(
            self.profile(true),
            self.blog_posts(true),
            self.movies(true),
            self.books(true),
            self.settings(true),
        );

        SyncReport {
            profile: profile.is_some(),
            blog_posts: posts.len(),
            movies: movies.len(),
            books: books.len(),
            settings: settings.is_some(),
        }
    }
}

/// Notion sort clause: newest first on the given date property.
pub(crate) fn sort_descending(property: &str) -> Value {
    json!([{ "property": property, "direction": "descending" }])
}

/// Notion filter clause: select property equals the given value.
pub(crate) fn select_equals(property: &str, value: &str) -> Value {
    json!({ "property": property, "select": { "equals": value } })
}

/// Notion filter clause: rich-text property equals the given value.
pub(crate) fn rich_text_equals(property: &str, value: &str) -> Value {
    json!({ "property": property, "rich_text": { "equals": value } })
}

/// Option wrapper used by normalizers: empty strings become `None`.
pub(crate) fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Year properties arrive as floats; anything non-positive is unset.
pub(crate) fn year_of(n: f64) -> Option<i32> {
    if n > 0.0 {
        Some(n as i32)
    } else {
        None
    }
}
