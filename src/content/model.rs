//! Normalized domain records, as served over the JSON API.
//!
//! All of these are immutable value records: built fresh on every
//! fetch, replaced wholesale on a forced refetch, never patched.
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub title: String,
    pub bio: String,
    pub email: String,
    pub location: String,
    pub skills: Vec<String>,
    pub social_links: SocialLinks,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Published,
    #[default]
    Draft,
}

impl PostStatus {
    /// Select values map case-insensitively; anything unrecognized is a
    /// draft and stays unpublished.
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("published") {
            PostStatus::Published
        } else {
            PostStatus::Draft
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    /// Unique lookup and routing key.
    pub slug: String,
    pub status: PostStatus,
    pub published_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    /// Ordered block sequence. `None` in list views; populated only by
    /// the fetch-by-slug path.
    #[serde(default)]
    pub content: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovieKind {
    #[default]
    Movie,
    Series,
}

impl MovieKind {
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("series") {
            MovieKind::Series
        } else {
            MovieKind::Movie
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatchStatus {
    #[default]
    Watched,
    Watchlist,
}

impl WatchStatus {
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("watchlist") {
            WatchStatus::Watchlist
        } else {
            WatchStatus::Watched
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: MovieKind,
    #[serde(default)]
    pub status: WatchStatus,
    /// 0–5; 0 means unrated.
    pub rating: f64,
    pub watched_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadStatus {
    #[default]
    Read,
    Reading,
    Readlist,
}

impl ReadStatus {
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("reading") {
            ReadStatus::Reading
        } else if raw.eq_ignore_ascii_case("readlist") {
            ReadStatus::Readlist
        } else {
            ReadStatus::Read
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub status: ReadStatus,
    /// 0–5; 0 means unrated.
    pub rating: f64,
    pub read_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    pub site_name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_tags: Option<String>,
}
