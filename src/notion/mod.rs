use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::{json, Value};
use std::fmt;
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::notion::model::{ApiErrorBody, BlockChildrenResp, Page, QueryDatabaseResp};

pub mod model;
pub mod props;

const NOTION_API_BASE: &str = "https://api.notion.com/";

/// Hard bound on pagination rounds per query. A healthy database needs
/// far fewer; hitting the bound means the cursor chain is misbehaving.
pub const MAX_QUERY_PAGES: usize = 64;

/// Read-only view of the content service: paginated database queries
/// and block-children lookups. Implemented by `NotionClient`; tests
/// substitute recording fakes.
#[async_trait]
pub trait NotionApi: Send + Sync {
    async fn query_database(
        &self,
        database_id: &str,
        filter: Option<Value>,
        sorts: Option<Value>,
        force_fresh: bool,
    ) -> Result<Vec<Page>, FetchError>;

    async fn page_blocks(&self, page_id: &str) -> Result<Vec<Value>, FetchError>;
}

#[derive(Clone)]
pub struct NotionClient {
    http: Client,
    base_url: Url,
    token: String,
    version: String,
}

impl fmt::Debug for NotionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotionClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl NotionClient {
    pub fn new(token: String, version: String) -> Self {
        let base_url = Url::parse(NOTION_API_BASE).expect("valid default Notion URL");
        Self::with_base_url(token, version, base_url)
    }

    pub fn with_base_url(token: String, version: String, base_url: Url) -> Self {
        let http = Client::builder()
            .user_agent("folio/0.1")
            .no_proxy()
            .build()
            .expect("reqwest client");
        Self {
            http,
            base_url,
            token,
            version,
        }
    }

    fn auth_headers(&self, req: reqwest::RequestBuilder, force_fresh: bool) -> reqwest::RequestBuilder {
        let req = req
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Notion-Version", &self.version);
        if force_fresh {
            // Bypass any transport-level response cache between us and
            // the origin.
            req.header("Cache-Control", "no-cache")
        } else {
            req
        }
    }

    async fn read_error(res: reqwest::Response) -> FetchError {
        let status = res.status().as_u16();
        let message = match res.text().await {
            Ok(body) => serde_json::from_str::<ApiErrorBody>(&body)
                .map(|e| e.message)
                .unwrap_or(body),
            Err(_) => String::new(),
        };
        warn!(status, %message, "notion api error");
        FetchError::from_status(status, message)
    }
}

#[async_trait]
impl NotionApi for NotionClient {
    /// Query a database, following the continuation cursor until the
    /// server reports no more pages. Results keep server order.
    async fn query_database(
        &self,
        database_id: &str,
        filter: Option<Value>,
        sorts: Option<Value>,
        force_fresh: bool,
    ) -> Result<Vec<Page>, FetchError> {
        let endpoint = self
            .base_url
            .join(&format!("v1/databases/{}/query", database_id.trim()))
            .map_err(|_| FetchError::NotFound)?;

        let mut pages = Vec::new();
        let mut cursor: Option<String> = None;

        for round in 0.. {
            if round >= MAX_QUERY_PAGES {
                return Err(FetchError::PaginationLimit(MAX_QUERY_PAGES));
            }

            let mut body = json!({});
            if let Some(filter) = &filter {
                body["filter"] = filter.clone();
            }
            if let Some(sorts) = &sorts {
                body["sorts"] = sorts.clone();
            }
            if let Some(cursor) = &cursor {
                body["start_cursor"] = json!(cursor);
            }

            let res = self
                .auth_headers(self.http.post(endpoint.clone()), force_fresh)
                .header("Content-Type", "application/json")
                .json(&body)
                .send()
                .await?;

            if res.status() == StatusCode::TOO_MANY_REQUESTS {
                warn!(database_id, "rate limited by notion");
            }
            if !res.status().is_success() {
                return Err(Self::read_error(res).await);
            }

            let payload: QueryDatabaseResp = res.json().await?;
            debug!(
                database_id,
                round,
                results = payload.results.len(),
                has_more = payload.has_more,
                "query page fetched"
            );
            pages.extend(payload.results);

            match (payload.has_more, payload.next_cursor) {
                (true, Some(next)) => cursor = Some(next),
                _ => break,
            }
        }

        Ok(pages)
    }

    /// Fetch the ordered block children of a page, paginated the same
    /// way as database queries.
    async fn page_blocks(&self, page_id: &str) -> Result<Vec<Value>, FetchError> {
        let mut blocks = Vec::new();
        let mut cursor: Option<String> = None;

        for round in 0.. {
            if round >= MAX_QUERY_PAGES {
                return Err(FetchError::PaginationLimit(MAX_QUERY_PAGES));
            }

            let mut url = self
                .base_url
                .join(&format!("v1/blocks/{}/children", page_id))
                .map_err(|_| FetchError::NotFound)?;
            if let Some(cursor) = &cursor {
                url.query_pairs_mut().append_pair("start_cursor", cursor);
            }

            let res = self
                .auth_headers(self.http.get(url), false)
                .send()
                .await?;
            if !res.status().is_success() {
                return Err(Self::read_error(res).await);
            }

            let payload: BlockChildrenResp = res.json().await?;
            blocks.extend(payload.results);

            match (payload.has_more, payload.next_cursor) {
                (true, Some(next)) => cursor = Some(next),
                _ => break,
            }
        }

        Ok(blocks)
    }
}
