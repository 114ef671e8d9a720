//! Static-page regeneration trigger.
//!
//! After a sync the rendered pages are stale; this posts each page path
//! to a deployment-provided hook so the host rebuilds them. Best-effort
//! only: a sync is still a success when the hook is down or unset.
use reqwest::Client;
use serde_json::json;
use tracing::{debug, warn};

/// Every page whose content comes from the synced databases.
pub const PAGES_TO_REVALIDATE: [&str; 6] =
    ["/", "/movies", "/books", "/blog", "/portfolio", "/contact"];

pub struct Revalidator {
    http: Client,
    hook_url: Option<String>,
}

impl Revalidator {
    pub fn new(hook_url: Option<String>) -> Self {
        let http = Client::builder()
            .user_agent("folio/0.1")
            .build()
            .expect("reqwest client");
        Self {
            http,
            hook_url: hook_url.filter(|url| !url.trim().is_empty()),
        }
    }

    /// Trigger regeneration for every content page.
    pub async fn revalidate_all(&self) {
        let Some(hook_url) = &self.hook_url else {
            debug!("no revalidation hook configured; skipping");
            return;
        };

        for path in PAGES_TO_REVALIDATE {
            let res = self
                .http
                .post(hook_url)
                .json(&json!({ "path": path }))
                .send()
                .await;
            match res {
                Ok(res) if !res.status().is_success() => {
                    warn!(path, status = %res.status(), "revalidation hook rejected path");
                }
                Err(err) => warn!(path, ?err, "revalidation hook unreachable"),
                _ => debug!(path, "revalidated"),
            }
        }
    }
}
