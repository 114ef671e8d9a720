//! Site settings repository: singleton, same fetch pattern as the
//! profile.
use tracing::warn;

use crate::content::model::Settings;
use crate::content::{keys, non_empty, ContentRepo};
use crate::error::FetchError;
use crate::notion::model::Page;
use crate::notion::props::{self, PropertyKind};

/// Title served when settings are missing or broken.
pub const DEFAULT_SITE_TITLE: &str = "Portfolio";

impl ContentRepo {
    pub async fn settings(&self, force: bool) -> Option<Settings> {
        match self.fetch_settings(force).await {
            Ok(settings) => settings,
            Err(err) => {
                warn!(?err, "settings fetch degraded to none");
                None
            }
        }
    }

    /// Site title with the documented fallback. Never fails.
    pub async fn site_title(&self) -> String {
        match self.settings(false).await {
            Some(settings) if !settings.title.is_empty() => settings.title,
            _ => DEFAULT_SITE_TITLE.to_string(),
        }
    }

    async fn fetch_settings(&self, force: bool) -> Result<Option<Settings>, FetchError> {
        if !force {
            if let Some(cached) = self.cached::<Settings>(keys::SETTINGS).await {
                return Ok(Some(cached));
            }
        }

        let Some(db) = self.databases().settings.clone() else {
            return Ok(None);
        };

        let pages = self.notion().query_database(&db, None, None, force).await?;
        let Some(page) = pages.first() else {
            return Ok(None);
        };

        let settings = settings_from_page(page);
        self.store(keys::SETTINGS, &settings).await;
        Ok(Some(settings))
    }
}

fn settings_from_page(page: &Page) -> Settings {
    Settings {
        title: props::text(page, "Title", PropertyKind::Title),
        favicon: non_empty(props::text(page, "Favicon", PropertyKind::Url)),
        site_name: props::text(page, "Site Name", PropertyKind::RichText),
        description: props::text(page, "Description", PropertyKind::RichText),
        meta_tags: non_empty(props::text(page, "Meta Tags", PropertyKind::RichText)),
    }
}
