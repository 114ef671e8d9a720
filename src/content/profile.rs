//! Profile repository: the first row of the profile database.
use tracing::warn;

use crate::content::model::{Profile, SocialLinks};
use crate::content::{keys, non_empty, ContentRepo};
use crate::error::FetchError;
use crate::notion::model::Page;
use crate::notion::props::{self, PropertyKind};

impl ContentRepo {
    /// Cached profile, or `None` when unconfigured, absent, or the
    /// fetch failed.
    pub async fn profile(&self, force: bool) -> Option<Profile> {
        match self.fetch_profile(force).await {
            Ok(profile) => profile,
            Err(err) => {
                warn!(?err, "profile fetch degraded to none");
                None
            }
        }
    }

    async fn fetch_profile(&self, force: bool) -> Result<Option<Profile>, FetchError> {
        if !force {
            if let Some(cached) = self.cached::<Profile>(keys::PROFILE).await {
                return Ok(Some(cached));
            }
        }

        let Some(db) = self.databases().profile.clone() else {
            return Ok(None);
        };

        let pages = self.notion().query_database(&db, None, None, force).await?;
        let Some(page) = pages.first() else {
            return Ok(None);
        };

        let profile = profile_from_page(page);
        self.store(keys::PROFILE, &profile).await;
        Ok(Some(profile))
    }
}

fn profile_from_page(page: &Page) -> Profile {
    Profile {
        name: props::text(page, "Name", PropertyKind::Title),
        title: props::text(page, "Title", PropertyKind::RichText),
        bio: props::text(page, "Bio", PropertyKind::RichText),
        email: props::text(page, "Email", PropertyKind::Email),
        location: props::text(page, "Location", PropertyKind::RichText),
        skills: props::tags(page, "Skills"),
        social_links: SocialLinks {
            github: non_empty(props::text(page, "GitHub", PropertyKind::Url)),
            linkedin: non_empty(props::text(page, "LinkedIn", PropertyKind::Url)),
            twitter: non_empty(props::text(page, "Twitter", PropertyKind::Url)),
            website: non_empty(props::text(page, "Website", PropertyKind::Url)),
        },
        avatar: non_empty(props::text(page, "Avatar", PropertyKind::Url)),
    }
}
