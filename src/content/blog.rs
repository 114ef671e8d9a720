//! Blog repository: published-post listing plus slug lookup with
//! content blocks.
use tracing::warn;

use crate::content::model::{BlogPost, PostStatus};
use crate::content::{keys, non_empty, rich_text_equals, select_equals, sort_descending, ContentRepo};
use crate::error::FetchError;
use crate::notion::model::Page;
use crate::notion::props::{self, PropertyKind};

impl ContentRepo {
    /// Published posts, newest first. Never carries content blocks.
    pub async fn blog_posts(&self, force: bool) -> Vec<BlogPost> {
        match self.fetch_blog_posts(force).await {
            Ok(posts) => posts,
            Err(err) => {
                warn!(?err, "blog fetch degraded to empty");
                Vec::new()
            }
        }
    }

    async fn fetch_blog_posts(&self, force: bool) -> Result<Vec<BlogPost>, FetchError> {
        if !force {
            if let Some(cached) = self.cached::<Vec<BlogPost>>(keys::BLOG_POSTS).await {
                return Ok(cached);
            }
        }

        let Some(db) = self.databases().blog.clone() else {
            return Ok(Vec::new());
        };

        let pages = self
            .notion()
            .query_database(
                &db,
                Some(select_equals("Status", "published")),
                Some(sort_descending("Published Date")),
                force,
            )
            .await?;

        let posts: Vec<BlogPost> = pages.iter().map(post_from_page).collect();
        self.store(keys::BLOG_POSTS, &posts).await;
        Ok(posts)
    }

    /// Look one post up by its slug and attach its content blocks.
    ///
    /// Always a fresh, uncached read: the slug route is where stale
    /// content would be most visible. Unpublished posts stay hidden.
    pub async fn blog_post_by_slug(&self, slug: &str) -> Option<BlogPost> {
        match self.fetch_blog_post_by_slug(slug).await {
            Ok(post) => post,
            Err(err) => {
                warn!(?err, slug, "blog slug lookup degraded to none");
                None
            }
        }
    }

    async fn fetch_blog_post_by_slug(&self, slug: &str) -> Result<Option<BlogPost>, FetchError> {
        let Some(db) = self.databases().blog.clone() else {
            return Ok(None);
        };

        let pages = self
            .notion()
            .query_database(&db, Some(rich_text_equals("Slug", slug)), None, true)
            .await?;

        let Some(page) = pages.iter().find(|p| is_published(p)) else {
            return Ok(None);
        };

        let mut post = post_from_page(page);
        post.content = Some(self.notion().page_blocks(&page.id).await?);
        Ok(Some(post))
    }
}

fn is_published(page: &Page) -> bool {
    props::text(page, "Status", PropertyKind::Select).eq_ignore_ascii_case("published")
}

fn post_from_page(page: &Page) -> BlogPost {
    BlogPost {
        id: page.id.clone(),
        title: props::text(page, "Title", PropertyKind::Title),
        slug: props::text(page, "Slug", PropertyKind::RichText),
        status: PostStatus::parse(&props::text(page, "Status", PropertyKind::Select)),
        published_date: props::text(page, "Published Date", PropertyKind::Date),
        excerpt: non_empty(props::text(page, "Excerpt", PropertyKind::RichText)),
        cover_image: non_empty(props::text(page, "Cover Image", PropertyKind::Url)),
        content: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page(slug: &str, status: &str) -> Page {
        serde_json::from_value(json!({
            "id": format!("post-{slug}"),
            "properties": {
                "Title": { "type": "title", "title": [{ "plain_text": slug.to_uppercase() }] },
                "Slug": { "type": "rich_text", "rich_text": [{ "plain_text": slug }] },
                "Status": { "type": "select", "select": { "name": status } },
                "Published Date": { "type": "date", "date": { "start": "2024-06-01" } }
            }
        }))
        .unwrap()
    }

    #[test]
    fn list_normalization_never_carries_content() {
        let post = post_from_page(&page("a", "published"));
        assert_eq!(post.slug, "a");
        assert_eq!(post.status, PostStatus::Published);
        assert!(post.content.is_none());
    }

    #[test]
    fn published_check_is_case_insensitive() {
        assert!(is_published(&page("a", "Published")));
        assert!(is_published(&page("a", "PUBLISHED")));
        assert!(!is_published(&page("a", "draft")));
    }

    #[test]
    fn unknown_status_normalizes_to_draft() {
        let post = post_from_page(&page("a", "archived"));
        assert_eq!(post.status, PostStatus::Draft);
    }
}
