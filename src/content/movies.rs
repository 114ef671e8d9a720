//! Movie/show log repository.
use tracing::warn;

use crate::content::model::{Movie, MovieKind, WatchStatus};
use crate::content::{keys, non_empty, sort_descending, year_of, ContentRepo};
use crate::error::FetchError;
use crate::notion::model::Page;
use crate::notion::props::{self, PropertyKind};

impl ContentRepo {
    /// Full movie log, newest watch first.
    pub async fn movies(&self, force: bool) -> Vec<Movie> {
        match self.fetch_movies(force).await {
            Ok(movies) => movies,
            Err(err) => {
                warn!(?err, "movies fetch degraded to empty");
                Vec::new()
            }
        }
    }

    async fn fetch_movies(&self, force: bool) -> Result<Vec<Movie>, FetchError> {
        if !force {
            if let Some(cached) = self.cached::<Vec<Movie>>(keys::MOVIES).await {
                return Ok(cached);
            }
        }

        let Some(db) = self.databases().movies.clone() else {
            return Ok(Vec::new());
        };

        let pages = self
            .notion()
            .query_database(&db, None, Some(sort_descending("Watched Date")), force)
            .await?;

        let movies: Vec<Movie> = pages.iter().map(movie_from_page).collect();
        self.store(keys::MOVIES, &movies).await;
        Ok(movies)
    }
}

fn movie_from_page(page: &Page) -> Movie {
    Movie {
        id: page.id.clone(),
        title: props::text(page, "Title", PropertyKind::Title),
        kind: MovieKind::parse(&props::text(page, "Type", PropertyKind::Select)),
        status: WatchStatus::parse(&props::text(page, "Status", PropertyKind::Select)),
        rating: props::number(page, "Rating"),
        watched_date: props::text(page, "Watched Date", PropertyKind::Date),
        poster: props::file_url(page, "Poster")
            .or_else(|| non_empty(props::text(page, "Poster", PropertyKind::Url))),
        year: year_of(props::number(page, "Year")),
        genre: {
            let genre = props::tags(page, "Genre");
            if genre.is_empty() {
                None
            } else {
                Some(genre)
            }
        },
        director: non_empty(props::text(page, "Director", PropertyKind::RichText)),
    }
}
