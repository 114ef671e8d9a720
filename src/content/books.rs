//! Book log repository.
use tracing::warn;

use crate::content::model::{Book, ReadStatus};
use crate::content::{keys, non_empty, sort_descending, year_of, ContentRepo};
use crate::error::FetchError;
use crate::notion::model::Page;
use crate::notion::props::{self, PropertyKind};

impl ContentRepo {
    /// Full book log, newest read first.
    pub async fn books(&self, force: bool) -> Vec<Book> {
        match self.fetch_books(force).await {
            Ok(books) => books,
            Err(err) => {
                warn!(?err, "books fetch degraded to empty");
                Vec::new()
            }
        }
    }

    async fn fetch_books(&self, force: bool) -> Result<Vec<Book>, FetchError> {
        if !force {
            if let Some(cached) = self.cached::<Vec<Book>>(keys::BOOKS).await {
                return Ok(cached);
            }
        }

        let Some(db) = self.databases().books.clone() else {
            return Ok(Vec::new());
        };

        let pages = self
            .notion()
            .query_database(&db, None, Some(sort_descending("Read Date")), force)
            .await?;

        let books: Vec<Book> = pages.iter().map(book_from_page).collect();
        self.store(keys::BOOKS, &books).await;
        Ok(books)
    }
}

fn book_from_page(page: &Page) -> Book {
    let pages_count = props::number(page, "Pages");
    Book {
        id: page.id.clone(),
        title: props::text(page, "Title", PropertyKind::Title),
        author: props::text(page, "Author", PropertyKind::RichText),
        status: ReadStatus::parse(&props::text(page, "Status", PropertyKind::Select)),
        rating: props::number(page, "Rating"),
        read_date: props::text(page, "Read Date", PropertyKind::Date),
        cover: props::file_url(page, "Cover")
            .or_else(|| non_empty(props::text(page, "Cover", PropertyKind::Url))),
        genre: {
            let genre = props::tags(page, "Genre");
            if genre.is_empty() {
                None
            } else {
                Some(genre)
            }
        },
        pages: if pages_count > 0.0 {
            Some(pages_count as i64)
        } else {
            None
        },
        year: year_of(props::number(page, "Year")),
    }
}
