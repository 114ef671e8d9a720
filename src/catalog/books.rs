//! Statistics, filters, sorting, and derived views for the book log.
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{date_value, top_counts, SortKey};
use crate::content::model::{Book, ReadStatus};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookStats {
    pub total: usize,
    pub average_rating: f64,
    pub top_genres: Vec<GenreCount>,
    pub top_authors: Vec<AuthorCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreCount {
    pub genre: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorCount {
    pub author: String,
    pub count: usize,
}

/// Conjunctive filter set; unset fields are no-ops.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookFilters {
    pub genres: Option<Vec<String>>,
    pub year: Option<i32>,
    pub min_rating: Option<f64>,
    pub author: Option<String>,
}

fn is_read(book: &Book) -> bool {
    book.status == ReadStatus::Read
}

/// Aggregate statistics over the read subset only.
pub fn book_stats(books: &[Book]) -> BookStats {
    let read: Vec<&Book> = books.iter().filter(|b| is_read(b)).collect();
    if read.is_empty() {
        return BookStats::default();
    }

    let ratings: Vec<f64> = read
        .iter()
        .filter(|b| b.rating > 0.0)
        .map(|b| b.rating)
        .collect();
    let average_rating = if ratings.is_empty() {
        0.0
    } else {
        ratings.iter().sum::<f64>() / ratings.len() as f64
    };

    let top_genres = top_counts(
        read.iter().flat_map(|b| b.genre.iter().flatten().cloned()),
        5,
    )
    .into_iter()
    .map(|(genre, count)| GenreCount { genre, count })
    .collect();

    let top_authors = top_counts(
        read.iter()
            .filter(|b| !b.author.is_empty())
            .map(|b| b.author.clone()),
        5,
    )
    .into_iter()
    .map(|(author, count)| AuthorCount { author, count })
    .collect();

    BookStats {
        total: read.len(),
        average_rating,
        top_genres,
        top_authors,
    }
}

/// Apply every set predicate; an empty filter returns the input order
/// unchanged.
pub fn filter_books(books: &[Book], filters: &BookFilters) -> Vec<Book> {
    books
        .iter()
        .filter(|b| match &filters.genres {
            Some(wanted) if !wanted.is_empty() => b
                .genre
                .as_ref()
                .is_some_and(|genres| genres.iter().any(|g| wanted.contains(g))),
            _ => true,
        })
        .filter(|b| filters.year.map_or(true, |year| b.year == Some(year)))
        .filter(|b| filters.min_rating.map_or(true, |min| b.rating >= min))
        .filter(|b| {
            filters
                .author
                .as_ref()
                .map_or(true, |a| b.author == a.as_str())
        })
        .cloned()
        .collect()
}

pub fn sort_books(books: &[Book], key: SortKey) -> Vec<Book> {
    let mut sorted = books.to_vec();
    match key {
        SortKey::DateDesc => {
            sorted.sort_by(|a, b| date_value(&b.read_date).cmp(&date_value(&a.read_date)))
        }
        SortKey::DateAsc => {
            sorted.sort_by(|a, b| date_value(&a.read_date).cmp(&date_value(&b.read_date)))
        }
        SortKey::RatingDesc => sorted.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        SortKey::RatingAsc => sorted.sort_by(|a, b| a.rating.total_cmp(&b.rating)),
        SortKey::YearDesc => sorted.sort_by(|a, b| b.year.unwrap_or(0).cmp(&a.year.unwrap_or(0))),
        SortKey::YearAsc => sorted.sort_by(|a, b| a.year.unwrap_or(0).cmp(&b.year.unwrap_or(0))),
        SortKey::TitleAsc => sorted.sort_by(|a, b| a.title.cmp(&b.title)),
        SortKey::TitleDesc => sorted.sort_by(|a, b| b.title.cmp(&a.title)),
    }
    sorted
}

/// Read and rated, best first, capped at `limit`.
pub fn top_rated(books: &[Book], limit: usize) -> Vec<Book> {
    let mut rated: Vec<Book> = books
        .iter()
        .filter(|b| is_read(b) && b.rating > 0.0)
        .cloned()
        .collect();
    rated.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    rated.truncate(limit);
    rated
}

/// Read, most recent first, capped at `limit`.
pub fn recently_read(books: &[Book], limit: usize) -> Vec<Book> {
    let mut read: Vec<Book> = books.iter().filter(|b| is_read(b)).cloned().collect();
    read.sort_by(|a, b| date_value(&b.read_date).cmp(&date_value(&a.read_date)));
    read.truncate(limit);
    read
}

/// Distinct genres, lexicographic, for filter controls.
pub fn unique_genres(books: &[Book]) -> Vec<String> {
    let genres: BTreeSet<String> = books
        .iter()
        .flat_map(|b| b.genre.iter().flatten().cloned())
        .collect();
    genres.into_iter().collect()
}

/// Distinct years, newest first.
pub fn unique_years(books: &[Book]) -> Vec<i32> {
    let years: BTreeSet<i32> = books.iter().filter_map(|b| b.year).collect();
    years.into_iter().rev().collect()
}

/// Distinct authors, lexicographic.
pub fn unique_authors(books: &[Book]) -> Vec<String> {
    let authors: BTreeSet<String> = books
        .iter()
        .filter(|b| !b.author.is_empty())
        .map(|b| b.author.clone())
        .collect();
    authors.into_iter().collect()
}

/// Display label for a book list facet.
pub fn filter_label(facet: &str) -> &str {
    match facet {
        "all" => "All",
        "top-rated" => "Top Rated",
        "recently-read" => "Recently Read",
        "readlist" => "Readlist",
        "reading" => "Reading",
        other => other,
    }
}
