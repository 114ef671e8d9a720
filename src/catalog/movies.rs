//! Statistics, filters, sorting, and derived views for the movie log.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::BTreeSet;

use super::{date_value, top_counts, SortKey};
use crate::content::model::{Movie, MovieKind, WatchStatus};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieStats {
    pub total: usize,
    pub movies: usize,
    pub series: usize,
    pub average_rating: f64,
    pub by_year: BTreeMap<i32, usize>,
    pub top_genres: Vec<GenreCount>,
    pub top_directors: Vec<DirectorCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreCount {
    pub genre: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectorCount {
    pub director: String,
    pub count: usize,
}

/// Conjunctive filter set; unset fields are no-ops.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieFilters {
    /// None means "all".
    pub kind: Option<MovieKind>,
    pub genres: Option<Vec<String>>,
    pub year: Option<i32>,
    pub min_rating: Option<f64>,
    pub director: Option<String>,
}

fn is_watched(movie: &Movie) -> bool {
    movie.status == WatchStatus::Watched
}

/// Aggregate statistics over the watched subset only.
pub fn movie_stats(movies: &[Movie]) -> MovieStats {
    let watched: Vec<&Movie> = movies.iter().filter(|m| is_watched(m)).collect();
    if watched.is_empty() {
        return MovieStats::default();
    }

    let ratings: Vec<f64> = watched
        .iter()
        .filter(|m| m.rating > 0.0)
        .map(|m| m.rating)
        .collect();
    let average_rating = if ratings.is_empty() {
        0.0
    } else {
        ratings.iter().sum::<f64>() / ratings.len() as f64
    };

    let mut by_year: BTreeMap<i32, usize> = BTreeMap::new();
    for movie in &watched {
        if let Some(year) = movie.year {
            *by_year.entry(year).or_default() += 1;
        }
    }

    let top_genres = top_counts(
        watched
            .iter()
            .flat_map(|m| m.genre.iter().flatten().cloned()),
        5,
    )
    .into_iter()
    .map(|(genre, count)| GenreCount { genre, count })
    .collect();

    let top_directors = top_counts(
        watched.iter().filter_map(|m| m.director.clone()),
        5,
    )
    .into_iter()
    .map(|(director, count)| DirectorCount { director, count })
    .collect();

    MovieStats {
        total: watched.len(),
        movies: watched.iter().filter(|m| m.kind == MovieKind::Movie).count(),
        series: watched.iter().filter(|m| m.kind == MovieKind::Series).count(),
        average_rating,
        by_year,
        top_genres,
        top_directors,
    }
}

/// Apply every set predicate; an empty filter returns the input order
/// unchanged.
pub fn filter_movies(movies: &[Movie], filters: &MovieFilters) -> Vec<Movie> {
    movies
        .iter()
        .filter(|m| filters.kind.map_or(true, |kind| m.kind == kind))
        .filter(|m| match &filters.genres {
            Some(wanted) if !wanted.is_empty() => m
                .genre
                .as_ref()
                .is_some_and(|genres| genres.iter().any(|g| wanted.contains(g))),
            _ => true,
        })
        .filter(|m| filters.year.map_or(true, |year| m.year == Some(year)))
        .filter(|m| filters.min_rating.map_or(true, |min| m.rating >= min))
        .filter(|m| {
            filters
                .director
                .as_ref()
                .map_or(true, |d| m.director.as_deref() == Some(d.as_str()))
        })
        .cloned()
        .collect()
}

pub fn sort_movies(movies: &[Movie], key: SortKey) -> Vec<Movie> {
    let mut sorted = movies.to_vec();
    match key {
        SortKey::DateDesc => {
            sorted.sort_by(|a, b| date_value(&b.watched_date).cmp(&date_value(&a.watched_date)))
        }
        SortKey::DateAsc => {
            sorted.sort_by(|a, b| date_value(&a.watched_date).cmp(&date_value(&b.watched_date)))
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

/// Watched and rated, best first, capped at `limit`.
pub fn top_rated(movies: &[Movie], limit: usize) -> Vec<Movie> {
    let mut rated: Vec<Movie> = movies
        .iter()
        .filter(|m| is_watched(m) && m.rating > 0.0)
        .cloned()
        .collect();
    rated.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    rated.truncate(limit);
    rated
}

/// Watched, most recent first, capped at `limit`.
pub fn recently_watched(movies: &[Movie], limit: usize) -> Vec<Movie> {
    let mut watched: Vec<Movie> = movies.iter().filter(|m| is_watched(m)).cloned().collect();
    watched.sort_by(|a, b| date_value(&b.watched_date).cmp(&date_value(&a.watched_date)));
    watched.truncate(limit);
    watched
}

/// Distinct genres, lexicographic, for filter controls.
pub fn unique_genres(movies: &[Movie]) -> Vec<String> {
    let genres: BTreeSet<String> = movies
        .iter()
        .flat_map(|m| m.genre.iter().flatten().cloned())
        .collect();
    genres.into_iter().collect()
}

/// Distinct years, newest first.
pub fn unique_years(movies: &[Movie]) -> Vec<i32> {
    let years: BTreeSet<i32> = movies.iter().filter_map(|m| m.year).collect();
    years.into_iter().rev().collect()
}

/// Distinct directors, lexicographic.
pub fn unique_directors(movies: &[Movie]) -> Vec<String> {
    let directors: BTreeSet<String> =
        movies.iter().filter_map(|m| m.director.clone()).collect();
    directors.into_iter().collect()
}

/// Display label for a movie list facet.
pub fn filter_label(facet: &str) -> &str {
    match facet {
        "all" => "All",
        "movie" => "Movies",
        "series" => "Series",
        "top-rated" => "Top Rated",
        "recently-watched" => "Recently Watched",
        "watchlist" => "Watchlist",
        other => other,
    }
}
