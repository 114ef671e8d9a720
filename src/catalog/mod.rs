//! Pure, stateless transformations over the normalized collections:
//! statistics, faceted filtering, sorting, and derived views used to
//! drive list pages and their filter controls.
use chrono::{DateTime, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod books;
pub mod movies;

/// The eight supported total orders over a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    DateDesc,
    DateAsc,
    RatingDesc,
    RatingAsc,
    YearDesc,
    YearAsc,
    TitleAsc,
    TitleDesc,
}

impl SortKey {
    /// Lenient parse for query strings. Unrecognized values mean no
    /// explicit order rather than an error.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "date-desc" => Some(SortKey::DateDesc),
            "date-asc" => Some(SortKey::DateAsc),
            "rating-desc" => Some(SortKey::RatingDesc),
            "rating-asc" => Some(SortKey::RatingAsc),
            "year-desc" => Some(SortKey::YearDesc),
            "year-asc" => Some(SortKey::YearAsc),
            "title-asc" => Some(SortKey::TitleAsc),
            "title-desc" => Some(SortKey::TitleDesc),
            _ => None,
        }
    }
}

/// Comparison value of an ISO date string. Unparseable or empty dates
/// collapse to epoch zero and sort as oldest.
pub(crate) fn date_value(raw: &str) -> i64 {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.timestamp();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_time(NaiveTime::MIN).and_utc().timestamp();
    }
    0
}

/// Occurrence counts reduced to the top `limit`, descending. Counting
/// goes through a BTreeMap so ties break deterministically by key.
pub(crate) fn top_counts<I>(keys: I, limit: usize) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = String>,
{
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for key in keys {
        *counts.entry(key).or_default() += 1;
    }
    let mut entries: Vec<(String, usize)> = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries.truncate(limit);
    entries
}

/// Star string for a 0–5 rating, full stars only.
pub fn render_stars(rating: f64) -> String {
    let full = (rating.floor().clamp(0.0, 5.0)) as usize;
    "⭐".repeat(full) + &"☆".repeat(5 - full)
}
