//! HTTP surface: public JSON content routes plus the admin sync
//! endpoints.
//!
//! Content routes never surface a data-layer fault as a 500; they serve
//! empty states instead. Admin routes do report failure, and are
//! default-deny: with no shared secret configured every caller is
//! rejected unless the deployment opts into open access.
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::catalog::{self, SortKey};
use crate::content::model::MovieKind;
use crate::content::ContentRepo;
use crate::revalidate::Revalidator;

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<ContentRepo>,
    pub revalidator: Arc<Revalidator>,
    pub admin_secret: Option<String>,
    pub allow_open_admin: bool,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/cron", get(cron))
        .route("/api/notion/sync", post(sync))
        .route("/api/profile", get(profile))
        .route("/api/settings", get(settings))
        .route("/api/health", get(health))
        .route("/api/blog", get(blog_posts))
        .route("/api/blog/:slug", get(blog_post))
        .route("/api/movies", get(movies))
        .route("/api/books", get(books))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

/// Default deny: no secret means no access unless explicitly opened.
fn admin_authorized(state: &AppState, headers: &HeaderMap, query_token: Option<&str>) -> bool {
    match &state.admin_secret {
        Some(secret) => {
            bearer(headers) == Some(secret.as_str()) || query_token == Some(secret.as_str())
        }
        None => state.allow_open_admin,
    }
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Unauthorized" })))
}

async fn run_sync(state: &AppState, message: &str) -> Json<Value> {
    let report = state.repo.sync_all().await;
    state.revalidator.revalidate_all().await;
    info!(?report, "sync completed");
    Json(json!({
        "success": true,
        "message": message,
        "counts": report,
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

#[derive(Debug, Deserialize)]
struct CronQuery {
    token: Option<String>,
}

/// GET /api/cron: scheduled refresh; the token may arrive as a query
/// param or a bearer header.
async fn cron(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<CronQuery>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if !admin_authorized(&state, &headers, query.token.as_deref()) {
        return Err(unauthorized());
    }
    Ok(run_sync(&state, "Cron job executed successfully").await)
}

/// POST /api/notion/sync: webhook-triggered refresh, bearer only.
async fn sync(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if !admin_authorized(&state, &headers, None) {
        return Err(unauthorized());
    }
    Ok(run_sync(&state, "Notion data synced successfully").await)
}

async fn profile(
    State(state): State<AppState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match state.repo.profile(false).await {
        Some(profile) => Ok(Json(json!(profile))),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Profile not found" })),
        )),
    }
}

/// Always 200 with a usable title; the default covers every failure.
async fn settings(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "title": state.repo.site_title().await }))
}

async fn health() -> Json<Value> {
    Json(json!({
        "commitSha": std::env::var("COMMIT_SHA").ok(),
        "commitRef": std::env::var("COMMIT_REF").ok(),
        "deployedAt": Utc::now().to_rfc3339(),
    }))
}

async fn blog_posts(State(state): State<AppState>) -> Json<Value> {
    Json(json!(state.repo.blog_posts(false).await))
}

async fn blog_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match state.repo.blog_post_by_slug(&slug).await {
        Some(post) => Ok(Json(json!(post))),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Post not found" })),
        )),
    }
}

// Filter params stay strings so off-vocabulary values ("type=all",
// an unknown sort) fall back to the unfiltered list instead of a 400.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MovieListQuery {
    sort: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    /// Comma-separated genre list.
    genres: Option<String>,
    year: Option<i32>,
    min_rating: Option<f64>,
    director: Option<String>,
}

/// "all", absent, and unrecognized values leave the type facet unset.
fn kind_filter(raw: Option<&str>) -> Option<MovieKind> {
    match raw {
        Some(r) if r.eq_ignore_ascii_case("movie") => Some(MovieKind::Movie),
        Some(r) if r.eq_ignore_ascii_case("series") => Some(MovieKind::Series),
        _ => None,
    }
}

fn split_genres(raw: Option<String>) -> Option<Vec<String>> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .map(str::to_string)
            .collect()
    })
}

async fn movies(
    State(state): State<AppState>,
    Query(query): Query<MovieListQuery>,
) -> Json<Value> {
    let all = state.repo.movies(false).await;
    let filters = catalog::movies::MovieFilters {
        kind: kind_filter(query.kind.as_deref()),
        genres: split_genres(query.genres),
        year: query.year,
        min_rating: query.min_rating,
        director: query.director,
    };
    let mut listed = catalog::movies::filter_movies(&all, &filters);
    if let Some(sort) = query.sort.as_deref().and_then(SortKey::parse) {
        listed = catalog::movies::sort_movies(&listed, sort);
    }
    Json(json!({
        "movies": listed,
        "stats": catalog::movies::movie_stats(&all),
        "facets": {
            "genres": catalog::movies::unique_genres(&all),
            "years": catalog::movies::unique_years(&all),
            "directors": catalog::movies::unique_directors(&all),
        },
    }))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BookListQuery {
    sort: Option<String>,
    /// Comma-separated genre list.
    genres: Option<String>,
    year: Option<i32>,
    min_rating: Option<f64>,
    author: Option<String>,
}

async fn books(
    State(state): State<AppState>,
    Query(query): Query<BookListQuery>,
) -> Json<Value> {
    let all = state.repo.books(false).await;
    let filters = catalog::books::BookFilters {
        genres: split_genres(query.genres),
        year: query.year,
        min_rating: query.min_rating,
        author: query.author,
    };
    let mut listed = catalog::books::filter_books(&all, &filters);
    if let Some(sort) = query.sort.as_deref().and_then(SortKey::parse) {
        listed = catalog::books::sort_books(&listed, sort);
    }
    Json(json!({
        "books": listed,
        "stats": catalog::books::book_stats(&all),
        "facets": {
            "genres": catalog::books::unique_genres(&all),
            "years": catalog::books::unique_years(&all),
            "authors": catalog::books::unique_authors(&all),
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_header_parsing() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Bearer shh".parse().unwrap());
        assert_eq!(bearer(&headers), Some("shh"));

        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Basic shh".parse().unwrap());
        assert_eq!(bearer(&headers), None);
    }

    #[test]
    fn kind_filter_treats_all_and_unknown_as_unset() {
        assert_eq!(kind_filter(Some("movie")), Some(MovieKind::Movie));
        assert_eq!(kind_filter(Some("Series")), Some(MovieKind::Series));
        assert_eq!(kind_filter(Some("all")), None);
        assert_eq!(kind_filter(Some("whatever")), None);
        assert_eq!(kind_filter(None), None);
    }

    #[test]
    fn genre_splitting_trims_and_drops_empties() {
        assert_eq!(
            split_genres(Some("Sci-Fi, Drama,,".into())),
            Some(vec!["Sci-Fi".to_string(), "Drama".to_string()])
        );
        assert_eq!(split_genres(None), None);
    }
}
