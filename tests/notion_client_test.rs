//! Client behavior against a scripted local stand-in for the Notion API.
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::post,
    Router,
};
use reqwest::Url;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use folio::error::FetchError;
use folio::notion::{NotionApi, NotionClient, MAX_QUERY_PAGES};

#[derive(Clone)]
struct StubState {
    requests: Arc<AtomicUsize>,
    saw_no_cache: Arc<AtomicUsize>,
    pages: Arc<Vec<Value>>,
    endless: bool,
}

async fn query_handler(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    state.requests.fetch_add(1, Ordering::SeqCst);
    if headers.get("cache-control").map(|v| v.as_bytes()) == Some(b"no-cache") {
        state.saw_no_cache.fetch_add(1, Ordering::SeqCst);
    }

    if state.endless {
        return Json(json!({
            "results": [],
            "has_more": true,
            "next_cursor": "again"
        }));
    }

    let index = body
        .get("start_cursor")
        .and_then(Value::as_str)
        .and_then(|c| c.strip_prefix("page-"))
        .and_then(|n| n.parse::<usize>().ok())
        .unwrap_or(0);
    let last = index + 1 >= state.pages.len();
    Json(json!({
        "results": state.pages[index],
        "has_more": !last,
        "next_cursor": if last { Value::Null } else { json!(format!("page-{}", index + 1)) }
    }))
}

async fn spawn_stub(state: StubState, status: Option<StatusCode>) -> String {
    let app = match status {
        Some(status) => Router::new().route(
            "/v1/databases/:id/query",
            post(move || async move { (status, Json(json!({ "message": "nope" }))) }),
        ),
        None => Router::new()
            .route("/v1/databases/:id/query", post(query_handler))
            .with_state(state),
    };
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/")
}

fn client(base: &str) -> NotionClient {
    NotionClient::with_base_url(
        "test-token".into(),
        "2022-06-28".into(),
        Url::parse(base).unwrap(),
    )
}

fn stub_state(pages: Vec<Value>, endless: bool) -> StubState {
    StubState {
        requests: Arc::new(AtomicUsize::new(0)),
        saw_no_cache: Arc::new(AtomicUsize::new(0)),
        pages: Arc::new(pages),
        endless,
    }
}

fn page(id: &str) -> Value {
    json!({ "id": id, "properties": {} })
}

#[tokio::test]
async fn pagination_returns_all_items_in_order_one_request_per_page() {
    let state = stub_state(
        vec![
            json!([page("a"), page("b")]),
            json!([page("c"), page("d")]),
            json!([page("e")]),
        ],
        false,
    );
    let base = spawn_stub(state.clone(), None).await;

    let pages = client(&base)
        .query_database("db-1", None, None, false)
        .await
        .unwrap();

    let ids: Vec<&str> = pages.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c", "d", "e"]);
    assert_eq!(state.requests.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn force_fresh_sends_no_cache_header() {
    let state = stub_state(vec![json!([page("a")])], false);
    let base = spawn_stub(state.clone(), None).await;

    client(&base)
        .query_database("db-1", None, None, true)
        .await
        .unwrap();
    assert_eq!(state.saw_no_cache.load(Ordering::SeqCst), 1);

    client(&base)
        .query_database("db-1", None, None, false)
        .await
        .unwrap();
    assert_eq!(state.saw_no_cache.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn runaway_cursor_chain_hits_the_pagination_bound() {
    let state = stub_state(vec![], true);
    let base = spawn_stub(state.clone(), None).await;

    let err = client(&base)
        .query_database("db-1", None, None, false)
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::PaginationLimit(MAX_QUERY_PAGES)));
    assert_eq!(state.requests.load(Ordering::SeqCst), MAX_QUERY_PAGES);
}

#[tokio::test]
async fn not_found_and_unauthorized_map_to_distinct_errors() {
    let base = spawn_stub(stub_state(vec![], false), Some(StatusCode::NOT_FOUND)).await;
    let err = client(&base)
        .query_database("bad-db", None, None, false)
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::NotFound));

    let base = spawn_stub(stub_state(vec![], false), Some(StatusCode::UNAUTHORIZED)).await;
    let err = client(&base)
        .query_database("db", None, None, false)
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Unauthorized));
}

#[tokio::test]
async fn other_failures_carry_status_and_message() {
    let base = spawn_stub(
        stub_state(vec![], false),
        Some(StatusCode::SERVICE_UNAVAILABLE),
    )
    .await;
    let err = client(&base)
        .query_database("db", None, None, false)
        .await
        .unwrap_err();
    match err {
        FetchError::Api { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "nope");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
