//! Object-storage cache backend against a scripted local stand-in.
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use folio::cache::{BlobStore, CacheStore};

const TOKEN: &str = "blob-token";

#[derive(Clone)]
struct BlobStub {
    base: String,
    objects: Arc<Mutex<HashMap<String, String>>>,
}

fn authorized(headers: &HeaderMap) -> bool {
    let expected = format!("Bearer {TOKEN}");
    headers.get("authorization").and_then(|v| v.to_str().ok()) == Some(expected.as_str())
}

#[derive(Deserialize)]
struct ListQuery {
    prefix: String,
}

async fn list_objects(
    State(stub): State<BlobStub>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, StatusCode> {
    if !authorized(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    let blobs: Vec<Value> = stub
        .objects
        .lock()
        .await
        .keys()
        .filter(|path| path.starts_with(&query.prefix))
        .map(|path| json!({ "url": format!("{}/{path}", stub.base) }))
        .collect();
    Ok(Json(json!({ "blobs": blobs })))
}

async fn fetch_object(
    State(stub): State<BlobStub>,
    Path(path): Path<String>,
    headers: HeaderMap,
) -> Result<String, StatusCode> {
    if !authorized(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    stub.objects
        .lock()
        .await
        .get(&path)
        .cloned()
        .ok_or(StatusCode::NOT_FOUND)
}

async fn put_object(
    State(stub): State<BlobStub>,
    Path(path): Path<String>,
    headers: HeaderMap,
    body: String,
) -> StatusCode {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED;
    }
    stub.objects.lock().await.insert(path, body);
    StatusCode::OK
}

async fn delete_object(
    State(stub): State<BlobStub>,
    Path(path): Path<String>,
    headers: HeaderMap,
) -> StatusCode {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED;
    }
    stub.objects.lock().await.remove(&path);
    StatusCode::OK
}

/// Bind the stub first so its own address can appear in list results.
async fn spawn_stub() -> (String, Arc<Mutex<HashMap<String, String>>>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let objects = Arc::new(Mutex::new(HashMap::new()));
    let stub = BlobStub {
        base: base.clone(),
        objects: objects.clone(),
    };
    let app = Router::new()
        .route("/", get(list_objects))
        .route(
            "/*path",
            get(fetch_object).put(put_object).delete(delete_object),
        )
        .with_state(stub);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (base, objects)
}

fn store(base: &str) -> BlobStore {
    BlobStore::new(base.to_string(), TOKEN.into(), "cache".into())
}

#[tokio::test]
async fn round_trip_overwrites_in_place() {
    let (base, objects) = spawn_stub().await;
    let store = store(&base);

    assert_eq!(store.get("movies").await, None);

    let first = json!([{ "id": "m1" }]);
    store.set("movies", &first).await;
    assert_eq!(store.get("movies").await, Some(first));

    // Same key, same address: the second write replaces the first.
    let second = json!([{ "id": "m1" }, { "id": "m2" }]);
    store.set("movies", &second).await;
    assert_eq!(store.get("movies").await, Some(second));
    assert_eq!(objects.lock().await.len(), 1);
}

#[tokio::test]
async fn clear_one_removes_only_that_key() {
    let (base, _objects) = spawn_stub().await;
    let store = store(&base);

    store.set("movies", &json!([1])).await;
    store.set("books", &json!([2])).await;

    store.clear(Some("movies")).await;
    assert_eq!(store.get("movies").await, None);
    assert_eq!(store.get("books").await, Some(json!([2])));
}

#[tokio::test]
async fn clear_all_removes_every_entry_under_the_prefix() {
    let (base, objects) = spawn_stub().await;
    let store = store(&base);

    store.set("profile", &json!({})).await;
    store.set("movies", &json!([])).await;
    store.set("books", &json!([])).await;
    // A foreign object outside the prefix must survive a wholesale clear.
    objects
        .lock()
        .await
        .insert("uploads/avatar.png".to_string(), "binary".to_string());

    store.clear(None).await;

    assert_eq!(store.get("profile").await, None);
    assert_eq!(store.get("movies").await, None);
    assert_eq!(store.get("books").await, None);
    let remaining = objects.lock().await;
    assert_eq!(remaining.len(), 1);
    assert!(remaining.contains_key("uploads/avatar.png"));
}

#[tokio::test]
async fn rejected_credentials_degrade_to_a_miss() {
    let (base, objects) = spawn_stub().await;
    let store = BlobStore::new(base, "wrong-token".into(), "cache".into());

    store.set("movies", &json!([1])).await;
    assert!(objects.lock().await.is_empty(), "rejected write must not land");
    assert_eq!(store.get("movies").await, None);
    store.clear(None).await;
}
