use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use bson::{doc, Document};
use futures::stream::{self, StreamExt};
use serde_json::{json, Value};
use tower::ServiceExt;

use promdoc::api;
use promdoc::engine::Engine;
use promdoc::error::{Error, Result};
use promdoc::mapping::{CollectionDescriptor, MappingTable};
use promdoc::store::{DocumentStore, DocumentStream, MemoryStore};

fn table() -> Arc<MappingTable> {
    let descriptor = CollectionDescriptor {
        name: "metrics_http".into(),
        time_field: "timestamp".into(),
        metric_field: "metric_name".into(),
        value_field: "value".into(),
        label_fields: vec![("code".to_string(), "status_code".to_string())]
            .into_iter()
            .collect(),
        default_labels: vec![("environment".to_string(), "production".to_string())]
            .into_iter()
            .collect(),
    };

    let mut collections = HashMap::new();
    collections.insert("http".to_string(), descriptor);
    let mut mappings = HashMap::new();
    mappings.insert("http_requests_total".to_string(), "http".to_string());

    Arc::new(MappingTable::new(collections, mappings).expect("valid mapping table"))
}

async fn get(store: Arc<dyn DocumentStore>, uri: &str) -> (StatusCode, Value) {
    let app = api::router(Engine::new(table(), store), "/prom/query");
    let req = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("valid request");

    let resp = app.oneshot(req).await.expect("infallible");
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("readable body");
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

/// Counts `find` calls and returns nothing.
#[derive(Default)]
struct CountingStore {
    calls: AtomicUsize,
}

#[async_trait]
impl DocumentStore for CountingStore {
    async fn find(&self, _: &str, _: Document) -> Result<DocumentStream> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(stream::empty().boxed())
    }
}

struct BrokenStore;

#[async_trait]
impl DocumentStore for BrokenStore {
    async fn find(&self, _: &str, _: Document) -> Result<DocumentStream> {
        Err(Error::Store("no reachable servers".into()))
    }
}

#[tokio::test]
async fn test_inverted_window_never_reaches_the_store() {
    let store = Arc::new(CountingStore::default());

    let (status, body) = get(
        store.clone(),
        "/api/v1/query_range?query=http_requests_total&start=200&end=100&step=15",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errorType"], "bad_data");
    assert_eq!(store.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unknown_metric_never_reaches_the_store() {
    let store = Arc::new(CountingStore::default());

    let (status, body) = get(store.clone(), "/prom/query?query=up").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"status": "error", "errorType": "bad_data", "error": "unknown metric \"up\""})
    );
    assert_eq!(store.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_configured_query_path() {
    let store = Arc::new(CountingStore::default());

    let (status, body) = get(store.clone(), "/prom/query?query=http_requests_total").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "success", "data": {"resultType": "vector", "result": []}}));
    assert_eq!(store.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_store_failure_is_internal() {
    let (status, body) = get(Arc::new(BrokenStore), "/prom/query?query=http_requests_total").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({
            "status": "error",
            "errorType": "internal",
            "error": "store error: no reachable servers",
        })
    );
}

#[tokio::test]
async fn test_default_labels_and_numeric_label_fields() {
    let store = MemoryStore::new();
    store.insert(
        "metrics_http",
        doc! {
            "timestamp": bson::DateTime::from_millis(1609459200000),
            "metric_name": "http_requests_total",
            "status_code": 200,
            "value": "42.5",
        },
    );
    store.insert(
        "metrics_http",
        doc! {
            "timestamp": bson::DateTime::from_millis(1609459201000),
            "metric_name": "http_requests_total",
            "status_code": 200,
        },
    );

    let (status, body) = get(
        Arc::new(store),
        "/api/v1/query_range?query=http_requests_total&start=1609459200&end=1609459201&step=1",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["result"],
        json!([{
            "metric": {
                "__name__": "http_requests_total",
                "code": "200",
                "environment": "production",
            },
            "values": [[1609459200.0, "42.5"], [1609459201.0, "0"]],
        }])
    );
}
