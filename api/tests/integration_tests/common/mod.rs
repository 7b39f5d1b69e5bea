//! Common test utilities and helpers for integration tests.

use api::{create_router, AppState};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use shared::queue::{InMemoryQueue, LogQueue};
use std::sync::Arc;

/// Creates a test router backed by a fresh in-memory queue.
///
/// # Returns
///
/// A tuple containing the configured router and the queue, so tests can
/// inspect what was appended or simulate an outage.
pub fn test_app() -> (Router, Arc<InMemoryQueue>) {
    let queue = InMemoryQueue::new_shared();
    let router = create_router(AppState::new(queue.clone()));
    (router, queue)
}

/// Helper to POST raw bytes to `/ingest`.
///
/// # Returns
///
/// The response status code and body text.
pub async fn post_ingest(app: Router, body: impl Into<Body>) -> (StatusCode, String) {
    let response = tower::ServiceExt::oneshot(
        app,
        Request::builder()
            .method("POST")
            .uri("/ingest")
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap(),
    )
    .await
    .unwrap();

    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8_lossy(&body_bytes).into_owned())
}

/// Helper to make a GET request.
///
/// # Returns
///
/// The response status code and parsed JSON body (`Null` if not JSON).
pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = tower::ServiceExt::oneshot(
        app,
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();

    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    (status, json)
}

/// Reads every entry under `key` and decodes it as JSON, newest first.
pub async fn queued(queue: &dyn LogQueue, key: &str) -> Vec<Value> {
    queue
        .range(key)
        .await
        .unwrap()
        .iter()
        .map(|bytes| serde_json::from_slice(bytes).unwrap())
        .collect()
}
