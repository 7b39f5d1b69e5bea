//! Integration tests against a live Redis instance.
//!
//! These tests require a running Redis, by default at `redis://127.0.0.1:6379`
//! (override with `LOGSINK_TEST_REDIS_URL`).
//!
//! Run with: `cargo test -- --ignored`

use api::{create_router, AppState};
use axum::http::StatusCode;
use serde_json::json;
use shared::queue::{LogQueue, RedisQueue};
use std::sync::Arc;
use std::time::Duration;

use super::common::{post_ingest, queued};

fn redis_url() -> String {
    std::env::var("LOGSINK_TEST_REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".into())
}

/// Each test pushes under its own key so runs do not interfere.
fn unique_key(name: &str) -> String {
    format!("logsink-it-{name}-{}", std::process::id())
}

#[tokio::test]
#[ignore = "requires running Redis instance"]
async fn test_ingest_into_redis() {
    let key = unique_key("ingest");
    let queue = Arc::new(RedisQueue::open(&redis_url(), Duration::from_secs(2)).unwrap());
    let app = create_router(AppState::new(queue.clone()).with_queue_key(key.as_str()));

    let (status, body) = post_ingest(app, r#"{"level":"error","msg":"disk full"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
    let stored = queued(&*queue, &key).await;
    assert_eq!(stored[0], json!({"level": "error", "msg": "disk full"}));
}

#[tokio::test]
#[ignore = "requires running Redis instance"]
async fn test_concurrent_ingest_into_redis() {
    const REQUESTS: usize = 50;
    let key = unique_key("concurrent");
    let queue = Arc::new(RedisQueue::open(&redis_url(), Duration::from_secs(2)).unwrap());
    let app = create_router(AppState::new(queue.clone()).with_queue_key(key.as_str()));
    let before = queue.len(&key).await.unwrap();

    let handles: Vec<_> = (0..REQUESTS)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move { post_ingest(app, json!({"seq": i}).to_string()).await })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().0, StatusCode::OK);
    }

    assert_eq!(queue.len(&key).await.unwrap(), before + REQUESTS);
}

#[tokio::test]
async fn test_unreachable_redis_is_server_error() {
    // Port 1 is reserved and refuses connections.
    let queue = Arc::new(RedisQueue::open("redis://127.0.0.1:1", Duration::from_millis(500)).unwrap());
    let app = create_router(AppState::new(queue));

    let started = std::time::Instant::now();
    let (status, _) = post_ingest(app, r#"{"msg":"nowhere to go"}"#).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_silent_redis_times_out() {
    // Accepts connections and holds them open without ever replying.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let deadline = Duration::from_millis(300);
    let queue = Arc::new(RedisQueue::open(&format!("redis://{addr}"), deadline).unwrap());
    let app = create_router(AppState::new(queue));

    let started = std::time::Instant::now();
    let (status, body) = post_ingest(app, r#"{"msg":"never acknowledged"}"#).await;
    let elapsed = started.elapsed();

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let error: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(error["error"], "queue_timeout");
    assert!(elapsed >= deadline, "returned after {elapsed:?}");
    assert!(elapsed < deadline + Duration::from_secs(1), "returned after {elapsed:?}");

    server.abort();
}
