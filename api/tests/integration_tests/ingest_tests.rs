//! Integration tests for log ingestion.
//!
//! Tests cover:
//! - Acknowledged requests produce exactly one queue entry equal to the body
//! - Malformed bodies are rejected without touching the queue
//! - Queue outages surface as server errors without appends
//! - Concurrent requests each produce their own entry

use axum::http::StatusCode;
use serde_json::{json, Value};
use shared::queue::LogQueue;

use super::common::{post_ingest, queued, test_app};

#[tokio::test]
async fn test_ingest_disk_full_example() {
    let (app, queue) = test_app();

    let (status, body) = post_ingest(app, r#"{"level":"error","msg":"disk full"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
    assert_eq!(
        queued(&*queue, "logs").await,
        vec![json!({"level": "error", "msg": "disk full"})]
    );
}

#[tokio::test]
async fn test_ingest_not_json_example() {
    let (app, queue) = test_app();

    let (status, _) = post_ingest(app, "not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(queue.len("logs").await.unwrap(), 0);
}

#[tokio::test]
async fn test_ingest_preserves_arbitrary_documents() {
    let (app, queue) = test_app();

    let documents = vec![
        json!({}),
        json!({"nested": {"deep": {"list": [1, "two", null, false]}}}),
        json!({"unicode": "ログ ✓", "escaped": "line\nbreak \"quoted\""}),
        json!({"big": 18_446_744_073_709_551_615_u64, "neg": -42, "float": 0.125}),
        json!({"metric": 0.9, "error_rate": 0.01, "latency": 120}),
    ];

    for doc in &documents {
        let (status, _) = post_ingest(app.clone(), serde_json::to_vec(doc).unwrap()).await;
        assert_eq!(status, StatusCode::OK, "rejected {doc}");
    }

    // Entries come back newest first.
    let mut stored = queued(&*queue, "logs").await;
    stored.reverse();
    assert_eq!(stored, documents);
}

#[tokio::test]
async fn test_ingest_each_call_appends_again() {
    let (app, queue) = test_app();
    let body = r#"{"msg":"repeated"}"#;

    post_ingest(app.clone(), body).await;
    post_ingest(app, body).await;

    // No deduplication.
    assert_eq!(queue.len("logs").await.unwrap(), 2);
}

#[tokio::test]
async fn test_ingest_malformed_bodies_never_append() {
    let (app, queue) = test_app();

    let malformed: [&[u8]; 9] = [
        b"",
        b"{",
        br#"{"msg":"trunc"#,
        br#"{"msg" "missing colon"}"#,
        b"{'single': 'quotes'}",
        br#"{"a":1,}"#,
        b"\xff\xfe\x00",
        b"[1, 2, 3]",
        b"\"just a string\"",
    ];

    for body in malformed {
        let (status, text) = post_ingest(app.clone(), body.to_vec()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "accepted {body:?}");

        let error: Value = serde_json::from_str(&text).unwrap();
        assert!(error["error"] == "invalid_json" || error["error"] == "not_an_object");
    }

    assert_eq!(queue.len("logs").await.unwrap(), 0);
}

#[tokio::test]
async fn test_ingest_queue_outage_is_server_error() {
    let (app, queue) = test_app();
    queue.set_available(false);

    let (status, text) = post_ingest(app.clone(), r#"{"msg":"during outage"}"#).await;

    assert!(status.is_server_error());
    let error: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(error["error"], "queue_unavailable");

    // The process keeps serving once the queue is back; the failed entry is not replayed.
    queue.set_available(true);
    let (status, _) = post_ingest(app, r#"{"msg":"after outage"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        queued(&*queue, "logs").await,
        vec![json!({"msg": "after outage"})]
    );
}

#[tokio::test]
async fn test_ingest_concurrent_requests() {
    const REQUESTS: usize = 100;
    let (app, queue) = test_app();

    let handles: Vec<_> = (0..REQUESTS)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move {
                let body = serde_json::to_vec(&json!({"seq": i, "msg": "concurrent"})).unwrap();
                post_ingest(app, body).await
            })
        })
        .collect();

    for handle in handles {
        let (status, body) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }

    let stored = queued(&*queue, "logs").await;
    assert_eq!(stored.len(), REQUESTS);

    let mut seqs: Vec<u64> = stored
        .iter()
        .map(|entry| {
            assert_eq!(entry["msg"], "concurrent");
            entry["seq"].as_u64().unwrap()
        })
        .collect();
    seqs.sort_unstable();
    assert_eq!(seqs, (0..REQUESTS as u64).collect::<Vec<_>>());
}
