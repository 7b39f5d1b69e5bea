//! Integration tests for anomaly analysis over ingested entries.

use axum::http::StatusCode;
use serde_json::json;

use super::common::{get, post_ingest, test_app};

#[tokio::test]
async fn test_ingest_then_analyze_flags_outlier() {
    let (app, _queue) = test_app();

    for i in 0..40u32 {
        let body = json!({
            "service": "checkout",
            "metric": 1.0 + f64::from(i % 5) / 100.0,
            "error_rate": 0.02,
            "latency": 110 + i % 3,
        });
        let (status, _) = post_ingest(app.clone(), body.to_string()).await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, _) = post_ingest(
        app.clone(),
        json!({"service": "checkout", "metric": 60.0, "error_rate": 0.7, "latency": 9500})
            .to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get(app, "/analyze").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 41);
    let anomalies = body["anomalies"].as_array().unwrap();
    assert!(anomalies.iter().any(|a| a["latency"] == 9500));
}

#[tokio::test]
async fn test_analyze_entries_without_features() {
    let (app, _queue) = test_app();

    for msg in ["a", "b", "c"] {
        post_ingest(app.clone(), json!({"msg": msg}).to_string()).await;
    }

    // Every entry maps to the zero vector, so nothing stands out.
    let (status, body) = get(app, "/analyze").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert_eq!(body["anomalies"], json!([]));
}

#[tokio::test]
async fn test_analyze_extreme_metrics() {
    let (app, _queue) = test_app();

    for metric in [1.7e308, -1.7e308, 0.0] {
        let (status, _) = post_ingest(app.clone(), json!({"metric": metric}).to_string()).await;
        assert_eq!(status, StatusCode::OK);
    }

    // Repeated calls keep succeeding since analysis never drains the queue.
    for _ in 0..2 {
        let (status, body) = get(app.clone(), "/analyze").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 3);
    }
}

#[tokio::test]
async fn test_analyze_queue_outage() {
    let (app, queue) = test_app();
    queue.set_available(false);

    let (status, body) = get(app, "/analyze").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "queue_unavailable");
}
