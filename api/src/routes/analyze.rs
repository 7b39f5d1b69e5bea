//! Anomaly analysis endpoint.
//!
//! `GET /analyze` reads every queued entry and returns those the isolation
//! forest flags as anomalous. Reading does not remove anything from the queue.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use shared::models::LogEntry;

/// Response for an analysis run.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    /// Entries predicted anomalous, newest first.
    pub anomalies: Vec<LogEntry>,
    /// Number of entries examined.
    pub total: usize,
}

/// Creates the analysis routes with application state.
pub fn analyze_routes(state: AppState) -> Router {
    Router::new()
        .route("/analyze", get(analyze))
        .with_state(state)
}

async fn analyze(State(state): State<AppState>) -> Result<Json<AnalyzeResponse>, ApiError> {
    let raw = state.queue().range(state.queue_key()).await?;

    let entries: Vec<LogEntry> = raw
        .iter()
        .filter_map(|bytes| match LogEntry::from_slice(bytes) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping undecodable queue entry");
                None
            }
        })
        .collect();
    let total = entries.len();

    // Training is CPU-bound; keep it off the async workers.
    let detector = state.detector();
    let anomalies = tokio::task::spawn_blocking(move || detector.detect(entries))
        .await
        .map_err(|e| ApiError::Internal(format!("analysis task failed: {e}")))?;

    tracing::info!(total, anomalies = anomalies.len(), "Analyzed queued entries");

    Ok(Json(AnalyzeResponse { anomalies, total }))
}
