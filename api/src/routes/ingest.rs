//! Log ingestion endpoint.
//!
//! `POST /ingest` accepts a JSON object, re-encodes it canonically and
//! appends it to the queue. The acknowledgement is only sent once the queue
//! has confirmed the append.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{body::Bytes, extract::State, routing::post, Router};
use shared::models::LogEntry;

/// Plain-text acknowledgement body.
pub const ACK: &str = "ok";

/// Creates the ingestion routes with application state.
pub fn ingest_routes(state: AppState) -> Router {
    Router::new()
        .route("/ingest", post(ingest))
        .with_state(state)
}

/// Handler for log ingestion.
///
/// Returns 200 `ok` after exactly one append, 400 on a malformed body (no
/// append), and 503/500 when the queue does not confirm the append. Failed
/// appends are not retried.
async fn ingest(State(state): State<AppState>, body: Bytes) -> Result<&'static str, ApiError> {
    let entry = LogEntry::from_slice(&body)?;
    let payload = entry.to_bytes().map_err(encode_failed)?;

    let length = state.queue().push(state.queue_key(), payload).await?;

    tracing::debug!(
        fields = entry.len(),
        queue_length = length,
        "Enqueued log entry"
    );

    Ok(ACK)
}

fn encode_failed(e: serde_json::Error) -> ApiError {
    ApiError::Internal(format!("failed to encode entry: {e}"))
}
