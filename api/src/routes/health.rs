//! Health check endpoints.
//!
//! `/health` reports liveness for load balancers. `/ready` additionally
//! checks that the queue answers.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status (always "healthy" if reachable).
    pub status: &'static str,
    /// Service name.
    pub service: &'static str,
    /// Service version.
    pub version: &'static str,
}

/// Readiness check response.
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    /// "ready" or "unavailable".
    pub status: &'static str,
    /// Current number of queued entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_length: Option<usize>,
    /// Why the queue could not be reached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Creates the health check routes.
pub fn health_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(ready_check))
        .with_state(state)
}

/// Health check handler.
///
/// Returns a simple JSON response indicating the service is healthy.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "logsink-api",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Readiness handler.
///
/// Returns 200 with the queue length, or 503 if the queue cannot be reached.
async fn ready_check(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    match state.queue().len(state.queue_key()).await {
        Ok(length) => (
            StatusCode::OK,
            Json(ReadyResponse {
                status: "ready",
                queue_length: Some(length),
                error: None,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadyResponse {
                    status: "unavailable",
                    queue_length: None,
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}
