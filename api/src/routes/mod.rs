//! API route definitions.
//!
//! This module organizes all HTTP routes for the Logsink API server.

mod analyze;
mod health;
mod ingest;

pub use analyze::{analyze_routes, AnalyzeResponse};
pub use health::health_routes;
pub use ingest::{ingest_routes, ACK};
