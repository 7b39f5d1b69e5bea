//! Data models for Logsink.
//!
//! This module contains the log entry carried from the ingestion endpoint to the queue.

pub mod log;

pub use log::{LogDecodeError, LogEntry};
