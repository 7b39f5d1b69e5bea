//! Logsink Shared Library
//!
//! This crate contains the types shared by the Logsink ingestion server and
//! its tooling.
//!
//! # Modules
//!
//! - [`models`] - The opaque JSON log entry
//! - [`queue`] - The queue collaborator trait with Redis and in-memory backends
//! - [`analysis`] - Isolation forest anomaly detection over queued entries
//!
//! # Example
//!
//! ```
//! use shared::models::LogEntry;
//!
//! let entry = LogEntry::from_slice(br#"{"level":"error","msg":"disk full"}"#).unwrap();
//! assert_eq!(entry.len(), 2);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod analysis;
pub mod models;
pub mod queue;

/// Re-export common dependencies for convenience.
pub use serde;
pub use serde_json;
