//! Queue collaborator traits and implementations.
//!
//! The ingestion endpoint appends serialized log entries to an external,
//! ordered, append-only list. The `LogQueue` trait defines that contract so
//! different backends (Redis, in-memory) can be swapped in.

pub mod memory;
pub mod redis_queue;

pub use memory::InMemoryQueue;
pub use redis_queue::RedisQueue;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Default list key log entries are pushed under.
pub const DEFAULT_QUEUE_KEY: &str = "logs";

/// Errors that can occur during queue operations.
#[derive(Debug, Error)]
pub enum QueueError {
    /// The queue service could not be reached (refused, dropped, I/O failure).
    #[error("Queue unavailable: {0}")]
    Unavailable(String),

    /// The operation did not complete within the configured deadline.
    #[error("Queue operation timed out after {0:?}")]
    Timeout(Duration),

    /// The queue service rejected or failed the command.
    #[error("Queue command failed: {0}")]
    Command(String),
}

/// Trait for queue implementations.
///
/// Implementations must be safe to share between concurrent request
/// handlers; callers do not add their own locking.
#[async_trait]
pub trait LogQueue: Send + Sync {
    /// Appends one payload to the head of the list under `key`.
    ///
    /// Returns the length of the list after the append.
    ///
    /// # Errors
    ///
    /// Returns an error if the append was not confirmed.
    async fn push(&self, key: &str, payload: Vec<u8>) -> Result<usize, QueueError>;

    /// Returns every payload under `key`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be read.
    async fn range(&self, key: &str) -> Result<Vec<Vec<u8>>, QueueError>;

    /// Returns the number of payloads under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the queue cannot be reached.
    async fn len(&self, key: &str) -> Result<usize, QueueError>;
}
