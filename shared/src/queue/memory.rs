//! In-memory queue implementation.

use super::{LogQueue, QueueError};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

/// In-memory queue with Redis list semantics.
///
/// Lists are stored in a `HashMap` of `VecDeque`s protected by a `RwLock`.
/// Pushes go to the head, so [`LogQueue::range`] yields newest first.
/// Suitable for development and testing.
///
/// **Note:** Data is not persisted across restarts.
///
/// # Example
///
/// ```
/// use shared::queue::{InMemoryQueue, LogQueue};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let queue = InMemoryQueue::new();
/// queue.push("logs", b"{}".to_vec()).await.unwrap();
/// assert_eq!(queue.len("logs").await.unwrap(), 1);
/// # });
/// ```
#[derive(Debug)]
pub struct InMemoryQueue {
    lists: RwLock<HashMap<String, VecDeque<Vec<u8>>>>,
    available: AtomicBool,
}

impl InMemoryQueue {
    /// Creates a new empty in-memory queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            lists: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Creates a new in-memory queue wrapped in an Arc.
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Simulates an outage: while unavailable every operation fails with
    /// [`QueueError::Unavailable`] and nothing is stored.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), QueueError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(QueueError::Unavailable("connection refused".to_string()))
        }
    }
}

impl Default for InMemoryQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LogQueue for InMemoryQueue {
    async fn push(&self, key: &str, payload: Vec<u8>) -> Result<usize, QueueError> {
        self.check_available()?;
        let mut lists = self
            .lists
            .write()
            .map_err(|_| QueueError::Command("lock poisoned".to_string()))?;
        let list = lists.entry(key.to_string()).or_default();
        list.push_front(payload);
        Ok(list.len())
    }

    async fn range(&self, key: &str) -> Result<Vec<Vec<u8>>, QueueError> {
        self.check_available()?;
        let lists = self
            .lists
            .read()
            .map_err(|_| QueueError::Command("lock poisoned".to_string()))?;
        Ok(lists
            .get(key)
            .map(|list| list.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn len(&self, key: &str) -> Result<usize, QueueError> {
        self.check_available()?;
        let lists = self
            .lists
            .read()
            .map_err(|_| QueueError::Command("lock poisoned".to_string()))?;
        Ok(lists.get(key).map_or(0, VecDeque::len))
    }
}
