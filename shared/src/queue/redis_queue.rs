//! Redis-backed queue implementation.

use super::{LogQueue, QueueError};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, RedisError};
use std::future::Future;
use std::time::Duration;
use tokio::sync::OnceCell;

/// Default deadline for a single Redis operation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

impl From<RedisError> for QueueError {
    fn from(err: RedisError) -> Self {
        if err.is_io_error()
            || err.is_timeout()
            || err.is_connection_refusal()
            || err.is_connection_dropped()
        {
            Self::Unavailable(err.to_string())
        } else {
            Self::Command(err.to_string())
        }
    }
}

/// Redis list backed queue for production use.
///
/// The connection is established lazily on first use, so the server can
/// start while Redis is still coming up. The underlying `ConnectionManager`
/// multiplexes concurrent commands over one connection and reconnects after
/// failures. Every operation, including connecting, is bounded by the
/// configured timeout.
pub struct RedisQueue {
    client: redis::Client,
    connection: OnceCell<ConnectionManager>,
    timeout: Duration,
}

impl RedisQueue {
    /// Creates a new Redis queue for the given URL (e.g. `redis://redis:6379`).
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Command`] if the URL cannot be parsed.
    pub fn open(url: &str, timeout: Duration) -> Result<Self, QueueError> {
        let client = redis::Client::open(url)
            .map_err(|e| QueueError::Command(format!("invalid Redis URL: {e}")))?;

        Ok(Self {
            client,
            connection: OnceCell::new(),
            timeout,
        })
    }

    /// Returns the per-operation deadline.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn connection(&self) -> Result<ConnectionManager, QueueError> {
        let manager = self
            .connection
            .get_or_try_init(|| async {
                tracing::debug!("Connecting to Redis");
                ConnectionManager::new(self.client.clone()).await
            })
            .await?;
        Ok(manager.clone())
    }

    /// Runs `op` against a connection, bounded by the configured timeout.
    async fn bounded<T, F, Fut>(&self, op: F) -> Result<T, QueueError>
    where
        F: FnOnce(ConnectionManager) -> Fut,
        Fut: Future<Output = Result<T, RedisError>>,
    {
        let run = async {
            let conn = self.connection().await?;
            op(conn).await.map_err(QueueError::from)
        };

        tokio::time::timeout(self.timeout, run)
            .await
            .map_err(|_| QueueError::Timeout(self.timeout))?
    }
}

impl std::fmt::Debug for RedisQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisQueue")
            .field("addr", &self.client.get_connection_info().addr)
            .field("connected", &self.connection.initialized())
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[async_trait]
impl LogQueue for RedisQueue {
    async fn push(&self, key: &str, payload: Vec<u8>) -> Result<usize, QueueError> {
        self.bounded(|mut conn| async move { conn.lpush::<_, _, usize>(key, payload).await })
            .await
    }

    async fn range(&self, key: &str) -> Result<Vec<Vec<u8>>, QueueError> {
        self.bounded(|mut conn| async move { conn.lrange::<_, Vec<Vec<u8>>>(key, 0, -1).await })
            .await
    }

    async fn len(&self, key: &str) -> Result<usize, QueueError> {
        self.bounded(|mut conn| async move { conn.llen::<_, usize>(key).await })
            .await
    }
}
