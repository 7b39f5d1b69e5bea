//! Application state module.
//!
//! Defines the shared application state that is passed to route handlers.
//! The queue client is built once at startup and injected here; handlers
//! never reach for process-wide globals.

use crate::config::Config;
use anyhow::{Context, Result};
use shared::analysis::{Detector, ForestParams};
use shared::queue::{InMemoryQueue, LogQueue, RedisQueue, DEFAULT_QUEUE_KEY};
use std::sync::Arc;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The queue collaborator entries are pushed to.
    queue: Arc<dyn LogQueue>,
    /// List key entries are pushed under.
    queue_key: Arc<str>,
    /// Anomaly detector used by the analysis endpoint.
    detector: Arc<Detector>,
    /// Largest accepted request body in bytes.
    body_limit: usize,
}

impl AppState {
    /// Creates a new application state around the given queue, using the
    /// default queue key, body limit and an unbaselined detector.
    #[must_use]
    pub fn new(queue: Arc<dyn LogQueue>) -> Self {
        let defaults = Config::default();
        Self {
            queue,
            queue_key: Arc::from(DEFAULT_QUEUE_KEY),
            detector: Arc::new(Detector::default()),
            body_limit: defaults.max_body_bytes,
        }
    }

    /// Creates a new application state with an in-memory queue.
    ///
    /// This is useful for development and testing.
    #[must_use]
    pub fn with_in_memory_queue() -> Self {
        Self::new(InMemoryQueue::new_shared())
    }

    /// Builds the production state described by `config`: a Redis queue and,
    /// if configured, a detector trained on the baseline file.
    ///
    /// # Errors
    ///
    /// Returns an error if the Redis URL is invalid or the baseline cannot be loaded.
    pub fn from_config(config: &Config) -> Result<Self> {
        let queue = RedisQueue::open(&config.redis_url, config.queue_timeout)
            .context("Failed to create Redis queue client")?;

        let detector = match &config.baseline_path {
            Some(path) => Detector::from_baseline_file(path, ForestParams::default())
                .context("Failed to load anomaly baseline")?,
            None => Detector::default(),
        };

        Ok(Self::new(Arc::new(queue))
            .with_queue_key(config.queue_key.as_str())
            .with_detector(detector)
            .with_body_limit(config.max_body_bytes))
    }

    /// Sets the list key entries are pushed under.
    #[must_use]
    pub fn with_queue_key(mut self, key: impl Into<Arc<str>>) -> Self {
        self.queue_key = key.into();
        self
    }

    /// Sets the anomaly detector.
    #[must_use]
    pub fn with_detector(mut self, detector: Detector) -> Self {
        self.detector = Arc::new(detector);
        self
    }

    /// Sets the largest accepted request body.
    #[must_use]
    pub fn with_body_limit(mut self, bytes: usize) -> Self {
        self.body_limit = bytes;
        self
    }

    /// Returns a reference to the queue.
    #[must_use]
    pub fn queue(&self) -> &dyn LogQueue {
        self.queue.as_ref()
    }

    /// Returns the list key entries are pushed under.
    #[must_use]
    pub fn queue_key(&self) -> &str {
        &self.queue_key
    }

    /// Returns a shared handle to the anomaly detector.
    #[must_use]
    pub fn detector(&self) -> Arc<Detector> {
        Arc::clone(&self.detector)
    }

    /// Returns the largest accepted request body in bytes.
    #[must_use]
    pub fn body_limit(&self) -> usize {
        self.body_limit
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_in_memory_queue()
    }
}
