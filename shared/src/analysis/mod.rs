//! Anomaly analysis over queued log entries.
//!
//! Entries are reduced to a numeric feature vector (`metric`, `error_rate`,
//! `latency`) and scored with an isolation forest. The forest is trained
//! either on a baseline of known-normal entries or, without a baseline, on
//! the entries being analyzed.
//!
//! # Example
//!
//! ```
//! use shared::analysis::{Detector, ForestParams};
//! use shared::models::LogEntry;
//!
//! let mut entries: Vec<LogEntry> = (0..40u32)
//!     .map(|i| {
//!         LogEntry::new()
//!             .with_field("metric", 1.0 + f64::from(i % 5) / 100.0)
//!             .with_field("latency", 100)
//!     })
//!     .collect();
//! entries.push(LogEntry::new().with_field("metric", 80.0).with_field("latency", 9000));
//!
//! let anomalies = Detector::new(ForestParams::default()).detect(entries);
//! assert!(anomalies.iter().any(|e| e.get("latency") == Some(&serde_json::json!(9000))));
//! ```

pub mod features;
pub mod forest;

pub use features::{features, Sample, FEATURE_FIELDS};
pub use forest::{ForestParams, IsolationForest, ANOMALY_THRESHOLD};

use crate::models::LogEntry;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while training a detector.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The baseline file could not be read.
    #[error("Failed to read baseline file {path}: {source}")]
    Io {
        /// Path of the baseline file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The baseline file is not a JSON array of objects.
    #[error("Invalid baseline data: {0}")]
    Parse(#[from] serde_json::Error),

    /// Too few samples to train a forest.
    #[error("At least 2 samples are required to train, found {found}")]
    InsufficientSamples {
        /// Number of samples provided.
        found: usize,
    },
}

/// Flags anomalous log entries.
#[derive(Debug)]
pub struct Detector {
    baseline: Option<IsolationForest>,
    params: ForestParams,
}

impl Detector {
    /// Creates a detector without a baseline; each call to [`Detector::detect`]
    /// trains on the entries it is given.
    #[must_use]
    pub fn new(params: ForestParams) -> Self {
        Self {
            baseline: None,
            params,
        }
    }

    /// Creates a detector trained on known-normal entries.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InsufficientSamples`] if the baseline has
    /// fewer than two entries.
    pub fn with_baseline(normal: &[LogEntry], params: ForestParams) -> Result<Self, AnalysisError> {
        let samples: Vec<Sample> = normal.iter().map(features).collect();
        let forest = IsolationForest::fit(&samples, params)?;

        Ok(Self {
            baseline: Some(forest),
            params,
        })
    }

    /// Creates a detector trained on a JSON file holding an array of
    /// known-normal entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or holds fewer
    /// than two entries.
    pub fn from_baseline_file(
        path: impl AsRef<Path>,
        params: ForestParams,
    ) -> Result<Self, AnalysisError> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| AnalysisError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let normal: Vec<LogEntry> = serde_json::from_slice(&data)?;

        tracing::info!(path = %path.display(), samples = normal.len(), "Loaded anomaly baseline");
        Self::with_baseline(&normal, params)
    }

    /// Returns true if the detector was trained on a baseline.
    #[must_use]
    pub fn has_baseline(&self) -> bool {
        self.baseline.is_some()
    }

    /// Returns the entries predicted anomalous, in input order.
    ///
    /// Without a baseline, fewer than two entries yield no anomalies.
    #[must_use]
    pub fn detect(&self, entries: Vec<LogEntry>) -> Vec<LogEntry> {
        let samples: Vec<Sample> = entries.iter().map(features).collect();

        let fitted;
        let forest = if let Some(forest) = &self.baseline {
            forest
        } else {
            match IsolationForest::fit(&samples, self.params) {
                Ok(forest) => {
                    fitted = forest;
                    &fitted
                }
                Err(e) => {
                    tracing::debug!(error = %e, "Skipping anomaly detection");
                    return Vec::new();
                }
            }
        };

        entries
            .into_iter()
            .zip(&samples)
            .filter(|(_, sample)| forest.is_anomaly(sample))
            .map(|(entry, _)| entry)
            .collect()
    }
}

impl Default for Detector {
    fn default() -> Self {
        Self::new(ForestParams::default())
    }
}
