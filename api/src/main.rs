//! Logsink API Server Binary
//!
//! Entry point for the Logsink ingestion server.

#![deny(unsafe_code)]

use anyhow::{Context, Result};
use api::{init_tracing, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; the environment may already be set.
    let dotenv = dotenvy::dotenv();

    let config = Config::from_env().context("Invalid configuration")?;
    init_tracing(config.log_format);

    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "Loaded environment file");
    }

    api::run_server_with_config(config).await
}
