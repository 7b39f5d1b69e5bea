//! Logsink CLI
//!
//! Command-line client for the Logsink ingestion server.
//!
//! # Usage
//!
//! ```bash
//! logsink --help
//! logsink health
//! logsink send '{"level":"error","msg":"disk full"}'
//! tail -n1 app.jsonl | logsink send
//! logsink analyze
//! ```

#![deny(unsafe_code)]

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::time::Duration;

/// Logsink CLI - send log entries and inspect the ingestion server
#[derive(Parser)]
#[command(name = "logsink")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// API server URL
    #[arg(
        short,
        long,
        env = "LOGSINK_API_URL",
        default_value = "http://localhost:8080"
    )]
    api_url: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check API server health
    Health,
    /// Send one JSON log entry (reads stdin when no argument is given)
    Send {
        /// The JSON object to ingest
        entry: Option<String>,
    },
    /// List queued entries flagged as anomalous
    Analyze,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(cli.timeout))
        .build()
        .context("Failed to build HTTP client")?;
    let base = cli.api_url.trim_end_matches('/');

    match cli.command {
        Some(Commands::Health) => {
            let response = client
                .get(format!("{base}/health"))
                .send()
                .await
                .with_context(|| format!("Failed to reach Logsink API at {base}"))?;
            let status = response.status();
            let body: serde_json::Value = response.json().await.unwrap_or_default();
            if !status.is_success() {
                bail!("Health check failed with status {status}");
            }
            println!(
                "{} ({} {})",
                body["status"].as_str().unwrap_or("unknown"),
                body["service"].as_str().unwrap_or("logsink-api"),
                body["version"].as_str().unwrap_or("?"),
            );
        }
        Some(Commands::Send { entry }) => {
            let payload = match entry {
                Some(entry) => entry,
                None => read_stdin()?,
            };
            let response = client
                .post(format!("{base}/ingest"))
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(payload)
                .send()
                .await
                .with_context(|| format!("Failed to reach Logsink API at {base}"))?;
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            if !status.is_success() {
                bail!("Ingest rejected with status {status}: {}", text.trim());
            }
            println!("{text}");
        }
        Some(Commands::Analyze) => {
            let response = client
                .get(format!("{base}/analyze"))
                .send()
                .await
                .with_context(|| format!("Failed to reach Logsink API at {base}"))?;
            let status = response.status();
            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                bail!("Analysis failed with status {status}: {}", text.trim());
            }
            let body: serde_json::Value = response
                .json()
                .await
                .context("Invalid analysis response")?;
            let anomalies = body["anomalies"].as_array().cloned().unwrap_or_default();
            println!(
                "{} anomalous of {} entries",
                anomalies.len(),
                body["total"].as_u64().unwrap_or(0)
            );
            for anomaly in anomalies {
                println!("{}", serde_json::to_string_pretty(&anomaly)?);
            }
        }
        None => {
            println!("Logsink CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read entry from stdin")?;
    if buffer.trim().is_empty() {
        bail!("No log entry given on the command line or stdin");
    }
    Ok(buffer)
}
