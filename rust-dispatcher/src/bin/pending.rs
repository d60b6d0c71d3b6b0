//! CrossPost Pending - report of (post, platform) pairs awaiting delivery.
//!
//! Prints pending tasks as JSON on stdout. Logs go to stderr so the output
//! stays machine-readable.

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crosspost::{pending_tasks, Config, JsonFileStore, StateStore};

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .json()
                .flatten_event(true)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = Config::from_env();
    let store = JsonFileStore::new(config.state_dir.clone());

    let (queue, status) = store.load()?;
    let tasks = pending_tasks(&queue, &status.items, &config);

    info!(pending = tasks.len(), "pending_report");

    let out = serde_json::to_string_pretty(&tasks).context("Failed to serialize report")?;
    println!("{}", out);

    Ok(())
}
