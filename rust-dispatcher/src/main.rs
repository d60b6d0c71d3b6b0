//! CrossPost Dispatcher - batch webhook delivery for queued posts.
//!
//! Loads the publish queue and status stores, attempts delivery for every
//! (queued post, platform) pair without a terminal status, and writes both
//! stores back. Invoked periodically by an external scheduler; undeliverable
//! pairs stay queued for the next run.

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crosspost::{dispatch, Config, JsonFileStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("dispatcher_starting");

    // Load configuration from environment
    let config = Config::from_env();
    info!(
        state_dir = %config.state_dir.display(),
        posts_dir = %config.posts_dir.display(),
        base_url_set = config.base_url.is_some(),
        platforms = config.platforms.len(),
        request_timeout_ms = config.request_timeout_ms,
        "config_loaded"
    );

    let client = Client::builder()
        .build()
        .context("Failed to create HTTP client")?;

    let store = JsonFileStore::new(config.state_dir.clone());

    let summary = dispatch::run_pass(&store, &config, &client).await?;

    info!(
        queued = summary.queued,
        attempted = summary.attempted,
        delivered = summary.delivered,
        deferred = summary.deferred,
        pruned = summary.pruned,
        "dispatcher_complete"
    );

    Ok(())
}
