//! CrossPost Enqueue - queue intake for newly published posts.
//!
//! Reads a JSON array of post entries, merges them into the publish queue
//! by URL, and seeds queued status slots for every configured platform so
//! the next dispatcher pass picks the posts up.

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crosspost::store::intake;
use crosspost::util::time::utc_timestamp;
use crosspost::{Config, JsonFileStore, QueueEntry, StateStore};

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    let Some(path) = std::env::args().nth(1) else {
        bail!("usage: crosspost-enqueue <new-posts.json>");
    };

    let config = Config::from_env();
    let store = JsonFileStore::new(config.state_dir.clone());

    let raw =
        std::fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path))?;
    let incoming: Vec<QueueEntry> =
        serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path))?;

    let (queue, mut status) = store.load()?;
    let now = utc_timestamp();

    let incoming_count = incoming.len();
    let queue = intake::merge_queue(queue, incoming, &now);
    let seeded = intake::seed_status(&queue, &mut status.items, &config.platforms, &now);
    status.updated_at = now;

    store.persist(&queue, &status)?;

    info!(
        incoming = incoming_count,
        queued = queue.len(),
        new_slots = seeded,
        "enqueue_complete"
    );

    Ok(())
}
