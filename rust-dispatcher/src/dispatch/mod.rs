//! The dispatcher pass.
//!
//! One run-to-completion pass over the publish queue: every queued post is
//! attempted against every configured platform lacking a terminal status,
//! statuses update in memory, and both stores persist at the end. Pairs
//! without a usable endpoint or with a failed attempt stay queued for a
//! future run.

pub mod delivery;

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;
use crate::content;
use crate::store::{intake, DeliveryStatus, PostStatus, QueueEntry, StateStore, StoreError};
use crate::util::time::utc_timestamp;

pub use delivery::{deliver, DeliveryError};

/// Webhook request body for one (post, platform) delivery.
#[derive(Debug, Clone, Serialize)]
pub struct PublishPayload {
    pub platform: String,
    pub title: String,
    pub url: String,
    pub source: String,
    pub date: String,
    /// Plain-text excerpt of the post
    pub body: String,
}

/// A (post, platform) pair still awaiting delivery.
#[derive(Debug, Clone, Serialize)]
pub struct PendingTask {
    pub platform: String,
    pub title: String,
    pub url: String,
    /// Resolved endpoint, absent while unconfigured
    pub endpoint: Option<String>,
    pub body: String,
}

/// Counters for one dispatch pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PassSummary {
    /// Queue length at the start of the pass
    pub queued: usize,
    /// Delivery attempts made (endpoint resolved)
    pub attempted: usize,
    /// Pairs that reached delivered this pass
    pub delivered: usize,
    /// Pairs left queued: unconfigured endpoint or failed attempt
    pub deferred: usize,
    /// Queue entries removed because every platform is terminal
    pub pruned: usize,
}

/// A failed pass. Only store problems abort a run; delivery failures defer.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Run one dispatch pass against the given store.
pub async fn run_pass(
    store: &dyn StateStore,
    config: &Config,
    client: &Client,
) -> Result<PassSummary, DispatchError> {
    let (mut queue, mut status) = store.load()?;
    let now = utc_timestamp();
    let timeout = Duration::from_millis(config.request_timeout_ms);

    let seeded = intake::seed_status(&queue, &mut status.items, &config.platforms, &now);

    let mut summary = PassSummary {
        queued: queue.len(),
        ..Default::default()
    };

    info!(
        queued = queue.len(),
        tracked = status.items.len(),
        new_slots = seeded,
        platforms = config.platforms.len(),
        "dispatch_pass_starting"
    );

    for entry in &queue {
        let key = entry.url.trim();
        if key.is_empty() {
            continue;
        }

        for platform in &config.platforms {
            // The slot exists after seeding.
            let Some(slot) = status
                .items
                .get_mut(key)
                .and_then(|record| record.platforms.get_mut(&platform.name))
            else {
                continue;
            };

            if slot.status.is_terminal() {
                continue;
            }

            let Some(endpoint) = config.resolve_endpoint(platform) else {
                // Deferred, not an error: retried once the endpoint appears.
                slot.message = "endpoint not configured".to_string();
                summary.deferred += 1;
                info!(
                    platform = %platform.name,
                    url = %key,
                    "dispatch_deferred_unconfigured"
                );
                continue;
            };

            let payload = PublishPayload {
                platform: platform.name.clone(),
                title: entry.title.clone(),
                url: entry.url.clone(),
                source: entry.source.clone(),
                date: entry.date.clone(),
                body: content::build_body(&config.posts_dir, entry),
            };

            slot.last_attempt_at = now.clone();
            summary.attempted += 1;

            match deliver(client, &endpoint, platform, &payload, timeout).await {
                Ok(code) => {
                    slot.status = DeliveryStatus::Delivered;
                    slot.message = format!("delivered (HTTP {})", code);
                    summary.delivered += 1;
                }
                Err(e) => {
                    // Stays queued for the next run.
                    slot.message = e.to_string();
                    summary.deferred += 1;
                }
            }
        }
    }

    if config.platforms.is_empty() {
        warn!("no_platforms_configured");
    } else {
        let before = queue.len();
        queue.retain(|entry| {
            let key = entry.url.trim();
            if key.is_empty() {
                return false;
            }
            let Some(record) = status.items.get(key) else {
                return true;
            };
            config.platforms.iter().any(|p| {
                record
                    .platforms
                    .get(&p.name)
                    .map(|slot| !slot.status.is_terminal())
                    .unwrap_or(true)
            })
        });
        summary.pruned = before - queue.len();
    }

    status.updated_at = now;
    store.persist(&queue, &status)?;

    info!(
        attempted = summary.attempted,
        delivered = summary.delivered,
        deferred = summary.deferred,
        pruned = summary.pruned,
        "dispatch_pass_complete"
    );

    Ok(summary)
}

/// Enumerate (post, platform) pairs still awaiting delivery.
///
/// A pair with no status slot yet counts as pending.
pub fn pending_tasks(
    queue: &[QueueEntry],
    items: &BTreeMap<String, PostStatus>,
    config: &Config,
) -> Vec<PendingTask> {
    let mut tasks = Vec::new();

    for entry in queue {
        let key = entry.url.trim();
        if key.is_empty() {
            continue;
        }

        let record = items.get(key);
        let body = content::build_body(&config.posts_dir, entry);

        for platform in &config.platforms {
            let terminal = record
                .and_then(|r| r.platforms.get(&platform.name))
                .map(|slot| slot.status.is_terminal())
                .unwrap_or(false);
            if terminal {
                continue;
            }

            tasks.push(PendingTask {
                platform: platform.name.clone(),
                title: entry.title.clone(),
                url: entry.url.clone(),
                endpoint: config.resolve_endpoint(platform).map(|u| u.to_string()),
                body: body.clone(),
            });
        }
    }

    tasks
}
