//! Queue intake: merging newly published posts and seeding status slots.

use std::collections::BTreeMap;

use tracing::info;

use crate::config::PlatformConfig;

use super::types::{PlatformState, PostStatus, QueueEntry};

/// Message recorded on a freshly seeded platform slot.
const SEED_MESSAGE: &str = "awaiting first delivery attempt";

/// Merge newly published posts into the queue.
///
/// Entries are keyed by URL (an incoming entry replaces an existing one),
/// new entries are stamped with `queued_at`, and the result is ordered
/// newest first by (date, url). Entries without a URL are dropped.
pub fn merge_queue(
    current: Vec<QueueEntry>,
    incoming: Vec<QueueEntry>,
    now: &str,
) -> Vec<QueueEntry> {
    let mut by_url: BTreeMap<String, QueueEntry> = BTreeMap::new();

    for entry in current {
        let url = entry.url.trim().to_string();
        if url.is_empty() {
            continue;
        }
        by_url.insert(url, entry);
    }

    let mut added = 0;
    for mut entry in incoming {
        let url = entry.url.trim().to_string();
        if url.is_empty() {
            continue;
        }
        if entry.queued_at.is_empty() {
            entry.queued_at = now.to_string();
        }
        entry.url = url.clone();
        if by_url.insert(url, entry).is_none() {
            added += 1;
        }
    }

    let mut queue: Vec<QueueEntry> = by_url.into_values().collect();
    queue.sort_by(|a, b| {
        (b.date.as_str(), b.url.as_str()).cmp(&(a.date.as_str(), a.url.as_str()))
    });

    info!(queued = queue.len(), added = added, "queue_merged");
    queue
}

/// Ensure a status record and a queued platform slot exist for every queued
/// post. Existing slots are left untouched. Returns the number of slots
/// created.
pub fn seed_status(
    queue: &[QueueEntry],
    items: &mut BTreeMap<String, PostStatus>,
    platforms: &[PlatformConfig],
    now: &str,
) -> usize {
    let mut created = 0;

    for entry in queue {
        let url = entry.url.trim();
        if url.is_empty() {
            continue;
        }

        let record = items
            .entry(url.to_string())
            .or_insert_with(|| PostStatus::from_entry(entry, now));

        for platform in platforms {
            if !record.platforms.contains_key(&platform.name) {
                record
                    .platforms
                    .insert(platform.name.clone(), PlatformState::queued(SEED_MESSAGE));
                created += 1;
            }
        }
    }

    created
}
