//! On-disk data model for the two state stores.
//!
//! This module defines the shapes of:
//! - `publish_queue.json`: array of posts awaiting distribution
//! - `publish_status.json`: per-post, per-platform delivery status

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// File name of the queue store inside the state directory.
pub const QUEUE_FILE: &str = "publish_queue.json";

/// File name of the status store inside the state directory.
pub const STATUS_FILE: &str = "publish_status.json";

// =============================================================================
// Queue store (publish_queue.json)
// =============================================================================

/// A post awaiting distribution. The URL is the unique key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    /// Post title
    #[serde(default)]
    pub title: String,

    /// Canonical post URL
    pub url: String,

    /// Originating feed or section label
    #[serde(default)]
    pub source: String,

    /// Publish date (YYYY-MM-DD), used for queue ordering
    #[serde(default)]
    pub date: String,

    /// Markdown file name under the posts directory
    #[serde(default)]
    pub file: String,

    /// When the entry entered the queue
    #[serde(default)]
    pub queued_at: String,
}

// =============================================================================
// Status store (publish_status.json)
// =============================================================================

/// Delivery status of one (post, platform) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    /// Awaiting delivery, or deferred after a failed attempt
    Queued,
    /// Successfully delivered to the platform webhook
    Delivered,
    /// Permanently failed; never re-attempted
    Failed,
}

impl DeliveryStatus {
    /// Terminal pairs are never re-attempted.
    pub fn is_terminal(self) -> bool {
        matches!(self, DeliveryStatus::Delivered | DeliveryStatus::Failed)
    }
}

/// Per-platform slot inside a post's status record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformState {
    pub status: DeliveryStatus,

    /// Timestamp of the most recent delivery attempt, empty before the first
    #[serde(default)]
    pub last_attempt_at: String,

    /// Human-readable note about the last attempt or deferral
    #[serde(default)]
    pub message: String,
}

impl PlatformState {
    /// Fresh slot for a pair that has not been attempted yet.
    pub fn queued(message: impl Into<String>) -> Self {
        Self {
            status: DeliveryStatus::Queued,
            last_attempt_at: String::new(),
            message: message.into(),
        }
    }
}

/// Delivery record for one post across all platforms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostStatus {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub source: String,

    #[serde(default)]
    pub date: String,

    #[serde(default)]
    pub file: String,

    /// Platform name -> delivery slot
    #[serde(default)]
    pub platforms: BTreeMap<String, PlatformState>,

    #[serde(default)]
    pub created_at: String,
}

impl PostStatus {
    /// Record skeleton for a queue entry seen for the first time.
    pub fn from_entry(entry: &QueueEntry, now: &str) -> Self {
        Self {
            title: entry.title.clone(),
            source: entry.source.clone(),
            date: entry.date.clone(),
            file: entry.file.clone(),
            platforms: BTreeMap::new(),
            created_at: now.to_string(),
        }
    }
}

/// On-disk shape of `publish_status.json`.
///
/// Maps are ordered so the file serializes deterministically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBook {
    /// Post URL -> per-platform status record
    #[serde(default)]
    pub items: BTreeMap<String, PostStatus>,

    /// Timestamp of the last persisted pass
    #[serde(default)]
    pub updated_at: String,
}
