//! CrossPost - publish webhook distribution system.
//!
//! This library provides shared modules for the three CrossPost binaries:
//! - `crosspost-dispatcher`: Batch dispatcher that delivers queued posts
//! - `crosspost-enqueue`: Queue intake for newly published posts
//! - `crosspost-pending`: Report of pairs still awaiting delivery
//!
//! ## Architecture
//!
//! ```text
//! publish_queue.json ─┐
//!                     ├─→ Dispatcher pass ─→ platform webhooks
//! publish_status.json ┘          ↓
//!                        both stores written back
//! ```

pub mod config;
pub mod content;
pub mod dispatch;
pub mod store;
pub mod util;
pub mod webhook;

// Re-export commonly used types
pub use config::{Config, PlatformConfig};
pub use dispatch::{pending_tasks, run_pass, PassSummary, PendingTask, PublishPayload};
pub use store::{
    DeliveryStatus, JsonFileStore, MemoryStore, PlatformState, PostStatus, QueueEntry,
    StateStore, StatusBook, StoreError,
};
