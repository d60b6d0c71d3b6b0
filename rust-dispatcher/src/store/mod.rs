//! State stores for the publish queue and status book.
//!
//! Persistence sits behind the small `StateStore` trait so the dispatch pass
//! can run against flat JSON files in production and an in-memory store in
//! tests. Each run loads both stores, mutates them in memory, and writes
//! them back at the end.

mod json_file;
mod memory;
mod types;

pub mod intake;

use std::path::PathBuf;

use thiserror::Error;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use types::{
    DeliveryStatus, PlatformState, PostStatus, QueueEntry, StatusBook, QUEUE_FILE, STATUS_FILE,
};

/// Errors from loading or persisting the state files.
///
/// A malformed store file is fatal to the run; a missing file is not (it
/// loads as an empty store).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed state file {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Storage interface for the two stores.
pub trait StateStore: Send + Sync {
    /// Load the queue and status book. Missing backing files load as empty.
    fn load(&self) -> Result<(Vec<QueueEntry>, StatusBook), StoreError>;

    /// Persist both stores, replacing previous contents.
    fn persist(&self, queue: &[QueueEntry], status: &StatusBook) -> Result<(), StoreError>;
}
