//! In-memory state store, substituted for the flat files in tests.

use std::sync::Mutex;

use super::types::{QueueEntry, StatusBook};
use super::{StateStore, StoreError};

/// Mutex-guarded in-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<(Vec<QueueEntry>, StatusBook)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with an initial queue and status book.
    pub fn with_state(queue: Vec<QueueEntry>, status: StatusBook) -> Self {
        Self {
            state: Mutex::new((queue, status)),
        }
    }

    /// Current contents, for assertions.
    pub fn snapshot(&self) -> (Vec<QueueEntry>, StatusBook) {
        self.state.lock().expect("state lock poisoned").clone()
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<(Vec<QueueEntry>, StatusBook), StoreError> {
        Ok(self.snapshot())
    }

    fn persist(&self, queue: &[QueueEntry], status: &StatusBook) -> Result<(), StoreError> {
        let mut state = self.state.lock().expect("state lock poisoned");
        *state = (queue.to_vec(), status.clone());
        Ok(())
    }
}
