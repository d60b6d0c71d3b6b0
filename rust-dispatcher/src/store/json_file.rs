//! Flat-file JSON implementation of the state store.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use super::types::{QueueEntry, StatusBook, QUEUE_FILE, STATUS_FILE};
use super::{StateStore, StoreError};

/// State store backed by `publish_queue.json` and `publish_status.json`
/// inside a state directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the queue store file.
    pub fn queue_path(&self) -> PathBuf {
        self.dir.join(QUEUE_FILE)
    }

    /// Path of the status store file.
    pub fn status_path(&self) -> PathBuf {
        self.dir.join(STATUS_FILE)
    }
}

/// Read a JSON file, treating a missing file as the default value and a
/// malformed file as a fatal error.
fn read_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T, StoreError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
        Err(e) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };

    serde_json::from_str(&raw).map_err(|e| StoreError::Malformed {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write pretty JSON via a temp file and rename so a crashed run never
/// leaves a half-written store behind.
fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let body = serde_json::to_string_pretty(value).map_err(|e| StoreError::Malformed {
        path: path.to_path_buf(),
        source: e,
    })?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, body.as_bytes())
        .and_then(|_| fs::rename(&tmp, path))
        .map_err(|e| StoreError::Io {
            path: path.to_path_buf(),
            source: e,
        })
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<(Vec<QueueEntry>, StatusBook), StoreError> {
        let queue: Vec<QueueEntry> = read_json(&self.queue_path())?;
        let status: StatusBook = read_json(&self.status_path())?;
        Ok((queue, status))
    }

    fn persist(&self, queue: &[QueueEntry], status: &StatusBook) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| StoreError::Io {
            path: self.dir.clone(),
            source: e,
        })?;

        write_json(&self.queue_path(), &queue)?;
        write_json(&self.status_path(), status)?;

        info!(
            queue_path = %self.queue_path().display(),
            status_path = %self.status_path().display(),
            queued = queue.len(),
            tracked = status.items.len(),
            "state_persisted"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::types::{DeliveryStatus, PlatformState, PostStatus};
    use super::*;

    fn temp_store(tag: &str) -> JsonFileStore {
        let dir = std::env::temp_dir().join(format!(
            "crosspost-store-{}-{}",
            tag,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        JsonFileStore::new(dir)
    }

    fn sample_state() -> (Vec<QueueEntry>, StatusBook) {
        let entry = QueueEntry {
            title: "A Post".to_string(),
            url: "https://example.test/posts/a/".to_string(),
            source: "weekly".to_string(),
            date: "2024-05-01".to_string(),
            file: "2024-05-01-a.md".to_string(),
            queued_at: "2024-05-01T10:00:00Z".to_string(),
        };

        let mut record = PostStatus::from_entry(&entry, "2024-05-01T10:00:00Z");
        record.platforms.insert(
            "baijiahao".to_string(),
            PlatformState {
                status: DeliveryStatus::Delivered,
                last_attempt_at: "2024-05-01T11:00:00Z".to_string(),
                message: "delivered (HTTP 200)".to_string(),
            },
        );
        record
            .platforms
            .insert("toutiao".to_string(), PlatformState::queued("awaiting first delivery attempt"));

        let mut status = StatusBook::default();
        status.items.insert(entry.url.clone(), record);
        status.updated_at = "2024-05-01T11:00:00Z".to_string();

        (vec![entry], status)
    }

    #[test]
    fn test_load_missing_files_defaults() {
        let store = temp_store("missing");
        let (queue, status) = store.load().unwrap();
        assert!(queue.is_empty());
        assert_eq!(status, StatusBook::default());
    }

    #[test]
    fn test_round_trip() {
        let store = temp_store("roundtrip");
        let (queue, status) = sample_state();

        store.persist(&queue, &status).unwrap();
        let (loaded_queue, loaded_status) = store.load().unwrap();

        assert_eq!(loaded_queue, queue);
        assert_eq!(loaded_status, status);
    }

    #[test]
    fn test_persist_overwrites() {
        let store = temp_store("overwrite");
        let (queue, status) = sample_state();

        store.persist(&queue, &status).unwrap();
        store.persist(&[], &StatusBook::default()).unwrap();

        let (loaded_queue, loaded_status) = store.load().unwrap();
        assert!(loaded_queue.is_empty());
        assert_eq!(loaded_status, StatusBook::default());
    }

    #[test]
    fn test_malformed_queue_is_fatal() {
        let store = temp_store("malformed");
        fs::create_dir_all(store.queue_path().parent().unwrap()).unwrap();
        fs::write(store.queue_path(), "not json").unwrap();

        match store.load() {
            Err(StoreError::Malformed { path, .. }) => {
                assert_eq!(path, store.queue_path());
            }
            other => panic!("expected malformed error, got {:?}", other.map(|_| ())),
        }
    }
}
