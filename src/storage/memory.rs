//! In-memory snapshot store.
//!
//! Holds the same encoded bytes the file store would write, so byte-level
//! behaviour can be checked without touching disk.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::ComplaintRecord;
use crate::storage::{SnapshotLoad, SnapshotStore, encode};

const LOCATION: &str = "memory";

#[derive(Debug, Default)]
pub struct MemoryStore {
    bytes: Mutex<Option<Vec<u8>>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from raw persisted bytes, valid or not.
    pub fn with_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: Mutex::new(Some(bytes.into())),
            writes: AtomicUsize::new(0),
        }
    }

    /// Current persisted bytes, if any.
    pub fn bytes(&self) -> Option<Vec<u8>> {
        self.bytes.lock().ok().and_then(|guard| (*guard).clone())
    }

    /// Number of successful saves.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn load(&self) -> SnapshotLoad {
        match self.bytes.lock() {
            Ok(guard) => match guard.as_deref() {
                Some(bytes) => SnapshotLoad::decode(LOCATION, bytes),
                None => SnapshotLoad::Missing,
            },
            Err(e) => SnapshotLoad::Corrupt(AppError::corrupt(LOCATION, e)),
        }
    }

    async fn save(&self, records: &[ComplaintRecord]) -> Result<()> {
        let encoded = encode(records)?;
        let mut bytes = self
            .bytes
            .lock()
            .map_err(|e| AppError::persist(LOCATION, e))?;
        *bytes = Some(encoded);
        drop(bytes);

        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        LOCATION.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_store_is_missing() {
        let store = MemoryStore::new();
        assert!(matches!(store.load().await, SnapshotLoad::Missing));
        assert!(store.bytes().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let store = MemoryStore::new();
        let records = vec![ComplaintRecord::new("Noise", "10001")];

        store.save(&records).await.unwrap();

        assert_eq!(store.load().await.into_snapshot().records(), &records[..]);
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_seeded_garbage_is_corrupt() {
        let store = MemoryStore::with_bytes("<html>oops</html>");
        assert!(store.load().await.is_corrupt());
    }

    #[tokio::test]
    async fn test_write_count_tracks_every_save() {
        let store = MemoryStore::with_bytes("[]");
        assert_eq!(store.write_count(), 0);

        for zip in ["10001", "10002", "10003"] {
            store.save(&[ComplaintRecord::new("Noise", zip)]).await.unwrap();
        }

        assert_eq!(store.write_count(), 3);
        assert_eq!(
            store.load().await.into_snapshot().records(),
            &[ComplaintRecord::new("Noise", "10003")]
        );
    }
}
