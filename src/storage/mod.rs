//! Storage abstractions for snapshot persistence.
//!
//! Only the most recent snapshot is kept. Each save replaces the previous
//! state completely; nothing is merged or appended.
//!
//! ## Layout
//!
//! ```text
//! {config_dir}/
//! ├── config.toml
//! └── data.json      # [{"category": "...", "zip": "..."}, ...]
//! ```

pub mod local;
pub mod memory;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::{ComplaintRecord, Snapshot};

// Re-export for convenience
pub use local::LocalStore;
pub use memory::MemoryStore;

/// Result of reading the persisted snapshot.
#[derive(Debug)]
pub enum SnapshotLoad {
    /// Nothing persisted yet
    Missing,
    /// Snapshot decoded successfully
    Loaded(Snapshot),
    /// Persisted data exists but could not be read or decoded
    Corrupt(AppError),
}

impl SnapshotLoad {
    /// The snapshot to diff against; empty unless one was loaded.
    pub fn into_snapshot(self) -> Snapshot {
        match self {
            Self::Loaded(snapshot) => snapshot,
            Self::Missing | Self::Corrupt(_) => Snapshot::empty(),
        }
    }

    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt(_))
    }

    /// Decode raw persisted bytes.
    pub(crate) fn decode(location: &str, bytes: &[u8]) -> Self {
        match serde_json::from_slice::<Snapshot>(bytes) {
            Ok(snapshot) => Self::Loaded(snapshot),
            Err(e) => Self::Corrupt(AppError::corrupt(location, e)),
        }
    }
}

/// Encode records in the persisted format.
pub(crate) fn encode(records: &[ComplaintRecord]) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(records)?)
}

/// Trait for snapshot storage backends.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Read the last persisted snapshot. Never fails; see [`SnapshotLoad`].
    async fn load(&self) -> SnapshotLoad;

    /// Replace the persisted snapshot with exactly `records`.
    async fn save(&self, records: &[ComplaintRecord]) -> Result<()>;

    /// Human-readable location for log messages.
    fn describe(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_valid() {
        let load = SnapshotLoad::decode("mem", br#"[{"category":"Noise","zip":"10001"}]"#);
        let snapshot = load.into_snapshot();
        assert_eq!(snapshot.records(), &[ComplaintRecord::new("Noise", "10001")]);
    }

    #[test]
    fn test_decode_corrupt_is_empty() {
        let load = SnapshotLoad::decode("mem", b"{ not json");
        assert!(load.is_corrupt());
        assert!(load.into_snapshot().is_empty());
    }

    #[test]
    fn test_decode_wrong_shape_is_corrupt() {
        let load = SnapshotLoad::decode("mem", br#"{"category":"Noise","zip":"10001"}"#);
        assert!(load.is_corrupt());
    }

    #[test]
    fn test_encode_is_pretty_array() {
        let bytes = encode(&[ComplaintRecord::new("Noise", "10001")]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with('['));
        assert!(text.contains("\"category\": \"Noise\""));
        assert!(text.contains("\"zip\": \"10001\""));
    }
}
