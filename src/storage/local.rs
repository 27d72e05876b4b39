//! Local filesystem snapshot store.
//!
//! The snapshot lives in a single JSON file. Saves go through a temporary
//! sibling file and a rename, so readers never see a half-written snapshot.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::ComplaintRecord;
use crate::storage::{SnapshotLoad, SnapshotStore, encode};

/// File-backed snapshot store.
#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
}

impl LocalStore {
    /// Create a store persisting to the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        self.ensure_dir().await?;

        let tmp = self.path.with_extension("tmp");
        let written = async {
            let mut file = tokio::fs::File::create(&tmp).await?;
            file.write_all(bytes).await?;
            file.flush().await?;
            file.sync_all().await?;
            drop(file);
            tokio::fs::rename(&tmp, &self.path).await
        }
        .await;

        // No partial temp file may outlive a failed write.
        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(AppError::Io(e));
        }
        Ok(())
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[async_trait]
impl SnapshotStore for LocalStore {
    async fn load(&self) -> SnapshotLoad {
        match self.read_bytes().await {
            Ok(Some(bytes)) => SnapshotLoad::decode(&self.describe(), &bytes),
            Ok(None) => {
                log::debug!("No snapshot at {}", self.path.display());
                SnapshotLoad::Missing
            }
            Err(e) => SnapshotLoad::Corrupt(AppError::corrupt(self.describe(), e)),
        }
    }

    async fn save(&self, records: &[ComplaintRecord]) -> Result<()> {
        let bytes = encode(records)?;
        self.write_bytes(&bytes)
            .await
            .map_err(|e| AppError::persist(self.describe(), e))?;
        log::debug!(
            "Snapshot with {} records written to {}",
            records.len(),
            self.path.display()
        );
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
