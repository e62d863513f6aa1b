//! JSON Lines Store
//!
//! Key-value style backend: every record is written as one JSON object per
//! line, keyed by its `id`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

use super::{StoreError, WaitlistStore};
use crate::waitlist::WaitlistRecord;

/// Append-only JSON lines file
#[derive(Debug)]
pub struct JsonLinesStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonLinesStore {
    /// Open the store, creating the directory and an empty file if needed
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file cannot be created.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;

        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    /// Path of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Look up a record by id
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`] if a line is not a record.
    pub async fn get(&self, id: &str) -> Result<Option<WaitlistRecord>, StoreError> {
        Ok(self.records().await?.into_iter().find(|r| r.id == id))
    }

    /// All stored records in insertion order
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`] if a line is not a record.
    pub async fn records(&self) -> Result<Vec<WaitlistRecord>, StoreError> {
        let contents = fs::read_to_string(&self.path).await?;
        contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(StoreError::from))
            .collect()
    }
}

#[async_trait]
impl WaitlistStore for JsonLinesStore {
    fn name(&self) -> &str {
        "jsonl"
    }

    async fn append(&self, record: &WaitlistRecord) -> Result<(), StoreError> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        let mut file = OpenOptions::new().append(true).open(&self.path).await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        debug!(record_id = %record.id, "Appended JSON item");
        Ok(())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let contents = fs::read_to_string(&self.path).await?;
        Ok(contents.lines().filter(|line| !line.trim().is_empty()).count())
    }
}
