//! In-memory store

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{StoreError, WaitlistStore};
use crate::waitlist::WaitlistRecord;

/// Keeps records in process memory; nothing survives a restart
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<WaitlistRecord>>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all records in insertion order
    pub async fn records(&self) -> Vec<WaitlistRecord> {
        self.records.lock().await.clone()
    }
}

#[async_trait]
impl WaitlistStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn append(&self, record: &WaitlistRecord) -> Result<(), StoreError> {
        self.records.lock().await.push(record.clone());
        Ok(())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.records.lock().await.len())
    }
}
