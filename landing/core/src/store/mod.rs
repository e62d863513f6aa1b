//! Waitlist Storage Backends
//!
//! Backend abstraction for persisting waitlist records. The service layer
//! only sees [`WaitlistStore`]; which backend sits behind it is a
//! configuration choice.
//!
//! # Backends
//!
//! - [`CsvStore`]: `TIMESTAMP,NAME,EMAIL` rows with encrypted name and email
//! - [`JsonLinesStore`]: one JSON item per line (`id`, `email`, `name`,
//!   `timestamp`, `source`), the shape a managed key-value table would hold
//! - [`MemoryStore`]: in-process, for tests and dry runs

mod csv;
mod jsonl;
mod memory;

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::cipher::{CipherError, FieldCipher};
use crate::config::StorageConfig;
use crate::waitlist::WaitlistRecord;

pub use self::csv::{CsvEntry, CsvStore, CSV_HEADER};
pub use jsonl::JsonLinesStore;
pub use memory::MemoryStore;

/// Errors from storage backends
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Field encryption or decryption failed
    #[error("cipher error: {0}")]
    Cipher(#[from] CipherError),

    /// A JSON item could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Stored data did not have the expected shape
    #[error("corrupt store: {0}")]
    Corrupt(String),
}

/// Storage backend trait
///
/// Implementations must serialize concurrent appends so records never
/// interleave.
#[async_trait]
pub trait WaitlistStore: Send + Sync {
    /// Backend name for logs (e.g. "csv")
    fn name(&self) -> &str;

    /// Persist one record
    async fn append(&self, record: &WaitlistRecord) -> Result<(), StoreError>;

    /// Number of persisted records
    async fn count(&self) -> Result<usize, StoreError>;
}

/// Which backend to use
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// Encrypted CSV file
    #[default]
    Csv,
    /// JSON lines file
    #[serde(rename = "jsonl")]
    JsonLines,
    /// In-process memory
    Memory,
}

impl StoreKind {
    /// Config / CLI spelling
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::JsonLines => "jsonl",
            Self::Memory => "memory",
        }
    }
}

impl std::fmt::Display for StoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "jsonl" | "json" | "kv" => Ok(Self::JsonLines),
            "memory" | "mem" => Ok(Self::Memory),
            other => Err(format!("unknown store '{other}' (expected csv, jsonl or memory)")),
        }
    }
}

/// Open the backend selected by `config`
///
/// # Errors
///
/// Returns an error if the data directory, key, or store file cannot be
/// prepared.
pub async fn open_store(config: &StorageConfig) -> Result<Arc<dyn WaitlistStore>, StoreError> {
    let store: Arc<dyn WaitlistStore> = match config.kind {
        StoreKind::Csv => {
            let cipher =
                FieldCipher::load_or_create(config.encryption_key.as_deref(), &config.key_path())
                    .await?;
            Arc::new(CsvStore::open(config.csv_path(), cipher).await?)
        }
        StoreKind::JsonLines => Arc::new(JsonLinesStore::open(config.jsonl_path()).await?),
        StoreKind::Memory => Arc::new(MemoryStore::new()),
    };

    info!(store = store.name(), "Waitlist store ready");
    Ok(store)
}
