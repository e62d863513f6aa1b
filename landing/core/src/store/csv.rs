//! Encrypted CSV Store
//!
//! Appends `TIMESTAMP,NAME,EMAIL` rows. Name and email are encrypted with a
//! [`FieldCipher`] before they touch the disk; the timestamp stays readable.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::{StoreError, WaitlistStore};
use crate::cipher::FieldCipher;
use crate::waitlist::WaitlistRecord;

/// Header line written once when the file is created
pub const CSV_HEADER: &str = "TIMESTAMP,NAME,EMAIL";

/// One decrypted CSV row
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsvEntry {
    /// Submission time
    pub timestamp: String,
    /// Decrypted name
    pub name: String,
    /// Decrypted email
    pub email: String,
}

/// CSV file store with per-field encryption
#[derive(Debug)]
pub struct CsvStore {
    path: PathBuf,
    cipher: FieldCipher,
    write_lock: Mutex<()>,
}

impl CsvStore {
    /// Open the store, creating the directory and header if needed
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file cannot be created.
    pub async fn open(path: impl Into<PathBuf>, cipher: FieldCipher) -> Result<Self, StoreError> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        match OpenOptions::new().write(true).create_new(true).open(&path).await {
            Ok(mut file) => {
                file.write_all(format!("{CSV_HEADER}\n").as_bytes()).await?;
                file.flush().await?;
                info!(path = ?path, "Created waitlist CSV");
            }
            // Existing file already carries its header
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                debug!(path = ?path, "Reusing waitlist CSV");
            }
            Err(e) => return Err(e.into()),
        }

        Ok(Self {
            path,
            cipher,
            write_lock: Mutex::new(()),
        })
    }

    /// Path of the CSV file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read back every row, decrypting name and email
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupt`] for rows with the wrong column count
    /// and [`StoreError::Cipher`] for fields that fail to decrypt.
    pub async fn entries(&self) -> Result<Vec<CsvEntry>, StoreError> {
        let contents = fs::read_to_string(&self.path).await?;
        contents
            .lines()
            .skip(1)
            .filter(|line| !line.trim().is_empty())
            .map(|line| self.parse_row(line))
            .collect()
    }

    fn parse_row(&self, line: &str) -> Result<CsvEntry, StoreError> {
        let fields: Vec<&str> = line.split(',').collect();
        let [timestamp, name, email] = fields.as_slice() else {
            return Err(StoreError::Corrupt(format!(
                "expected 3 columns, found {}",
                fields.len()
            )));
        };

        Ok(CsvEntry {
            timestamp: (*timestamp).to_string(),
            name: self.cipher.decrypt(name)?,
            email: self.cipher.decrypt(email)?,
        })
    }
}

#[async_trait]
impl WaitlistStore for CsvStore {
    fn name(&self) -> &str {
        "csv"
    }

    async fn append(&self, record: &WaitlistRecord) -> Result<(), StoreError> {
        // Encrypted fields are hex with a ':' separator, so no quoting needed
        let row = format!(
            "{},{},{}\n",
            record.timestamp,
            self.cipher.encrypt(&record.name)?,
            self.cipher.encrypt(&record.email)?,
        );

        let _guard = self.write_lock.lock().await;
        let mut file = OpenOptions::new().append(true).open(&self.path).await?;
        file.write_all(row.as_bytes()).await?;
        file.flush().await?;

        debug!(record_id = %record.id, "Appended CSV row");
        Ok(())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let contents = fs::read_to_string(&self.path).await?;
        Ok(contents
            .lines()
            .skip(1)
            .filter(|line| !line.trim().is_empty())
            .count())
    }
}
