//! Waitlist Submissions
//!
//! The "join the waitlist" flow: a posted `{name, email}` pair is checked,
//! stamped into a [`WaitlistRecord`], and appended to a [`WaitlistStore`].

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::store::{StoreError, WaitlistStore};

/// Source tag recorded on every entry
pub const RECORD_SOURCE: &str = "website";

/// Length of the random suffix in record ids
const ID_SUFFIX_LEN: usize = 9;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Errors from the waitlist flow
#[derive(Debug, Error)]
pub enum WaitlistError {
    /// Name or email missing or blank
    #[error("Name and email are required")]
    MissingFields,

    /// Email does not look like an address
    #[error("Valid email is required")]
    InvalidEmail,

    /// The backend failed to persist the record
    #[error("storage failed: {0}")]
    Store(#[from] StoreError),
}

impl WaitlistError {
    /// Whether the caller sent bad input (as opposed to a server fault)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::MissingFields | Self::InvalidEmail)
    }
}

/// A waitlist form submission as posted by the landing page
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    /// Visitor name
    #[serde(default)]
    pub name: String,
    /// Visitor email
    #[serde(default)]
    pub email: String,
}

impl Submission {
    /// Create a submission
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Whether either field has non-blank content worth sending
    #[must_use]
    pub fn has_content(&self) -> bool {
        !self.name.trim().is_empty() || !self.email.trim().is_empty()
    }

    /// Trim and check the fields
    ///
    /// # Errors
    ///
    /// [`WaitlistError::MissingFields`] if either field is blank,
    /// [`WaitlistError::InvalidEmail`] if the email has no `@`.
    pub fn validate(&self) -> Result<ValidSubmission, WaitlistError> {
        let name = self.name.trim();
        let email = self.email.trim();

        if name.is_empty() || email.is_empty() {
            return Err(WaitlistError::MissingFields);
        }
        if !email.contains('@') {
            return Err(WaitlistError::InvalidEmail);
        }

        Ok(ValidSubmission {
            name: name.to_string(),
            email: email.to_string(),
        })
    }
}

/// A submission that passed validation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidSubmission {
    name: String,
    email: String,
}

impl ValidSubmission {
    /// Trimmed name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Trimmed email
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }
}

/// A persisted waitlist entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitlistRecord {
    /// `{unix_millis}-{9 base36 chars}`
    pub id: String,
    /// Visitor email
    pub email: String,
    /// Visitor name
    pub name: String,
    /// RFC 3339 UTC timestamp with millisecond precision
    pub timestamp: String,
    /// Where the entry came from
    pub source: String,
}

impl WaitlistRecord {
    /// Stamp a validated submission with an id, timestamp and source
    #[must_use]
    pub fn from_submission(submission: ValidSubmission) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id(now.timestamp_millis()),
            email: submission.email,
            name: submission.name,
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            source: RECORD_SOURCE.to_string(),
        }
    }
}

fn generate_id(millis: i64) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("{millis}-{suffix}")
}

/// Validates submissions and hands them to a store
#[derive(Clone)]
pub struct WaitlistService {
    store: Arc<dyn WaitlistStore>,
}

impl WaitlistService {
    /// Create a service backed by `store`
    pub fn new(store: Arc<dyn WaitlistStore>) -> Self {
        Self { store }
    }

    /// Name of the backing store
    #[must_use]
    pub fn store_name(&self) -> &str {
        self.store.name()
    }

    /// Validate and persist a submission
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad input or [`WaitlistError::Store`]
    /// if the backend fails.
    pub async fn join(&self, submission: &Submission) -> Result<WaitlistRecord, WaitlistError> {
        let valid = submission.validate().inspect_err(|e| {
            warn!(error = %e, "Rejected waitlist submission");
        })?;

        let record = WaitlistRecord::from_submission(valid);
        self.store.append(&record).await?;

        info!(
            record_id = %record.id,
            store = self.store.name(),
            "Added to waitlist"
        );
        Ok(record)
    }

    /// Number of stored entries
    ///
    /// # Errors
    ///
    /// Returns [`WaitlistError::Store`] if the backend cannot be read.
    pub async fn count(&self) -> Result<usize, WaitlistError> {
        Ok(self.store.count().await?)
    }
}

impl std::fmt::Debug for WaitlistService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaitlistService")
            .field("store", &self.store.name())
            .finish()
    }
}
