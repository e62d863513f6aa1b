//! Waitlist Client
//!
//! Posts form submissions to the daemon's `POST /api/waitlist` endpoint.

use std::net::IpAddr;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use landing_core::{ClientConfig, Submission};

/// Errors from talking to the waitlist endpoint
#[derive(Debug, Error)]
pub enum ClientError {
    /// The HTTP client could not be built
    #[error("failed to create HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// The configured endpoint is not a valid URL
    #[error("invalid waitlist URL '{url}': {reason}")]
    InvalidUrl {
        /// Configured value
        url: String,
        /// Parser message
        reason: String,
    },

    /// The request did not complete
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a failure
    #[error("server rejected submission ({status}): {message}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Server-provided message
        message: String,
    },
}

/// Server reply body
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct WaitlistReply {
    /// Whether the entry was stored
    pub success: bool,
    /// Human-readable outcome
    pub message: String,
}

/// Waitlist HTTP client
#[derive(Clone, Debug)]
pub struct WaitlistClient {
    url: String,
    http_client: reqwest::Client,
}

impl WaitlistClient {
    /// Create a client for the configured endpoint
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] for a malformed endpoint and
    /// [`ClientError::Build`] if the TLS backend cannot initialize.
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let endpoint =
            reqwest::Url::parse(&config.waitlist_url).map_err(|e| ClientError::InvalidUrl {
                url: config.waitlist_url.clone(),
                reason: e.to_string(),
            })?;

        let mut builder =
            reqwest::Client::builder().timeout(Duration::from_secs(config.timeout_secs));
        // A local daemon is never reached through a proxy
        if is_loopback(&endpoint) {
            builder = builder.no_proxy();
        }
        let http_client = builder.build().map_err(ClientError::Build)?;

        Ok(Self {
            url: config.waitlist_url.clone(),
            http_client,
        })
    }

    /// Endpoint URL
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Post a submission
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Request`] on transport failure and
    /// [`ClientError::Rejected`] for any non-success reply.
    pub async fn submit(&self, submission: &Submission) -> Result<WaitlistReply, ClientError> {
        let response = self
            .http_client
            .post(&self.url)
            .json(submission)
            .send()
            .await?;

        let status = response.status();
        let reply = response.json::<WaitlistReply>().await;

        match reply {
            Ok(reply) if status.is_success() && reply.success => Ok(reply),
            Ok(reply) => Err(ClientError::Rejected {
                status: status.as_u16(),
                message: reply.message,
            }),
            Err(e) if status.is_success() => Err(ClientError::Request(e)),
            Err(_) => Err(ClientError::Rejected {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("unknown").to_string(),
            }),
        }
    }
}

fn is_loopback(url: &reqwest::Url) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    host.eq_ignore_ascii_case("localhost")
        || host
            .trim_start_matches('[')
            .trim_end_matches(']')
            .parse::<IpAddr>()
            .is_ok_and(|ip| ip.is_loopback())
}
