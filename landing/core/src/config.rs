//! Landing Configuration
//!
//! TOML configuration shared by the daemon and the terminal surface.
//!
//! # Precedence
//!
//! 1. Built-in defaults
//! 2. Config file (`--config` path, or `$XDG_CONFIG_HOME/finantic/landing.toml`)
//! 3. Environment variables ([`ConfigOverrides::from_env`])
//! 4. Command-line flags (the binaries fill in a [`ConfigOverrides`])
//!
//! A missing default config file is fine; a malformed one is an error.
//!
//! # Example
//!
//! ```toml
//! [server]
//! port = 8080
//! static_dir = "build"
//!
//! [storage]
//! kind = "csv"
//! data_dir = "data"
//!
//! [typewriter]
//! reset_on_phrase_change = true
//! pause_ms = 1500
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::store::StoreKind;
use crate::typewriter::{PhraseList, TypingTiming, TypewriterError};

/// Default taglines cycled by the typewriter
pub const DEFAULT_TAGLINES: &[&str] = &[
    "The AI-native investor intelligence platform.",
    "Bloomberg terminal for the AI era.",
    "From idea to conviction in minutes.",
    "Intelligent AI agent for the intelligent investor.",
    "Insight without the institutional overhead.",
    "Know the business\u{2014}not just the balance sheet.",
    "Where qualitative context meets quantitative clarity.",
];

/// Tagline shown while the waitlist form is open
pub const DEFAULT_WAITLIST_TAGLINE: &str = "Join the waitlist.";

/// Errors from loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read
    #[error("failed to read config {path:?}: {source}")]
    Read {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this schema
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        /// File that failed
        path: PathBuf,
        /// Underlying TOML error
        #[source]
        source: toml::de::Error,
    },

    /// A value is present but unusable
    #[error("invalid config: {0}")]
    Invalid(String),

    /// A phrase list is empty
    #[error("invalid phrases: {0}")]
    Phrases(#[from] TypewriterError),
}

/// Where the effective configuration came from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigSource {
    /// No file; built-in defaults
    Defaults,
    /// Loaded from this file
    File(PathBuf),
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Defaults => f.write_str("built-in defaults"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Complete configuration
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandingConfig {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Waitlist storage settings
    pub storage: StorageConfig,
    /// Tagline animation settings
    pub typewriter: TypewriterConfig,
    /// Settings for surfaces that post to the waitlist endpoint
    pub client: ClientConfig,
}

/// HTTP server settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub bind: String,
    /// Port to listen on
    pub port: u16,
    /// Directory of the built landing page
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 5000,
            static_dir: PathBuf::from("build"),
        }
    }
}

impl ServerConfig {
    /// Parsed listen address
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `bind` is not an IP address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = self
            .bind
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("bind address '{}': {e}", self.bind)))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Waitlist storage settings
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Backend to use
    pub kind: StoreKind,
    /// Directory holding store files and the key file
    pub data_dir: PathBuf,
    /// Explicit key file (defaults to `<data_dir>/waitlist.key`)
    pub key_file: Option<PathBuf>,
    /// Hex-encoded AES-256 key; takes precedence over the key file
    #[serde(skip_serializing)]
    pub encryption_key: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            kind: StoreKind::default(),
            data_dir: PathBuf::from("data"),
            key_file: None,
            encryption_key: None,
        }
    }
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("kind", &self.kind)
            .field("data_dir", &self.data_dir)
            .field("key_file", &self.key_file)
            .field("encryption_key", &redacted(self.encryption_key.as_ref()))
            .finish()
    }
}

impl StorageConfig {
    /// CSV backend file
    #[must_use]
    pub fn csv_path(&self) -> PathBuf {
        self.data_dir.join("waitlist.csv")
    }

    /// JSON lines backend file
    #[must_use]
    pub fn jsonl_path(&self) -> PathBuf {
        self.data_dir.join("waitlist.jsonl")
    }

    /// Encryption key file
    #[must_use]
    pub fn key_path(&self) -> PathBuf {
        self.key_file
            .clone()
            .unwrap_or_else(|| crate::cipher::default_key_path(&self.data_dir))
    }
}

/// Tagline animation settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypewriterConfig {
    /// Phrases cycled while the form is hidden
    pub taglines: Vec<String>,
    /// Phrases cycled while the form is shown
    pub waitlist_taglines: Vec<String>,
    /// Restart the animation when the phrase list changes
    pub reset_on_phrase_change: bool,
    /// Delay ranges
    #[serde(flatten)]
    pub timing: TypingTiming,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            taglines: DEFAULT_TAGLINES.iter().map(ToString::to_string).collect(),
            waitlist_taglines: vec![DEFAULT_WAITLIST_TAGLINE.to_string()],
            reset_on_phrase_change: true,
            timing: TypingTiming::default(),
        }
    }
}

impl TypewriterConfig {
    /// Taglines as a phrase list
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Phrases`] if the list is empty.
    pub fn tagline_phrases(&self) -> Result<PhraseList, ConfigError> {
        Ok(PhraseList::new(self.taglines.iter().cloned())?)
    }

    /// Waitlist taglines as a phrase list
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Phrases`] if the list is empty.
    pub fn waitlist_phrases(&self) -> Result<PhraseList, ConfigError> {
        Ok(PhraseList::new(self.waitlist_taglines.iter().cloned())?)
    }
}

/// Settings for surfaces posting to the waitlist endpoint
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Full URL of `POST /api/waitlist`
    pub waitlist_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            waitlist_url: "http://localhost:5000/api/waitlist".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Overrides layered on top of the file configuration
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Bind address
    pub bind: Option<String>,
    /// Listen port
    pub port: Option<u16>,
    /// Static file directory
    pub static_dir: Option<PathBuf>,
    /// Storage backend
    pub store: Option<StoreKind>,
    /// Data directory
    pub data_dir: Option<PathBuf>,
    /// Waitlist endpoint URL
    pub waitlist_url: Option<String>,
    /// Hex-encoded field encryption key
    pub encryption_key: Option<String>,
}

impl std::fmt::Debug for ConfigOverrides {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigOverrides")
            .field("bind", &self.bind)
            .field("port", &self.port)
            .field("static_dir", &self.static_dir)
            .field("store", &self.store)
            .field("data_dir", &self.data_dir)
            .field("waitlist_url", &self.waitlist_url)
            .field("encryption_key", &redacted(self.encryption_key.as_ref()))
            .finish()
    }
}

/// Debug stand-in for a secret
fn redacted(secret: Option<&String>) -> Option<&'static str> {
    secret.map(|_| "<redacted>")
}

impl ConfigOverrides {
    /// Read overrides from the process environment
    ///
    /// Environment variables:
    /// - `PORT`: listen port
    /// - `LANDING_BIND`: bind address
    /// - `LANDING_STATIC_DIR`: static file directory
    /// - `LANDING_STORE`: "csv", "jsonl" or "memory"
    /// - `LANDING_DATA_DIR`: data directory
    /// - `LANDING_WAITLIST_URL`: waitlist endpoint for clients
    /// - `LANDING_ENCRYPTION_KEY`: 64 hex chars, used instead of the key file
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through an arbitrary lookup; unparsable values are
    /// logged and ignored
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("PORT").and_then(|v| match v.parse() {
            Ok(port) => Some(port),
            Err(e) => {
                warn!(value = %v, error = %e, "Ignoring invalid PORT");
                None
            }
        });
        let store = lookup("LANDING_STORE").and_then(|v| match v.parse() {
            Ok(kind) => Some(kind),
            Err(e) => {
                warn!(value = %v, error = %e, "Ignoring invalid LANDING_STORE");
                None
            }
        });

        Self {
            bind: lookup("LANDING_BIND"),
            port,
            static_dir: lookup("LANDING_STATIC_DIR").map(PathBuf::from),
            store,
            data_dir: lookup("LANDING_DATA_DIR").map(PathBuf::from),
            waitlist_url: lookup("LANDING_WAITLIST_URL"),
            encryption_key: lookup("LANDING_ENCRYPTION_KEY").filter(|v| !v.trim().is_empty()),
        }
    }

    /// Layer `other` on top of `self`; values set in `other` win
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            bind: other.bind.or(self.bind),
            port: other.port.or(self.port),
            static_dir: other.static_dir.or(self.static_dir),
            store: other.store.or(self.store),
            data_dir: other.data_dir.or(self.data_dir),
            waitlist_url: other.waitlist_url.or(self.waitlist_url),
            encryption_key: other.encryption_key.or(self.encryption_key),
        }
    }

    /// Write every set override into `config`
    pub fn apply(&self, config: &mut LandingConfig) {
        if let Some(bind) = &self.bind {
            config.server.bind.clone_from(bind);
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(dir) = &self.static_dir {
            config.server.static_dir.clone_from(dir);
        }
        if let Some(kind) = self.store {
            config.storage.kind = kind;
        }
        if let Some(dir) = &self.data_dir {
            config.storage.data_dir.clone_from(dir);
        }
        if let Some(url) = &self.waitlist_url {
            config.client.waitlist_url.clone_from(url);
        }
        if let Some(key) = &self.encryption_key {
            config.storage.encryption_key = Some(key.clone());
        }
    }
}

/// Default config file location
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("finantic").join("landing.toml"))
}

/// Load configuration from an explicit path
///
/// # Errors
///
/// Returns [`ConfigError::Read`] or [`ConfigError::Parse`].
pub fn load_config_from_path(path: &Path) -> Result<LandingConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = ?path, "Loaded config file");
    Ok(config)
}

/// Load configuration
///
/// An explicit path must exist. Without one, the default location is tried
/// and silently skipped when absent.
///
/// # Errors
///
/// Returns an error if a file that should be read cannot be read or parsed.
pub fn load_config(explicit: Option<&Path>) -> Result<(LandingConfig, ConfigSource), ConfigError> {
    if let Some(path) = explicit {
        let config = load_config_from_path(path)?;
        return Ok((config, ConfigSource::File(path.to_path_buf())));
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            let config = load_config_from_path(&path)?;
            Ok((config, ConfigSource::File(path)))
        }
        _ => Ok((LandingConfig::default(), ConfigSource::Defaults)),
    }
}
