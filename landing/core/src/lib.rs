//! Landing Core - Typewriter Animation and Waitlist Logic for finantic
//!
//! Everything the landing surfaces share, with no UI or HTTP framework
//! attached. The daemon wraps the waitlist service in an HTTP endpoint; the
//! terminal surface drives the typewriter and posts to that endpoint.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Surfaces                              │
//! │   ┌──────────────────┐              ┌──────────────────────┐  │
//! │   │  landing-tui     │   HTTP POST  │   landing-daemon     │  │
//! │   │  (ratatui)       │ ───────────► │   (axum)             │  │
//! │   └────────┬─────────┘              └──────────┬───────────┘  │
//! └────────────┼───────────────────────────────────┼──────────────┘
//!              │                                   │
//! ┌────────────┼───────────────────────────────────┼──────────────┐
//! │            ▼            LANDING CORE           ▼              │
//! │   ┌──────────────────┐              ┌──────────────────────┐  │
//! │   │   Typewriter     │              │   WaitlistService    │  │
//! │   │  TypingAnimator  │              │     │                │  │
//! │   │  + timer task    │              │     ▼                │  │
//! │   └──────────────────┘              │  WaitlistStore       │  │
//! │                                     │  csv / jsonl / mem   │  │
//! │                                     │     │ FieldCipher    │  │
//! │                                     └─────┴────────────────┘  │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Module Overview
//!
//! - [`typewriter`]: typing/erasing/pausing state machine and its timer task
//! - [`waitlist`]: submission validation, records, and the join operation
//! - [`store`]: storage backends behind the [`store::WaitlistStore`] trait
//! - [`cipher`]: AES-256-GCM field encryption and key management
//! - [`config`]: TOML configuration with environment overrides
//!
//! # Quick Start
//!
//! ```ignore
//! use landing_core::{PhraseList, Typewriter, TypingAnimator};
//!
//! let phrases = PhraseList::new(["Hello", "World"])?;
//! let typewriter = Typewriter::spawn(TypingAnimator::new(phrases, true));
//! let mut frames = typewriter.subscribe();
//! while frames.changed().await.is_ok() {
//!     println!("{}", frames.borrow().with_caret());
//! }
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cipher;
pub mod config;
pub mod store;
pub mod typewriter;
pub mod waitlist;

// Typewriter exports
pub use typewriter::{
    pump, AnimatorState, Frame, Mode, PhraseList, PhraseUpdate, Renderer, Resume, Typewriter,
    TypewriterError, TypingAnimator, TypingTiming, CARET,
};

// Waitlist exports
pub use waitlist::{
    Submission, ValidSubmission, WaitlistError, WaitlistRecord, WaitlistService, RECORD_SOURCE,
};

// Storage exports
pub use store::{open_store, StoreError, StoreKind, WaitlistStore};

// Cipher exports
pub use cipher::{CipherError, FieldCipher};

// Config exports
pub use config::{
    default_config_path, load_config, load_config_from_path, ClientConfig, ConfigError,
    ConfigOverrides, ConfigSource, LandingConfig, ServerConfig, StorageConfig, TypewriterConfig,
};
