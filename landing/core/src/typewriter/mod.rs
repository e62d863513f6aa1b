//! Typewriter Tagline Animation
//!
//! Types one phrase at a time, character by character, pauses, erases it,
//! pauses again, and moves on to the next phrase, forever.
//!
//! # Architecture
//!
//! ```text
//! PhraseSource ──set_phrases──> Typewriter (tokio task)
//!                                   │ owns
//!                                   v
//!                             TypingAnimator ──Frame──> Renderer (text + caret)
//! ```
//!
//! - [`TypingAnimator`]: pure state machine, no clock, no I/O
//! - [`Typewriter`]: single-owner async driver with cancellable ticks
//! - [`PhraseList`]: non-empty phrase list shared with the caller
//! - [`TypingTiming`]: human-like delay ranges

mod driver;
mod machine;
mod phrases;
mod timing;

use thiserror::Error;

pub use driver::{pump, Frame, Renderer, Typewriter, CARET};
pub use machine::{AnimatorState, Mode, PhraseUpdate, Resume, TypingAnimator};
pub use phrases::PhraseList;
pub use timing::TypingTiming;

/// Errors raised when building typewriter inputs
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TypewriterError {
    /// A phrase list must hold at least one phrase
    #[error("phrase list must not be empty")]
    EmptyPhraseList,
}
