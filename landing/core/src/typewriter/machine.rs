//! Typing Animator State Machine
//!
//! A pure, clock-free state machine. It never sleeps and never owns a timer:
//! the caller asks for [`TypingAnimator::next_delay`], waits that long by
//! whatever means it has, then calls [`TypingAnimator::tick`]. The async
//! [`Typewriter`](super::Typewriter) driver does exactly that on a tokio task,
//! and tests do it by hand.
//!
//! # Cycle
//!
//! ```text
//! Typing ──(phrase complete)──> Paused{Erase} ──(pause)──> Erasing
//!   ^                                                         │
//!   └──(pause, index+1)── Paused{NextPhrase} <──(text empty)──┘
//! ```

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::phrases::PhraseList;
use super::timing::TypingTiming;

/// What a pause resolves to once it elapses
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resume {
    /// Start erasing the phrase that was just typed
    Erase,
    /// Advance to the next phrase and start typing it
    NextPhrase,
}

/// Animator mode
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Appending one character per tick
    Typing,
    /// Removing one character per tick
    Erasing,
    /// Waiting out the fixed pause
    Paused {
        /// Mode entered when the pause elapses
        then: Resume,
    },
}

impl Mode {
    /// Short label for logs and status lines
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Typing => "typing",
            Self::Erasing => "erasing",
            Self::Paused { then: Resume::Erase } => "paused-before-erase",
            Self::Paused {
                then: Resume::NextPhrase,
            } => "paused-before-next",
        }
    }
}

/// Snapshot of the animator's state
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimatorState {
    /// Index of the phrase being typed or erased
    pub index: usize,
    /// Currently displayed prefix of that phrase
    pub display_text: String,
    /// Current mode
    pub mode: Mode,
}

impl Default for AnimatorState {
    fn default() -> Self {
        Self {
            index: 0,
            display_text: String::new(),
            mode: Mode::Typing,
        }
    }
}

/// Outcome of handing the animator a new phrase list
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhraseUpdate {
    /// The list counted as new and the animator restarted from the beginning
    Reset,
    /// The list was taken over without interrupting the animation
    Adopted,
}

/// The typewriter state machine
#[derive(Clone, Debug)]
pub struct TypingAnimator {
    phrases: PhraseList,
    reset_on_phrase_change: bool,
    timing: TypingTiming,
    index: usize,
    display: String,
    mode: Mode,
}

impl TypingAnimator {
    /// Create an animator in its initial state: index 0, empty text, typing
    #[must_use]
    pub fn new(phrases: PhraseList, reset_on_phrase_change: bool) -> Self {
        Self {
            phrases,
            reset_on_phrase_change,
            timing: TypingTiming::default(),
            index: 0,
            display: String::new(),
            mode: Mode::Typing,
        }
    }

    /// Replace the delay configuration
    #[must_use]
    pub fn with_timing(mut self, timing: TypingTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Settle any zero-delay transition and return how long to wait before
    /// the next [`tick`](Self::tick)
    pub fn next_delay<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Duration {
        self.settle();
        match self.mode {
            Mode::Typing => self.timing.type_delay(rng),
            Mode::Erasing => self.timing.erase_delay(rng),
            Mode::Paused { .. } => self.timing.pause(),
        }
    }

    /// Apply one tick and return the new display text
    ///
    /// A tick appends one character, removes one, or resolves a pause. If a
    /// zero-delay transition was still outstanding (the caller skipped
    /// [`next_delay`](Self::next_delay)), entering the pause is the whole tick.
    pub fn tick(&mut self) -> &str {
        if self.settle() {
            return &self.display;
        }

        match self.mode {
            Mode::Typing => {
                let phrase = self.phrases.get(self.index);
                if let Some(next) = phrase[self.display.len()..].chars().next() {
                    self.display.push(next);
                }
            }
            Mode::Erasing => {
                self.display.pop();
            }
            Mode::Paused { then: Resume::Erase } => {
                self.mode = Mode::Erasing;
            }
            Mode::Paused {
                then: Resume::NextPhrase,
            } => {
                self.index = (self.index + 1) % self.phrases.len();
                self.mode = Mode::Typing;
            }
        }

        &self.display
    }

    /// Hand the animator a (possibly) new phrase list
    ///
    /// With resetting enabled, a list whose length or first phrase differs
    /// restarts the animation. Anything else is adopted in place: the index
    /// is wrapped into the new list and the display text keeps its length,
    /// re-read from the new current phrase (clamped to that phrase's length).
    pub fn set_phrases(&mut self, phrases: PhraseList) -> PhraseUpdate {
        let is_new = phrases.differs_from(&self.phrases);
        self.phrases = phrases;

        if self.reset_on_phrase_change && is_new {
            self.reset();
            return PhraseUpdate::Reset;
        }

        self.index %= self.phrases.len();
        let progress = self.display.chars().count();
        self.display = self.phrases.get(self.index).chars().take(progress).collect();
        PhraseUpdate::Adopted
    }

    /// Toggle whether new phrase lists restart the animation
    pub fn set_reset_on_phrase_change(&mut self, enabled: bool) {
        self.reset_on_phrase_change = enabled;
    }

    /// Return to the initial state without touching the phrase list
    pub fn reset(&mut self) {
        self.index = 0;
        self.display.clear();
        self.mode = Mode::Typing;
    }

    /// Currently displayed text
    #[must_use]
    pub fn display_text(&self) -> &str {
        &self.display
    }

    /// Index of the current phrase
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Current mode
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The phrase list in use
    #[must_use]
    pub fn phrases(&self) -> &PhraseList {
        &self.phrases
    }

    /// The phrase being typed or erased
    #[must_use]
    pub fn current_phrase(&self) -> &str {
        self.phrases.get(self.index)
    }

    /// Owned snapshot of the state
    #[must_use]
    pub fn state(&self) -> AnimatorState {
        AnimatorState {
            index: self.index,
            display_text: self.display.clone(),
            mode: self.mode,
        }
    }

    /// Enter a pause if the current phase just finished. Returns whether the
    /// mode changed.
    fn settle(&mut self) -> bool {
        let next = match self.mode {
            Mode::Typing if self.display.len() == self.current_phrase().len() => Mode::Paused {
                then: Resume::Erase,
            },
            Mode::Erasing if self.display.is_empty() => Mode::Paused {
                then: Resume::NextPhrase,
            },
            _ => return false,
        };
        self.mode = next;
        true
    }
}
