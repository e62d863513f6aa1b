//! Typing Cadence
//!
//! Delay ranges that give the typewriter its human-like rhythm. Keystroke
//! and erase delays are drawn uniformly from half-open ranges; the pause
//! between phases is fixed.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Delay configuration for the typewriter
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingTiming {
    /// Lower bound of the per-character typing delay (inclusive)
    pub type_min_ms: u64,
    /// Upper bound of the per-character typing delay (exclusive)
    pub type_max_ms: u64,
    /// Lower bound of the per-character erase delay (inclusive)
    pub erase_min_ms: u64,
    /// Upper bound of the per-character erase delay (exclusive)
    pub erase_max_ms: u64,
    /// Pause after a phrase is fully typed and after it is fully erased
    pub pause_ms: u64,
}

impl Default for TypingTiming {
    fn default() -> Self {
        Self {
            type_min_ms: 50,
            type_max_ms: 100,
            erase_min_ms: 20,
            erase_max_ms: 50,
            pause_ms: 1500,
        }
    }
}

impl TypingTiming {
    /// Random delay before the next typed character
    pub fn type_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        sample(rng, self.type_min_ms, self.type_max_ms)
    }

    /// Random delay before the next erased character
    pub fn erase_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        sample(rng, self.erase_min_ms, self.erase_max_ms)
    }

    /// Fixed pause between phases
    #[must_use]
    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }
}

/// Uniform sample from `[min, max)`, or exactly `min` for a degenerate range
fn sample<R: Rng + ?Sized>(rng: &mut R, min: u64, max: u64) -> Duration {
    if max <= min {
        return Duration::from_millis(min);
    }
    Duration::from_millis(rng.gen_range(min..max))
}
