//! Phrase Lists
//!
//! The ordered, read-only list of phrases a [`TypingAnimator`] cycles through.
//!
//! [`TypingAnimator`]: super::TypingAnimator

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::TypewriterError;

/// Ordered, non-empty list of phrases
///
/// Cloning is cheap: the phrases are shared behind an `Arc`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct PhraseList(Arc<[String]>);

impl PhraseList {
    /// Create a phrase list, rejecting an empty one
    ///
    /// # Errors
    ///
    /// Returns [`TypewriterError::EmptyPhraseList`] if `phrases` yields nothing.
    pub fn new<I, S>(phrases: I) -> Result<Self, TypewriterError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let phrases: Vec<String> = phrases.into_iter().map(Into::into).collect();
        if phrases.is_empty() {
            return Err(TypewriterError::EmptyPhraseList);
        }
        Ok(Self(phrases.into()))
    }

    /// Number of phrases (always at least one)
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept so clippy's `len_without_is_empty` stays quiet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Phrase at `index`, wrapping around the list length
    #[must_use]
    pub fn get(&self, index: usize) -> &str {
        &self.0[index % self.0.len()]
    }

    /// First phrase of the list
    #[must_use]
    pub fn first(&self) -> &str {
        &self.0[0]
    }

    /// Iterate over the phrases in order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Whether `other` counts as a new list for the reset protocol
    ///
    /// Only the length and the first phrase are compared. Lists that share
    /// both are treated as the same list even if later phrases differ.
    #[must_use]
    pub fn differs_from(&self, other: &Self) -> bool {
        self.len() != other.len() || self.first() != other.first()
    }
}

impl TryFrom<Vec<String>> for PhraseList {
    type Error = TypewriterError;

    fn try_from(phrases: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(phrases)
    }
}

impl From<PhraseList> for Vec<String> {
    fn from(list: PhraseList) -> Self {
        list.0.to_vec()
    }
}
