//! Waitlist Form State
//!
//! Visibility, field contents and focus of the "join the waitlist" form,
//! kept apart from rendering so the hover rules can be tested without a
//! terminal.
//!
//! - Hovering the logo (or pressing Tab) reveals the form
//! - Leaving the logo hides it again, but only while both fields are empty
//! - A submission is only worth sending when a field has non-blank content

use landing_core::Submission;

/// Which input has focus
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Field {
    /// Visitor name
    #[default]
    Name,
    /// Visitor email
    Email,
}

impl Field {
    /// The other field
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Name => Self::Email,
            Self::Email => Self::Name,
        }
    }

    /// Placeholder shown while the field is empty
    #[must_use]
    pub fn placeholder(self) -> &'static str {
        match self {
            Self::Name => "Your name",
            Self::Email => "Your email",
        }
    }
}

/// Form state
#[derive(Clone, Debug, Default)]
pub struct WaitlistForm {
    visible: bool,
    hovered: bool,
    name: String,
    email: String,
    focus: Field,
    submitting: bool,
}

impl WaitlistForm {
    /// Hidden, empty form
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the form is shown
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the pointer is over the logo
    #[must_use]
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Whether a submission is in flight
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Focused field
    #[must_use]
    pub fn focus(&self) -> Field {
        self.focus
    }

    /// Contents of `field`
    #[must_use]
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
        }
    }

    /// Both fields are blank
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.trim().is_empty() && self.email.trim().is_empty()
    }

    /// Track the pointer entering or leaving the logo. Returns `true` when
    /// the form's visibility changed.
    pub fn set_hovered(&mut self, hovered: bool) -> bool {
        if hovered == self.hovered {
            return false;
        }
        self.hovered = hovered;

        if hovered {
            self.show()
        } else if self.is_empty() {
            self.hide()
        } else {
            false
        }
    }

    /// Show the form. Returns `true` if it was hidden.
    pub fn show(&mut self) -> bool {
        !std::mem::replace(&mut self.visible, true)
    }

    /// Hide the form. Returns `true` if it was shown.
    pub fn hide(&mut self) -> bool {
        std::mem::replace(&mut self.visible, false)
    }

    /// Move focus to the other field
    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    /// Type a character into the focused field
    pub fn push(&mut self, c: char) {
        self.focused_mut().push(c);
    }

    /// Delete the last character of the focused field
    pub fn backspace(&mut self) {
        self.focused_mut().pop();
    }

    /// Snapshot of the fields if there is anything worth sending
    ///
    /// Returns `None` while a submission is already in flight.
    #[must_use]
    pub fn submission(&self) -> Option<Submission> {
        if self.submitting {
            return None;
        }
        let submission = Submission::new(self.name.clone(), self.email.clone());
        submission.has_content().then_some(submission)
    }

    /// Mark a submission as in flight (or finished)
    pub fn set_submitting(&mut self, submitting: bool) {
        self.submitting = submitting;
    }

    /// Clear the fields and hide the form after a successful submission
    pub fn reset(&mut self) {
        self.name.clear();
        self.email.clear();
        self.focus = Field::Name;
        self.submitting = false;
        self.visible = false;
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
        }
    }
}
