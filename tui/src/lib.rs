//! Landing TUI - terminal landing page for finantic
//!
//! A full-screen rendition of the marketing page: the finantic wordmark, a
//! typewriter tagline cycling through the product pitch, and a waitlist form
//! that slides in while the logo is hovered.
//!
//! # Architecture
//!
//! - **App**: event loop tying terminal input, the typewriter and submissions together
//! - **Form**: waitlist form state (visibility, focus, field values)
//! - **Widgets**: logo, tagline and form renderers
//! - **Client**: posts submissions to the landing daemon

pub mod app;
pub mod client;
pub mod form;
pub mod theme;
pub mod widgets;

pub use app::{App, SubmitOutcome};
