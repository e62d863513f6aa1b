//! Theme and Colors
//!
//! Finantic's terminal palette: deep navy background tones, a teal brand
//! accent for the logo and caret, and muted grays for chrome.

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// Brand Palette
// ============================================================================

/// Logo and accent teal
pub const BRAND_TEAL: Color = Color::Rgb(45, 212, 191);

/// Logo shadow, drawn under the teal block letters
pub const BRAND_TEAL_SHADOW: Color = Color::Rgb(17, 94, 89);

/// Tagline text - near white
pub const TAGLINE_TEXT: Color = Color::Rgb(226, 232, 240);

/// Blinking-style caret after the tagline
pub const CARET: Color = BRAND_TEAL;

// ============================================================================
// Form Colors
// ============================================================================

/// Label of the focused field
pub const FIELD_FOCUSED: Color = BRAND_TEAL;

/// Label of an unfocused field
pub const FIELD_IDLE: Color = Color::Rgb(148, 163, 184);

/// Placeholder text inside an empty field
pub const PLACEHOLDER: Color = Color::Rgb(100, 116, 139);

/// Submission in flight
pub const PENDING_AMBER: Color = Color::Rgb(251, 191, 36);

// ============================================================================
// UI Colors
// ============================================================================

/// Status bar / dim text
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);

/// Style for the logo block letters
#[must_use]
pub fn logo_style(hovered: bool) -> Style {
    let style = Style::default().fg(BRAND_TEAL);
    if hovered {
        style.add_modifier(Modifier::BOLD)
    } else {
        style
    }
}
