//! Landing Page Widgets
//!
//! Borderless widgets drawn straight into the frame buffer.

mod form;
mod logo;
mod tagline;

use ratatui::layout::Rect;

pub use form::FormView;
pub use logo::Logo;
pub use tagline::Tagline;

/// A `width` x `height` rect centered horizontally in `area`, starting at
/// its top row and clipped to it
#[must_use]
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y,
        width,
        height,
    )
}
