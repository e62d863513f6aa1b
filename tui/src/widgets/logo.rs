//! Logo Widget
//!
//! The finantic wordmark in box-drawing block letters. The app records where
//! it was drawn so mouse motion can be hit-tested against it.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;
use unicode_width::UnicodeWidthStr;

use super::centered;
use crate::theme::{logo_style, BRAND_TEAL_SHADOW};

const LOGO_LINES: [&str; 3] = [
    "╔═╗╦╔╗╔╔═╗╔╗╔╔╦╗╦╔═╗",
    "╠╣ ║║║║╠═╣║║║ ║ ║║  ",
    "╚  ╩╝╚╝╩ ╩╝╚╝ ╩ ╩╚═╝",
];

/// Plain-text fallback when the terminal is too narrow for the block letters
const WORDMARK: &str = "finantic";

/// The finantic wordmark
#[derive(Clone, Copy, Debug, Default)]
pub struct Logo {
    hovered: bool,
}

impl Logo {
    /// Rows the block letters occupy
    pub const HEIGHT: u16 = LOGO_LINES.len() as u16;

    /// Create a logo, highlighted while hovered
    #[must_use]
    pub fn new(hovered: bool) -> Self {
        Self { hovered }
    }

    /// Columns the block letters occupy
    #[must_use]
    pub fn width() -> u16 {
        LOGO_LINES
            .iter()
            .map(|line| line.width())
            .max()
            .map_or(0, |w| u16::try_from(w).unwrap_or(u16::MAX))
    }

    /// Where the logo lands when rendered into `area`
    #[must_use]
    pub fn bounds(area: Rect) -> Rect {
        if area.width < Self::width() {
            let width = u16::try_from(WORDMARK.width()).unwrap_or(u16::MAX);
            centered(area, width, 1)
        } else {
            centered(area, Self::width(), Self::HEIGHT)
        }
    }
}

impl Widget for Logo {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bounds = Self::bounds(area);
        let style = logo_style(self.hovered);

        if bounds.height < Self::HEIGHT || bounds.width < Self::width() {
            buf.set_string(bounds.x, bounds.y, WORDMARK, style);
            return;
        }

        for (row, line) in (0u16..).zip(LOGO_LINES) {
            buf.set_string(bounds.x, bounds.y + row, line, style);
        }
        // Shadow row under the letters when there is room
        if bounds.y + Self::HEIGHT < area.bottom() {
            let shadow = "▀".repeat(usize::from(Self::width()));
            buf.set_string(
                bounds.x,
                bounds.y + Self::HEIGHT,
                shadow,
                Style::default().fg(BRAND_TEAL_SHADOW),
            );
        }
    }
}
