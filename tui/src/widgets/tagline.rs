//! Tagline Widget
//!
//! Typewriter output followed by the caret, centered and wrapped to the
//! available width.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;
use textwrap::wrap;
use unicode_width::UnicodeWidthStr;

use landing_core::CARET;

use crate::theme;

/// Centered typewriter line with a trailing caret
pub struct Tagline<'a> {
    text: &'a str,
    style: Style,
    caret_style: Style,
}

impl<'a> Tagline<'a> {
    /// Tagline showing `text`
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            style: Style::default().fg(theme::TAGLINE_TEXT),
            caret_style: Style::default().fg(theme::CARET),
        }
    }

    /// Lines the text wraps to at `width`, caret included
    fn lines(&self, width: u16) -> Vec<String> {
        let with_caret = format!("{}{CARET}", self.text);
        wrap(&with_caret, usize::from(width).max(1))
            .into_iter()
            .map(|cow| cow.into_owned())
            .collect()
    }
}

impl Widget for Tagline<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let lines = self.lines(area.width);
        let last = lines.len().saturating_sub(1);

        for (i, (row, line)) in (0u16..area.height).zip(&lines).enumerate() {
            let width = u16::try_from(line.width()).unwrap_or(area.width).min(area.width);
            let x = area.x + (area.width - width) / 2;
            let y = area.y + row;

            if i == last {
                // Caret is always the final character
                let text = line.strip_suffix(CARET).unwrap_or(line);
                let end = buf.set_stringn(x, y, text, usize::MAX, self.style);
                buf.set_string(end.0, y, CARET.to_string(), self.caret_style);
            } else {
                buf.set_string(x, y, line, self.style);
            }
        }
    }
}
