//! Waitlist Form Widget
//!
//! Two labelled single-line inputs. The focused field shows a cursor;
//! empty fields show a placeholder.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Widget;
use unicode_width::UnicodeWidthStr;

use crate::form::{Field, WaitlistForm};
use crate::theme;

const LABEL_WIDTH: u16 = 8;
const INPUT_WIDTH: u16 = 32;

/// Read-only view of a [`WaitlistForm`]
pub struct FormView<'a> {
    form: &'a WaitlistForm,
}

impl<'a> FormView<'a> {
    /// Rows the form occupies
    pub const HEIGHT: u16 = 2;

    /// Columns the form occupies
    pub const WIDTH: u16 = LABEL_WIDTH + INPUT_WIDTH;

    /// View of `form`
    #[must_use]
    pub fn new(form: &'a WaitlistForm) -> Self {
        Self { form }
    }

    fn render_field(&self, field: Field, area: Rect, y: u16, buf: &mut Buffer) {
        let focused = self.form.focus() == field;
        let label_color = if focused {
            theme::FIELD_FOCUSED
        } else {
            theme::FIELD_IDLE
        };
        let label = match field {
            Field::Name => "Name",
            Field::Email => "Email",
        };
        buf.set_string(area.x, y, label, Style::default().fg(label_color));

        let input_x = area.x + LABEL_WIDTH.min(area.width);
        let input_width = usize::from(area.right().saturating_sub(input_x));
        if input_width == 0 {
            return;
        }

        let value = self.form.value(field);
        let cursor = Style::default().fg(theme::FIELD_FOCUSED);

        if value.is_empty() {
            let mut x = input_x;
            if focused {
                buf.set_string(x, y, "_", cursor);
                x += 1;
            }
            let style = Style::default()
                .fg(theme::PLACEHOLDER)
                .add_modifier(Modifier::ITALIC);
            let room = usize::from(area.right().saturating_sub(x));
            buf.set_stringn(x, y, field.placeholder(), room, style);
            return;
        }

        // Keep the tail visible once the value outgrows the box
        let visible = tail_fitting(value, input_width.saturating_sub(1));
        let (end, _) = buf.set_stringn(input_x, y, visible, input_width, Style::default());
        if focused && end < area.right() {
            buf.set_string(end, y, "_", cursor);
        }
    }
}

impl Widget for FormView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < Self::HEIGHT || area.width == 0 {
            return;
        }
        self.render_field(Field::Name, area, area.y, buf);
        self.render_field(Field::Email, area, area.y + 1, buf);
    }
}

/// Longest suffix of `value` no wider than `width` columns
fn tail_fitting(value: &str, width: usize) -> &str {
    if value.width() <= width {
        return value;
    }
    let mut start = value.len();
    for (i, _) in value.char_indices().rev() {
        if value[i..].width() > width {
            break;
        }
        start = i;
    }
    &value[start..]
}
