use ratatui::{
    Frame,
    layout::{Position, Rect},
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use super::super::view::InputRender;

pub fn render_input(frame: &mut Frame<'_>, area: Rect, input: &InputRender<'_>) {
    let inner_width = area.width.saturating_sub(2) as usize;
    let before: String = input.text.chars().take(input.cursor).collect();
    let cursor_col = UnicodeWidthStr::width(before.as_str());
    // Scroll horizontally so the cursor stays visible.
    let skip = cursor_col.saturating_sub(inner_width.saturating_sub(1));
    let mut visible = String::new();
    let mut col = 0;
    for ch in input.text.chars() {
        let width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if col >= skip {
            visible.push(ch);
        }
        col += width;
    }

    let widget = Paragraph::new(visible).block(
        Block::default()
            .title(format!("Edit {}", input.label))
            .borders(Borders::ALL),
    );
    frame.render_widget(widget, area);
    let x = area.x + 1 + (cursor_col - skip) as u16;
    frame.set_cursor_position(Position::new(x.min(area.right().saturating_sub(2)), area.y + 1));
}
