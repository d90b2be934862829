use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
};
use textwrap::wrap;

use super::super::view::DialogView;
use super::layout::popup_rect;

const DIALOG_WIDTH: u16 = 56;

pub fn render_dialog(frame: &mut Frame<'_>, dialog: &DialogView) {
    let width = DIALOG_WIDTH.min(frame.area().width.saturating_sub(2).max(1));
    let text_width = width.saturating_sub(4).max(1) as usize;

    let mut lines: Vec<Line<'static>> = Vec::new();
    for entry in &dialog.lines {
        for piece in wrap(entry, text_width) {
            lines.push(Line::from(piece.into_owned()));
        }
    }
    if !lines.is_empty() {
        lines.push(Line::from(""));
    }
    lines.push(Line::styled(
        format!("{} [y/n]", dialog.question),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ));

    let height = (lines.len() as u16)
        .saturating_add(2)
        .min(frame.area().height.max(3));
    let area = popup_rect(frame.area(), width, height);
    frame.render_widget(Clear, area);
    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(dialog.title.as_str())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(paragraph, area);
}
