use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use crate::app::NoticeKind;

use super::super::view::UiContext;

pub fn render_footer(frame: &mut Frame<'_>, area: Rect, ctx: &UiContext<'_>) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let status_style = match ctx.status_kind {
        NoticeKind::Success => Style::default().fg(Color::Green),
        NoticeKind::Info => Style::default(),
        NoticeKind::Warning => Style::default().fg(Color::Yellow),
        NoticeKind::Error => Style::default().fg(Color::Red),
    };
    let badge = if ctx.dirty_count > 0 {
        Span::styled(
            format!("[{} unsaved]", ctx.dirty_count),
            Style::default().fg(Color::Black).bg(Color::Yellow),
        )
    } else {
        Span::styled("[saved]", Style::default().fg(Color::Green))
    };
    let mut status = ctx.status_message.to_string();
    if status.trim().is_empty() {
        status = "Ready".to_string();
    }
    let status_line = Line::from(vec![badge, Span::raw(" "), Span::styled(status, status_style)]);
    frame.render_widget(Paragraph::new(status_line), rows[0]);

    if let Some(help) = ctx.help {
        let help_widget = Paragraph::new(help.to_string())
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help_widget, rows[1]);
    }
}
