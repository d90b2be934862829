use ratatui::{
    Frame,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
};
use unicode_width::UnicodeWidthStr;

use super::super::view::PopupRender;
use super::layout::popup_rect;

pub fn render_popup(frame: &mut Frame<'_>, popup: &PopupRender<'_>) {
    let labels: Vec<String> = popup
        .choices
        .iter()
        .map(|choice| {
            if popup.multi {
                format!("[{}] {}", if choice.active { "x" } else { " " }, choice.label)
            } else if choice.active {
                format!("{} (current)", choice.label)
            } else {
                choice.label.clone()
            }
        })
        .collect();
    let labels = if labels.is_empty() {
        vec!["(no options available)".to_string()]
    } else {
        labels
    };

    let max_width = labels
        .iter()
        .map(|label| UnicodeWidthStr::width(label.as_str()))
        .chain(std::iter::once(UnicodeWidthStr::width(popup.title)))
        .max()
        .unwrap_or(10) as u16;
    let width_limit = frame.area().width.saturating_sub(2).max(1);
    let width = max_width.saturating_add(6).min(width_limit);
    let height = labels
        .len()
        .saturating_add(2)
        .min(frame.area().height as usize) as u16;
    let area = popup_rect(frame.area(), width, height.max(3));
    frame.render_widget(Clear, area);

    let items: Vec<ListItem<'static>> = labels.into_iter().map(ListItem::new).collect();
    let mut state = ListState::default();
    if !popup.choices.is_empty() {
        state.select(Some(popup.selected.min(popup.choices.len() - 1)));
    }

    let list = List::new(items)
        .block(Block::default().title(popup.title).borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("» ");

    frame.render_stateful_widget(list, area, &mut state);
}
