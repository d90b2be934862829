use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row as TableRow, Table, TableState},
};

use crate::form::{Row, RowKind};

use super::super::{
    cells::{fit, row_label, widget_text},
    view::UiContext,
};

const LABEL_SHARE: u16 = 40;
const VALUE_SHARE: u16 = 35;

pub fn render_table(frame: &mut Frame<'_>, area: Rect, ctx: &UiContext<'_>) {
    let block = Block::default().title(ctx.title).borders(Borders::ALL);
    if ctx.rows.is_empty() {
        let placeholder = Paragraph::new("No config items in this namespace").block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let inner_width = area.width.saturating_sub(5) as usize;
    let label_width = inner_width * LABEL_SHARE as usize / 100;
    let value_width = inner_width * VALUE_SHARE as usize / 100;
    let description_width = inner_width.saturating_sub(label_width + value_width);

    let rows: Vec<TableRow<'static>> = ctx
        .rows
        .iter()
        .map(|row| {
            let value = match &row.widget {
                Some(widget) => widget_text(widget, ctx.options),
                None => String::new(),
            };
            let description = row.description.clone().unwrap_or_default();
            TableRow::new(vec![
                Cell::from(fit(&row_label(row), label_width)),
                Cell::from(fit(&value, value_width)),
                Cell::from(fit(&description, description_width)),
            ])
            .style(row_style(row))
        })
        .collect();

    let header = TableRow::new(vec!["Field", "Value", "Description"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let table = Table::new(
        rows,
        [
            Constraint::Percentage(LABEL_SHARE),
            Constraint::Percentage(VALUE_SHARE),
            Constraint::Fill(1),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
    .highlight_symbol("> ");

    let mut state = TableState::default();
    state.select(Some(ctx.selected.min(ctx.rows.len() - 1)));
    frame.render_stateful_widget(table, area, &mut state);
}

fn row_style(row: &Row) -> Style {
    if row.disabled {
        return Style::default().fg(Color::DarkGray);
    }
    let invalid = row.widget.as_ref().is_some_and(|widget| widget.is_invalid());
    if invalid {
        return Style::default().fg(Color::Red);
    }
    match row.kind {
        RowKind::AddItem | RowKind::NewKey => Style::default().fg(Color::Cyan),
        RowKind::ElementHeader => Style::default().add_modifier(Modifier::BOLD),
        _ if row.dirty => Style::default().fg(Color::Yellow),
        _ => Style::default(),
    }
}
