use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::{
    app::{EditorOptions, NoticeKind},
    form::{Choice, Row},
};

use super::components::{render_dialog, render_footer, render_input, render_popup, render_table};

pub struct UiContext<'a> {
    pub title: &'a str,
    pub rows: &'a [Row],
    pub selected: usize,
    pub options: &'a EditorOptions,
    pub status_message: &'a str,
    pub status_kind: NoticeKind,
    pub dirty_count: usize,
    pub help: Option<&'a str>,
    pub input: Option<InputRender<'a>>,
    pub popup: Option<PopupRender<'a>>,
    pub dialog: Option<&'a DialogView>,
}

pub struct InputRender<'a> {
    pub label: &'a str,
    pub text: &'a str,
    /// Cursor position in chars.
    pub cursor: usize,
}

pub struct PopupRender<'a> {
    pub title: &'a str,
    pub choices: &'a [Choice],
    pub selected: usize,
    pub multi: bool,
}

/// Confirmation dialog content; answered with y / n.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogView {
    pub title: String,
    pub lines: Vec<String>,
    pub question: String,
}

pub fn draw(frame: &mut Frame<'_>, ctx: &UiContext<'_>) {
    let mut constraints = vec![Constraint::Min(5)];
    if ctx.input.is_some() {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Length(2));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.area());

    render_table(frame, chunks[0], ctx);
    if let Some(input) = &ctx.input {
        render_input(frame, chunks[1], input);
    }
    render_footer(frame, chunks[chunks.len() - 1], ctx);

    if let Some(popup) = &ctx.popup {
        render_popup(frame, popup);
    }
    if let Some(dialog) = ctx.dialog {
        render_dialog(frame, dialog);
    }
}

#[cfg(test)]
mod tests {
    use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};
    use serde_json::json;

    use super::*;
    use crate::{
        domain::{ConfigItem, FieldType, ReferenceData},
        form::{EditState, RowContext, table_rows},
    };

    fn buffer_text(buffer: &Buffer) -> String {
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|line| line.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render(ctx: &UiContext<'_>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|frame| draw(frame, ctx)).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    fn sample_rows(state: &EditState, items: &[ConfigItem]) -> Vec<Row> {
        let refs = ReferenceData::default();
        table_rows(&RowContext {
            items,
            state,
            refs: &refs,
            locale: None,
            override_mode: false,
            model_group_route: "/model-groups",
        })
    }

    fn context<'a>(rows: &'a [Row], options: &'a EditorOptions) -> UiContext<'a> {
        UiContext {
            title: " system ",
            rows,
            selected: 0,
            options,
            status_message: "Ready",
            status_kind: NoticeKind::Info,
            dirty_count: 0,
            help: Some("Ctrl+S save"),
            input: None,
            popup: None,
            dialog: None,
        }
    }

    #[test]
    fn table_shows_labels_values_and_status() {
        let mut token = ConfigItem::new("token", FieldType::Str, json!("secret-value"));
        token.is_secret = true;
        let mut ports = ConfigItem::new("ports", FieldType::List, json!([1, 2]));
        ports.title = Some("Ports".into());
        let items = vec![token, ports];
        let state = EditState::from_items(&items);
        let rows = sample_rows(&state, &items);
        let options = EditorOptions::default();
        let text = render(&context(&rows, &options));

        assert!(text.contains("system"));
        assert!(text.contains("Ports"));
        assert!(text.contains("▸ 2 items"));
        assert!(!text.contains("secret-value"));
        assert!(text.contains("[saved]"));
        assert!(text.contains("Ctrl+S save"));
    }

    #[test]
    fn dialog_and_input_overlays_render() {
        let items = vec![ConfigItem::new("name", FieldType::Str, json!(""))];
        let state = EditState::from_items(&items);
        let rows = sample_rows(&state, &items);
        let options = EditorOptions::default();
        let dialog = DialogView {
            title: "Required fields are empty".into(),
            lines: vec!["• name".into()],
            question: "Save anyway?".into(),
        };
        let mut ctx = context(&rows, &options);
        ctx.dialog = Some(&dialog);
        ctx.input = Some(InputRender {
            label: "name",
            text: "draft",
            cursor: 5,
        });
        let text = render(&ctx);
        assert!(text.contains("Required fields are empty"));
        assert!(text.contains("Save anyway? [y/n]"));
        assert!(text.contains("Edit name"));
        assert!(text.contains("draft"));
    }

    #[test]
    fn empty_namespace_shows_placeholder() {
        let options = EditorOptions::default();
        let text = render(&context(&[], &options));
        assert!(text.contains("No config items in this namespace"));
    }
}
