use std::future;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use tokio::{
    sync::broadcast::{self, error::TryRecvError},
    task::{JoinError, JoinHandle},
};
use tracing::warn;

use crate::{
    form::{Binding, Row, RowAction, Widget},
    presentation::{self, DialogView, InputRender, UiContext},
    service::{RestartResponse, ServiceError, ServiceResult},
};

use super::{
    commit::{SaveMode, SaveOutcome},
    editor::{ConfigEditor, Prompt},
    error::EditorError,
    input::{DialogAnswer, HELP_TEXT, KeyCommand, classify, classify_dialog},
    line_input::{InputEvent, InputTarget, LineInput},
    notify::Notice,
    popup::PopupState,
    status::StatusLine,
    terminal::TerminalGuard,
};

mod event;

use event::{EventReader, TermEvent};

const PAGE_SIZE: usize = 10;

type PendingRestart = JoinHandle<ServiceResult<RestartResponse>>;

pub(crate) struct App {
    editor: ConfigEditor,
    title: String,
    notices: Option<broadcast::Receiver<Notice>>,
    status: StatusLine,
    rows: Vec<Row>,
    selected: usize,
    input: Option<LineInput>,
    popup: Option<PopupState>,
    restart: Option<PendingRestart>,
    exit_armed: bool,
    should_quit: bool,
}

impl App {
    pub(crate) fn new(
        editor: ConfigEditor,
        title: String,
        notices: Option<broadcast::Receiver<Notice>>,
    ) -> Self {
        let rows = editor.rows();
        Self {
            editor,
            title,
            notices,
            status: StatusLine::new(),
            rows,
            selected: 0,
            input: None,
            popup: None,
            restart: None,
            exit_armed: false,
            should_quit: false,
        }
    }

    pub(crate) fn into_editor(self) -> ConfigEditor {
        self.editor
    }

    pub(crate) async fn run(&mut self) -> Result<()> {
        let mut terminal = TerminalGuard::new()?;
        let mut events = EventReader::start(self.editor.options().tick_rate);
        while !self.should_quit {
            self.drain_notices();
            terminal.draw(|frame| self.draw(frame))?;
            tokio::select! {
                event = events.next() => match event {
                    Some(TermEvent::Key(key)) => self.handle_key(key).await,
                    Some(TermEvent::Paste(text)) => self.handle_paste(&text),
                    Some(TermEvent::Resize | TermEvent::Tick) => {}
                    None => break,
                },
                joined = restart_finished(&mut self.restart) => self.on_restart_finished(joined),
            }
        }
        events.stop();
        if let Some(handle) = self.restart.take() {
            handle.abort();
        }
        Ok(())
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let dialog = self.editor.prompt().map(dialog_for);
        let input = self.input.as_ref().map(|input| (input, input.text()));
        let label = self
            .selected_row()
            .map(|row| row.label.as_str())
            .unwrap_or_default();
        let options = self.editor.options();
        presentation::draw(
            frame,
            &UiContext {
                title: &self.title,
                rows: &self.rows,
                selected: self.selected,
                options,
                status_message: self.status.message(),
                status_kind: self.status.kind(),
                dirty_count: self.editor.state().dirty_count(),
                help: options.show_help.then_some(HELP_TEXT),
                input: input.as_ref().map(|(input, text)| InputRender {
                    label,
                    text,
                    cursor: input.cursor(),
                }),
                popup: self.popup.as_ref().map(PopupState::as_render),
                dialog: dialog.as_ref(),
            },
        );
    }

    fn drain_notices(&mut self) {
        let Some(receiver) = &mut self.notices else {
            return;
        };
        loop {
            match receiver.try_recv() {
                Ok(notice) => self.status.show(&notice),
                Err(TryRecvError::Lagged(_)) => continue,
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
    }

    async fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if self.editor.prompt().is_some() {
            self.handle_dialog_key(&key).await;
        } else if self.popup.is_some() {
            self.handle_popup_key(&key);
        } else if self.input.is_some() {
            self.handle_input_key(&key);
        } else {
            self.handle_command(classify(&key)).await;
        }
        self.sync_rows();
    }

    fn handle_paste(&mut self, text: &str) {
        if let Some(input) = &mut self.input {
            input.insert_str(text);
        }
    }

    async fn handle_dialog_key(&mut self, key: &KeyEvent) {
        let restart_prompt = matches!(self.editor.prompt(), Some(Prompt::Restart { .. }));
        match classify_dialog(key) {
            DialogAnswer::Confirm if restart_prompt => self.start_restart(),
            DialogAnswer::Confirm => match self.editor.confirm().await {
                Ok(outcome) => self.report_outcome(outcome),
                Err(err) => self.status.set_raw(err.to_string()),
            },
            DialogAnswer::Cancel => {
                self.editor.cancel();
                self.status.ready();
            }
            DialogAnswer::None => {}
        }
    }

    /// Run the restart on its own task so the table keeps taking keys.
    fn start_restart(&mut self) {
        match self.editor.begin_restart() {
            Ok(trigger) => {
                self.status.set_raw("Restarting…");
                self.restart = Some(tokio::spawn(async move { trigger.restart_system().await }));
            }
            Err(err) => self.status.set_raw(err.to_string()),
        }
    }

    fn on_restart_finished(&mut self, joined: Result<ServiceResult<RestartResponse>, JoinError>) {
        self.restart = None;
        let response = joined.unwrap_or_else(|err| {
            warn!(%err, "restart task did not complete");
            Err(ServiceError::backend(format!("restart task failed: {err}")))
        });
        if let Err(err) = self.editor.finish_restart(response) {
            self.status.set_raw(err.to_string());
        }
    }

    fn handle_popup_key(&mut self, key: &KeyEvent) {
        let Some(popup) = &mut self.popup else {
            return;
        };
        match key.code {
            KeyCode::Esc => {
                self.popup = None;
                self.status.ready();
            }
            KeyCode::Up | KeyCode::Char('k') => popup.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => popup.select_next(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                let Some(choice) = popup.current().cloned() else {
                    return;
                };
                let binding = popup.binding().clone();
                let multi = popup.is_multi();
                if !multi {
                    self.popup = None;
                }
                self.apply(&binding, &choice.staged);
                if multi {
                    self.sync_rows();
                    let row = self.rows.iter().find(|row| row.binding == binding).cloned();
                    if let (Some(popup), Some(row)) = (&mut self.popup, row) {
                        popup.refresh(&row);
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_input_key(&mut self, key: &KeyEvent) {
        let Some(input) = &mut self.input else {
            return;
        };
        match input.handle_key(key) {
            InputEvent::Submit => {
                let text = input.text();
                let target = input.target.clone();
                self.input = None;
                match target {
                    InputTarget::Value(binding) => self.apply(&binding, &text),
                    InputTarget::NewKey(binding) => self.insert_key(&binding, &text),
                }
            }
            InputEvent::Cancel => {
                self.input = None;
                self.status.ready();
            }
            InputEvent::Changed | InputEvent::Ignored => {}
        }
    }

    async fn handle_command(&mut self, command: KeyCommand) {
        match command {
            KeyCommand::Save => {
                self.exit_armed = false;
                if !self.editor.can_save() {
                    self.status.nothing_to_save();
                    return;
                }
                match self.editor.save(SaveMode::Normal).await {
                    Ok(outcome) => self.report_outcome(Some(outcome)),
                    Err(err) => self.status.set_raw(err.to_string()),
                }
            }
            KeyCommand::Quit => self.on_exit(),
            KeyCommand::Reload => {
                self.exit_armed = false;
                self.editor.request_reload();
            }
            KeyCommand::NextRow => self.move_selection(1),
            KeyCommand::PrevRow => self.move_selection(-1),
            KeyCommand::PageDown => self.move_selection(PAGE_SIZE as isize),
            KeyCommand::PageUp => self.move_selection(-(PAGE_SIZE as isize)),
            KeyCommand::Activate => self.activate(),
            KeyCommand::Remove => self.remove(),
            KeyCommand::Reveal => self.reveal(),
            KeyCommand::ResetStatus => {
                self.exit_armed = false;
                self.status.ready();
            }
            KeyCommand::None => {}
        }
    }

    fn activate(&mut self) {
        let Some(row) = self.selected_row().cloned() else {
            return;
        };
        if row.disabled {
            self.status.set_raw(format!("{} is disabled by its toggle", row.label));
            return;
        }
        match row.primary_action() {
            Some(RowAction::ToggleExpand { expand_key }) => {
                self.editor.toggle_expanded(expand_key);
                return;
            }
            Some(RowAction::Append { key, path }) => {
                let result = self.editor.append_element(key, path);
                self.after_edit(result);
                return;
            }
            Some(RowAction::InsertKey { .. }) => {
                self.status.set_raw("Type the new key, Enter adds it");
                self.input = Some(LineInput::new(InputTarget::NewKey(row.binding.clone()), ""));
                return;
            }
            _ => {}
        }
        let Some(widget) = &row.widget else {
            return;
        };
        match widget {
            Widget::Toggle { value } => {
                let flipped = (!value).to_string();
                self.apply(&row.binding, &flipped);
            }
            _ if widget.is_free_text() => {
                let initial = widget.edit_text().unwrap_or_default();
                self.status.editing(&row.label);
                self.input = Some(LineInput::new(
                    InputTarget::Value(row.binding.clone()),
                    initial,
                ));
            }
            _ => {
                if let Some(popup) = PopupState::from_row(&row) {
                    self.status.set_raw("Use ↑/↓ and Enter to choose, Esc closes");
                    self.popup = Some(popup);
                }
            }
        }
    }

    fn remove(&mut self) {
        let Some(row) = self.selected_row() else {
            return;
        };
        if row.disabled {
            return;
        }
        if let Some(RowAction::Delete { key, path }) = row.delete_action().cloned() {
            let result = self.editor.delete_element(&key, &path);
            self.after_edit(result);
        }
    }

    fn reveal(&mut self) {
        let key = match self.selected_row().and_then(Row::reveal_key) {
            Some(key) => key.to_string(),
            None => return,
        };
        self.editor.toggle_revealed(&key);
    }

    fn apply(&mut self, binding: &Binding, raw: &str) {
        let result = if binding.is_top_level() {
            self.editor.stage(&binding.key, raw)
        } else {
            self.editor.set_element(&binding.key, &binding.path, raw)
        };
        self.after_edit(result);
    }

    fn insert_key(&mut self, binding: &Binding, new_key: &str) {
        match self.editor.insert_key(&binding.key, &binding.path, new_key) {
            Ok(true) => self.status.value_updated(),
            Ok(false) => self.status.ready(),
            Err(err) => self.status.set_raw(err.to_string()),
        }
    }

    fn after_edit(&mut self, result: Result<(), EditorError>) {
        self.exit_armed = false;
        match result {
            Ok(()) => self.status.value_updated(),
            Err(err) => self.status.set_raw(err.to_string()),
        }
    }

    fn report_outcome(&mut self, outcome: Option<SaveOutcome>) {
        match outcome {
            Some(SaveOutcome::NothingToSave) => self.status.nothing_to_save(),
            Some(SaveOutcome::Blocked { missing }) => self
                .status
                .set_raw(format!("{} required field(s) are empty", missing.len())),
            Some(SaveOutcome::Saved { .. }) | None => {}
        }
    }

    fn on_exit(&mut self) {
        if self.editor.options().confirm_exit && self.editor.can_save() && !self.exit_armed {
            self.exit_armed = true;
            self.status.pending_exit();
            return;
        }
        self.should_quit = true;
    }

    fn move_selection(&mut self, delta: isize) {
        if self.rows.is_empty() {
            return;
        }
        let last = self.rows.len() - 1;
        self.selected = self.selected.saturating_add_signed(delta).min(last);
    }

    fn selected_row(&self) -> Option<&Row> {
        self.rows.get(self.selected)
    }

    fn sync_rows(&mut self) {
        self.rows = self.editor.rows();
        self.selected = self.selected.min(self.rows.len().saturating_sub(1));
    }
}

async fn restart_finished(
    pending: &mut Option<PendingRestart>,
) -> Result<ServiceResult<RestartResponse>, JoinError> {
    match pending {
        Some(handle) => handle.await,
        None => future::pending().await,
    }
}

fn dialog_for(prompt: &Prompt) -> DialogView {
    match prompt {
        Prompt::SaveAnyway { missing } => DialogView {
            title: "Required fields are empty".to_string(),
            lines: missing.iter().map(|field| format!("• {}", field.title)).collect(),
            question: "Save anyway?".to_string(),
        },
        Prompt::Restart { keys } => DialogView {
            title: "Restart required".to_string(),
            lines: vec![format!("Changed: {}", keys.join(", "))],
            question: "Restart the system now?".to_string(),
        },
        Prompt::Reload => DialogView {
            title: "Reload configuration".to_string(),
            lines: vec!["Unsaved changes will be discarded.".to_string()],
            question: "Reload from the server?".to_string(),
        },
    }
}
