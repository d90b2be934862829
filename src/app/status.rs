use super::notify::{Notice, NoticeKind};

pub const READY_STATUS: &str = "Ready. Enter edits, Ctrl+S saves.";

#[derive(Debug, Clone)]
pub struct StatusLine {
    message: String,
    kind: NoticeKind,
}

impl Default for StatusLine {
    fn default() -> Self {
        Self {
            message: READY_STATUS.to_string(),
            kind: NoticeKind::Info,
        }
    }
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_raw(&mut self, msg: impl Into<String>) {
        self.message = msg.into();
        self.kind = NoticeKind::Info;
    }

    pub fn show(&mut self, notice: &Notice) {
        self.message = notice.message.clone();
        self.kind = notice.kind;
    }

    pub fn ready(&mut self) {
        *self = Self::default();
    }

    pub fn editing(&mut self, label: &str) {
        self.set_raw(format!("Editing {label}. Enter applies, Esc cancels."));
    }

    pub fn value_updated(&mut self) {
        self.set_raw("Value staged");
    }

    pub fn nothing_to_save(&mut self) {
        self.set_raw("No changes to save");
    }

    pub fn pending_exit(&mut self) {
        self.set_raw("Unsaved changes. Press Ctrl+Q again to quit without saving.");
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> NoticeKind {
        self.kind
    }
}
