use anyhow::{Context, Result};
use tokio::sync::broadcast;

use super::{editor::ConfigEditor, notify::Notice, runtime::App};

/// Interactive terminal table over a loaded [`ConfigEditor`].
#[derive(Debug)]
pub struct ConfigTable {
    editor: ConfigEditor,
    title: Option<String>,
    notices: Option<broadcast::Receiver<Notice>>,
}

impl ConfigTable {
    pub fn new(editor: ConfigEditor) -> Self {
        Self {
            editor,
            title: None,
            notices: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Show notifications from this receiver in the status line.
    pub fn with_notices(mut self, notices: broadcast::Receiver<Notice>) -> Self {
        self.notices = Some(notices);
        self
    }

    /// Run until the user quits and hand the editor back.
    pub async fn run(self) -> Result<ConfigEditor> {
        let ConfigTable {
            editor,
            title,
            notices,
        } = self;
        let title = title.unwrap_or_else(|| format!(" {} ", editor.namespace()));
        let mut app = App::new(editor, title, notices);
        app.run().await.context("terminal session failed")?;
        Ok(app.into_editor())
    }
}
