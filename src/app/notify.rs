//! User-visible notifications, published on a broadcast channel.

use std::fmt;

use tokio::sync::broadcast;

const DEFAULT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Info,
    Warning,
    Error,
}

impl fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NoticeKind::Success => "success",
            NoticeKind::Info => "info",
            NoticeKind::Warning => "warning",
            NoticeKind::Error => "error",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

/// Sink for the editor's success and failure messages.
pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NoticeKind, message: &str);
}

/// Broadcast-backed [`Notifier`]; any number of views can subscribe.
#[derive(Debug, Clone)]
pub struct NotificationChannel {
    sender: broadcast::Sender<Notice>,
}

impl NotificationChannel {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(DEFAULT_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.sender.subscribe()
    }
}

impl Default for NotificationChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for NotificationChannel {
    fn notify(&self, kind: NoticeKind, message: &str) {
        // No subscribers is fine.
        let _ = self.sender.send(Notice {
            kind,
            message: message.to_string(),
        });
    }
}
