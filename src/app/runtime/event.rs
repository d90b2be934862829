use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::warn;

#[derive(Debug, Clone)]
pub(crate) enum TermEvent {
    Key(KeyEvent),
    Paste(String),
    Resize,
    Tick,
}

/// Reads terminal events on a blocking thread and forwards them.
pub(crate) struct EventReader {
    receiver: mpsc::UnboundedReceiver<TermEvent>,
    handle: JoinHandle<()>,
}

impl EventReader {
    pub(crate) fn start(tick_rate: Duration) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let handle = tokio::task::spawn_blocking(move || {
            while !sender.is_closed() {
                let next = match event::poll(tick_rate) {
                    Ok(true) => match event::read() {
                        Ok(CrosstermEvent::Key(key)) => TermEvent::Key(key),
                        Ok(CrosstermEvent::Paste(text)) => TermEvent::Paste(text),
                        Ok(CrosstermEvent::Resize(..)) => TermEvent::Resize,
                        Ok(_) => continue,
                        Err(err) => {
                            warn!(error = %err, "failed to read terminal event");
                            continue;
                        }
                    },
                    Ok(false) => TermEvent::Tick,
                    Err(err) => {
                        warn!(error = %err, "failed to poll terminal events");
                        break;
                    }
                };
                if sender.send(next).is_err() {
                    break;
                }
            }
        });
        Self { receiver, handle }
    }

    pub(crate) async fn next(&mut self) -> Option<TermEvent> {
        self.receiver.recv().await
    }

    /// Close the channel; the reader thread exits after its next poll.
    pub(crate) fn stop(mut self) {
        self.receiver.close();
        drop(self.handle);
    }
}
