mod commit;
mod editor;
mod error;
mod notify;
mod options;

#[cfg(feature = "tui")]
mod config_table;
#[cfg(feature = "tui")]
mod input;
#[cfg(feature = "tui")]
mod line_input;
#[cfg(feature = "tui")]
mod popup;
#[cfg(feature = "tui")]
mod runtime;
#[cfg(feature = "tui")]
mod status;
#[cfg(feature = "tui")]
mod terminal;

pub use commit::{CommitPhase, MissingField, SaveMode, SaveOutcome, missing_required, restart_keys};
#[cfg(feature = "tui")]
pub use config_table::ConfigTable;
pub use editor::{ConfigEditor, Prompt};
pub use error::EditorError;
pub use notify::{Notice, NoticeKind, NotificationChannel, Notifier};
pub use options::{DEFAULT_MODEL_GROUP_ROUTE, EditorOptions};
