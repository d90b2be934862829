#![deny(rust_2018_idioms)]

pub mod app;
pub mod domain;
pub mod form;
pub mod io;
#[cfg(feature = "tui")]
mod presentation;
pub mod service;

pub use app::{
    CommitPhase, ConfigEditor, EditorError, EditorOptions, MissingField, Notice, NoticeKind,
    NotificationChannel, Notifier, Prompt, SaveMode, SaveOutcome,
};
#[cfg(feature = "tui")]
pub use app::ConfigTable;
pub use domain::{ConfigItem, FieldType, SchemaDefect, SubFieldSchema, lint_items};
pub use io::{DocumentFormat, FileConfigService};
pub use service::{
    ConfigService, MemoryConfigService, MemoryStore, PresetDirectory, RestartResponse,
    RestartTrigger, ServiceError,
};

pub mod prelude {
    pub use super::{
        ConfigEditor, ConfigItem, ConfigService, EditorOptions, NotificationChannel, SaveMode,
        SaveOutcome,
    };
    #[cfg(feature = "tui")]
    pub use super::ConfigTable;
}
