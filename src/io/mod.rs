mod document;
mod file_service;
mod format;

pub use document::{load_store, parse_store, render_store, write_store};
pub use file_service::FileConfigService;
pub use format::DocumentFormat;
