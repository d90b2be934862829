use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use color_eyre::eyre::{Result, WrapErr};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub const LOG_ENV: &str = "CONFIGTABLE_LOG";
const DEFAULT_LEVEL: &str = "warn";

/// Install the global subscriber.
///
/// With a log file every event goes there. Without one, events go to stderr
/// unless `quiet` is set, which the terminal UI needs since it owns the screen.
pub fn init(log_file: Option<&Path>, quiet: bool) -> Result<()> {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));
    let registry = tracing_subscriber::registry().with(filter);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .wrap_err_with(|| format!("failed to open log file {}", path.display()))?;
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(Mutex::new(file));
            registry.with(layer).init();
        }
        None if quiet => registry.init(),
        None => {
            let layer = fmt::layer().with_target(false).with_writer(std::io::stderr);
            registry.with(layer).init();
        }
    }
    Ok(())
}
