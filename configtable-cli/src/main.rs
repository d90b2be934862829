//! `configtable`: edit the config namespaces stored in one document file.
//!
//! Without a subcommand the namespace opens in the interactive table.
//! `show`, `set` and `lint` work without a terminal UI.

mod logging;
mod restart;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Report, Result, eyre};
use serde_json::{Map, Value};
use tracing::{info, warn};

use configtable::{
    ConfigEditor, ConfigService, ConfigTable, EditorOptions, FileConfigService, NoticeKind,
    NotificationChannel, Notifier, SaveMode, SaveOutcome, lint_items,
};

use crate::restart::CommandRestartTrigger;

#[derive(Debug, Parser)]
#[command(
    name = "configtable",
    version,
    about = "Edit schema-described config namespaces as a table"
)]
struct Cli {
    /// Config document (.json, .yaml/.yml or .toml)
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    file: PathBuf,

    /// Namespace to edit; defaults to the first one in the document
    #[arg(short = 'n', long = "namespace", value_name = "NAME")]
    namespace: Option<String>,

    /// Treat the namespace as an override page (enable toggles gate fields)
    #[arg(long = "override")]
    override_mode: bool,

    /// Locale used for localized titles and descriptions
    #[arg(long = "locale", value_name = "TAG")]
    locale: Option<String>,

    /// Shell command run when a restart is confirmed
    #[arg(long = "restart-cmd", value_name = "COMMAND")]
    restart_cmd: Option<String>,

    /// Append logs to this file (filter with CONFIGTABLE_LOG)
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Open the interactive table (default)
    Tui {
        /// Title shown at the top of the table
        #[arg(long = "title", value_name = "TEXT")]
        title: Option<String>,
    },
    /// Print the namespace's current values
    Show {
        /// Print secret values instead of masking them
        #[arg(long = "reveal")]
        reveal: bool,
        /// Print a JSON object instead of aligned text
        #[arg(long = "json")]
        json: bool,
    },
    /// Stage KEY=VALUE pairs and commit them as one batch
    Set {
        #[arg(value_name = "KEY=VALUE", required = true, value_parser = parse_assignment)]
        assignments: Vec<(String, String)>,
        /// Save even when required fields are empty
        #[arg(long = "force")]
        force: bool,
        /// Run the restart command when a saved field needs it
        #[arg(long = "restart")]
        restart: bool,
    },
    /// Report structural problems in the namespace's item list
    Lint,
}

impl Default for Command {
    fn default() -> Self {
        Command::Tui { title: None }
    }
}

impl Command {
    fn is_interactive(&self) -> bool {
        matches!(self, Command::Tui { .. })
    }
}

/// Prints editor notices on stderr for the non-interactive commands.
#[derive(Debug, Default)]
struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        eprintln!("[{kind}] {message}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let mut cli = Cli::parse();
    let command = cli.command.take().unwrap_or_default();

    logging::init(cli.log_file.as_deref(), command.is_interactive())?;

    let service = Arc::new(FileConfigService::open(&cli.file).map_err(from_anyhow)?);
    let namespace = resolve_namespace(&cli, &service).await?;
    info!(namespace = %namespace, path = %cli.file.display(), "opened config document");

    match command {
        Command::Tui { title } => run_tui(&cli, service, namespace, title).await,
        Command::Show { reveal, json } => {
            let editor = load_editor(&cli, service, namespace, Arc::new(StderrNotifier)).await?;
            show(&editor, reveal, json)
        }
        Command::Set {
            assignments,
            force,
            restart,
        } => {
            let editor = load_editor(&cli, service, namespace, Arc::new(StderrNotifier)).await?;
            set(editor, assignments, force, restart).await
        }
        Command::Lint => lint(service.as_ref(), &namespace).await,
    }
}

fn from_anyhow(err: impl std::fmt::Display) -> Report {
    eyre!("{err:#}")
}

fn parse_assignment(raw: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

async fn resolve_namespace(cli: &Cli, service: &FileConfigService) -> Result<String> {
    let namespaces = service.namespaces().await;
    match &cli.namespace {
        Some(wanted) if namespaces.contains(wanted) => Ok(wanted.clone()),
        Some(wanted) => Err(eyre!(
            "namespace '{wanted}' not found in {} (available: {})",
            cli.file.display(),
            namespaces.join(", ")
        )),
        None => namespaces
            .into_iter()
            .next()
            .ok_or_else(|| eyre!("{} defines no namespaces", cli.file.display())),
    }
}

fn editor_options(cli: &Cli) -> EditorOptions {
    let mut options = EditorOptions::default().with_override_mode(cli.override_mode);
    if let Some(locale) = &cli.locale {
        options = options.with_locale(locale.clone());
    }
    options
}

async fn load_editor(
    cli: &Cli,
    service: Arc<FileConfigService>,
    namespace: String,
    notifier: Arc<dyn Notifier>,
) -> Result<ConfigEditor> {
    let mut editor = ConfigEditor::new(namespace, service.clone(), notifier)
        .with_options(editor_options(cli))
        .with_presets(service);
    if let Some(command) = &cli.restart_cmd {
        editor = editor.with_restart_trigger(Arc::new(CommandRestartTrigger::new(command.clone())));
    }
    editor.load().await?;
    if let Err(err) = editor.load_references().await {
        warn!(error = %err, "reference lists unavailable");
    }
    Ok(editor)
}

async fn run_tui(
    cli: &Cli,
    service: Arc<FileConfigService>,
    namespace: String,
    title: Option<String>,
) -> Result<()> {
    let channel = NotificationChannel::new();
    let notices = channel.subscribe();
    let editor = load_editor(cli, service, namespace, Arc::new(channel)).await?;

    let mut table = ConfigTable::new(editor).with_notices(notices);
    if let Some(title) = title {
        table = table.with_title(title);
    }
    let editor = table.run().await.map_err(from_anyhow)?;
    if editor.can_save() {
        eprintln!(
            "discarded {} unsaved change(s)",
            editor.state().dirty_count()
        );
    }
    Ok(())
}

fn display_value(editor: &ConfigEditor, key: &str, reveal: bool) -> String {
    let staged = editor.state().staged(key).unwrap_or_default();
    let secret = editor.item(key).is_some_and(|item| item.is_secret);
    if secret && !reveal && !staged.is_empty() {
        let mask = editor.options().secret_mask;
        return std::iter::repeat_n(mask, staged.chars().count().min(12)).collect();
    }
    staged.to_string()
}

fn show(editor: &ConfigEditor, reveal: bool, json: bool) -> Result<()> {
    let visible: Vec<_> = editor.items().iter().filter(|item| !item.is_hidden).collect();

    if json {
        let object = visible
            .iter()
            .map(|item| {
                let value = if item.is_secret && !reveal {
                    Value::String(display_value(editor, &item.key, false))
                } else {
                    item.value.clone()
                };
                (item.key.clone(), value)
            })
            .collect::<Map<String, Value>>();
        println!("{}", serde_json::to_string_pretty(&Value::Object(object))?);
        return Ok(());
    }

    let width = visible.iter().map(|item| item.key.len()).max().unwrap_or(0);
    for item in visible {
        let mut markers = String::new();
        if item.required {
            markers.push_str(" *");
        }
        if item.needs_restart() {
            markers.push_str(" (restart)");
        }
        println!(
            "{:<width$}  {}{}",
            item.key,
            display_value(editor, &item.key, reveal),
            markers
        );
    }
    Ok(())
}

async fn set(
    mut editor: ConfigEditor,
    assignments: Vec<(String, String)>,
    force: bool,
    restart: bool,
) -> Result<()> {
    for (key, value) in assignments {
        editor.stage(&key, value)?;
    }
    let mode = if force { SaveMode::Force } else { SaveMode::Normal };
    match editor.save(mode).await? {
        SaveOutcome::NothingToSave => println!("nothing to save"),
        SaveOutcome::Blocked { missing } => {
            let fields: Vec<String> = missing
                .iter()
                .map(|field| format!("{} ({})", field.title, field.key))
                .collect();
            return Err(eyre!(
                "required fields are empty: {}; pass --force to save anyway",
                fields.join(", ")
            ));
        }
        SaveOutcome::Saved { restart_keys } => {
            if restart_keys.is_empty() {
                return Ok(());
            }
            if restart {
                if !editor.confirm_restart().await? {
                    return Err(eyre!("restart command reported failure"));
                }
            } else {
                println!("restart required for: {}", restart_keys.join(", "));
            }
        }
    }
    Ok(())
}

async fn lint(service: &FileConfigService, namespace: &str) -> Result<()> {
    let items = service.get_config_list(namespace).await?;
    let defects = lint_items(&items);
    if defects.is_empty() {
        println!("{namespace}: {} items, no defects", items.len());
        return Ok(());
    }
    for defect in &defects {
        println!("{namespace}: {defect}");
    }
    Err(eyre!("{} schema defect(s) found", defects.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignments_split_on_the_first_equals_sign() {
        assert_eq!(
            parse_assignment("url=http://x/?a=b").unwrap(),
            ("url".to_string(), "http://x/?a=b".to_string())
        );
        assert_eq!(
            parse_assignment("empty=").unwrap(),
            ("empty".to_string(), String::new())
        );
        assert!(parse_assignment("novalue").is_err());
        assert!(parse_assignment("=1").is_err());
    }

    #[test]
    fn missing_subcommand_opens_the_table() {
        let cli = Cli::parse_from(["configtable", "--file", "config.json"]);
        assert!(cli.command.unwrap_or_default().is_interactive());
        let cli = Cli::parse_from(["configtable", "-f", "config.json", "set", "a=1", "--force"]);
        assert!(matches!(cli.command, Some(Command::Set { force: true, .. })));
    }
}
