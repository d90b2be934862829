//! Validation and restart bookkeeping for the commit pipeline.

use crate::{
    domain::{ConfigItem, serialize_value},
    form::{EditState, is_gated_off},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitPhase {
    Clean,
    Dirty,
    Validating,
    BlockedOnRequired,
    Saving,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveMode {
    #[default]
    Normal,
    /// Skip the required-field check, nothing else.
    Force,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingField {
    pub key: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    NothingToSave,
    Blocked { missing: Vec<MissingField> },
    Saved { restart_keys: Vec<String> },
}

impl SaveOutcome {
    pub fn needs_restart(&self) -> bool {
        matches!(self, SaveOutcome::Saved { restart_keys } if !restart_keys.is_empty())
    }
}

fn is_blank(staged: &str) -> bool {
    staged.is_empty() || staged == "[]"
}

/// Required items whose staged value is empty, skipping items switched off
/// by their toggle on override pages.
pub fn missing_required(
    items: &[ConfigItem],
    state: &EditState,
    override_mode: bool,
    locale: Option<&str>,
) -> Vec<MissingField> {
    items
        .iter()
        .filter(|item| item.required)
        .filter(|item| !is_gated_off(item, items, state, override_mode))
        .filter(|item| {
            let staged = match state.staged(&item.key) {
                Some(staged) => staged.to_string(),
                None => serialize_value(&item.value),
            };
            is_blank(&staged)
        })
        .map(|item| MissingField {
            key: item.key.clone(),
            title: item.display_title(locale),
        })
        .collect()
}

/// Committed keys whose items ask for a restart.
pub fn restart_keys<'a>(
    items: &[ConfigItem],
    committed: impl IntoIterator<Item = &'a str>,
) -> Vec<String> {
    committed
        .into_iter()
        .filter(|key| {
            items
                .iter()
                .any(|item| item.key == *key && item.needs_restart())
        })
        .map(str::to_string)
        .collect()
}
