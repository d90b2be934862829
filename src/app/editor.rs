use std::{fmt, sync::Arc};

use tracing::{debug, info, warn};

use crate::{
    domain::{ConfigItem, ReferenceData, lint_items},
    form::{self, EditState, PathSegment, Row, RowContext, table_rows},
    service::{ConfigService, PresetDirectory, RestartResponse, RestartTrigger, ServiceError},
};

use super::{
    commit::{CommitPhase, MissingField, SaveMode, SaveOutcome, missing_required, restart_keys},
    error::EditorError,
    notify::{NoticeKind, Notifier},
    options::EditorOptions,
};

/// A confirmation the editor is waiting on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    SaveAnyway { missing: Vec<MissingField> },
    Restart { keys: Vec<String> },
    Reload,
}

type RefreshHook = Arc<dyn Fn() + Send + Sync>;

/// Editing session over one config namespace.
///
/// Owns the loaded items and the [`EditState`]; every change goes through
/// `&mut self`, service calls are awaited in order.
pub struct ConfigEditor {
    namespace: String,
    service: Arc<dyn ConfigService>,
    presets: Option<Arc<dyn PresetDirectory>>,
    restart: Option<Arc<dyn RestartTrigger>>,
    notifier: Arc<dyn Notifier>,
    on_refresh: Option<RefreshHook>,
    options: EditorOptions,
    items: Vec<ConfigItem>,
    state: EditState,
    refs: ReferenceData,
    phase: CommitPhase,
    prompt: Option<Prompt>,
    restarting: bool,
}

impl fmt::Debug for ConfigEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigEditor")
            .field("namespace", &self.namespace)
            .field("items", &self.items.len())
            .field("dirty", &self.state.dirty_count())
            .field("phase", &self.phase)
            .field("prompt", &self.prompt)
            .finish()
    }
}

impl ConfigEditor {
    pub fn new(
        namespace: impl Into<String>,
        service: Arc<dyn ConfigService>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            service,
            presets: None,
            restart: None,
            notifier,
            on_refresh: None,
            options: EditorOptions::default(),
            items: Vec::new(),
            state: EditState::default(),
            refs: ReferenceData::default(),
            phase: CommitPhase::Clean,
            prompt: None,
            restarting: false,
        }
    }

    pub fn with_options(mut self, options: EditorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_presets(mut self, presets: Arc<dyn PresetDirectory>) -> Self {
        self.presets = Some(presets);
        self
    }

    pub fn with_restart_trigger(mut self, trigger: Arc<dyn RestartTrigger>) -> Self {
        self.restart = Some(trigger);
        self
    }

    /// Called after every successful save, before the namespace is re-read.
    pub fn with_refresh_hook(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_refresh = Some(Arc::new(hook));
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    pub fn items(&self) -> &[ConfigItem] {
        &self.items
    }

    pub fn item(&self, key: &str) -> Option<&ConfigItem> {
        self.items.iter().find(|item| item.key == key)
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn refs(&self) -> &ReferenceData {
        &self.refs
    }

    pub fn prompt(&self) -> Option<&Prompt> {
        self.prompt.as_ref()
    }

    pub fn is_restarting(&self) -> bool {
        self.restarting
    }

    pub fn can_save(&self) -> bool {
        self.state.has_changes()
    }

    pub fn phase(&self) -> CommitPhase {
        match self.phase {
            CommitPhase::Clean | CommitPhase::Dirty if self.state.has_changes() => {
                CommitPhase::Dirty
            }
            CommitPhase::Dirty => CommitPhase::Clean,
            phase => phase,
        }
    }

    /// Fetch the namespace and seed the edit state from it.
    pub async fn load(&mut self) -> Result<(), EditorError> {
        let items = self.fetch_items("load").await?;
        self.install(items, false);
        Ok(())
    }

    /// Fetch the option lists used by the cross-reference widgets.
    ///
    /// A failing source is reported and leaves its previous list in place.
    pub async fn load_references(&mut self) -> Result<(), EditorError> {
        let groups = self.service.get_model_groups().await;
        let types = self.service.get_model_types().await;
        let presets = match &self.presets {
            Some(directory) => Some(directory.list_presets().await),
            None => None,
        };

        let mut first_error = None;
        match groups {
            Ok(groups) => self.refs.model_groups = groups,
            Err(err) => first_error = first_error.or(Some(err)),
        }
        match types {
            Ok(types) => self.refs.model_types = types,
            Err(err) => first_error = first_error.or(Some(err)),
        }
        match presets {
            Some(Ok(presets)) => self.refs.presets = presets,
            Some(Err(err)) => first_error = first_error.or(Some(err)),
            None => {}
        }

        match first_error {
            Some(err) => Err(self.report("load reference data", err)),
            None => Ok(()),
        }
    }

    pub fn rows(&self) -> Vec<Row> {
        table_rows(&RowContext {
            items: &self.items,
            state: &self.state,
            refs: &self.refs,
            locale: self.options.locale(),
            override_mode: self.options.override_mode,
            model_group_route: &self.options.model_group_route,
        })
    }

    /// Stage `value` as the whole serialized value of `key`.
    pub fn stage(&mut self, key: &str, value: impl Into<String>) -> Result<(), EditorError> {
        find_item(&self.items, key)?;
        self.state.stage(key, value);
        self.mark_edited();
        Ok(())
    }

    pub fn set_element(
        &mut self,
        key: &str,
        path: &[PathSegment],
        raw: &str,
    ) -> Result<(), EditorError> {
        let item = find_item(&self.items, key)?;
        form::set_element(item, &mut self.state, path, raw)?;
        self.mark_edited();
        Ok(())
    }

    pub fn delete_element(&mut self, key: &str, path: &[PathSegment]) -> Result<(), EditorError> {
        let item = find_item(&self.items, key)?;
        form::delete_element(item, &mut self.state, path)?;
        self.mark_edited();
        Ok(())
    }

    pub fn append_element(&mut self, key: &str, path: &[PathSegment]) -> Result<(), EditorError> {
        let item = find_item(&self.items, key)?;
        form::append_element(item, &mut self.state, path)?;
        self.mark_edited();
        Ok(())
    }

    /// Add `new_key` to the map at `path`. Existing keys are left alone and
    /// reported as `false`.
    pub fn insert_key(
        &mut self,
        key: &str,
        path: &[PathSegment],
        new_key: &str,
    ) -> Result<bool, EditorError> {
        let item = find_item(&self.items, key)?;
        let inserted = form::insert_key(item, &mut self.state, path, new_key)?;
        if inserted {
            self.mark_edited();
        }
        Ok(inserted)
    }

    pub fn toggle_expanded(&mut self, expand_key: &str) -> bool {
        self.state.toggle_expanded(expand_key)
    }

    pub fn toggle_revealed(&mut self, key: &str) -> bool {
        self.state.toggle_revealed(key)
    }

    /// Validate, then send exactly the dirty keys and persist them.
    pub async fn save(&mut self, mode: SaveMode) -> Result<SaveOutcome, EditorError> {
        if !self.state.has_changes() {
            return Ok(SaveOutcome::NothingToSave);
        }

        if mode == SaveMode::Normal {
            self.phase = CommitPhase::Validating;
            let missing = missing_required(
                &self.items,
                &self.state,
                self.options.override_mode,
                self.options.locale(),
            );
            if !missing.is_empty() {
                debug!(
                    namespace = %self.namespace,
                    missing = missing.len(),
                    "save blocked on required fields"
                );
                self.phase = CommitPhase::BlockedOnRequired;
                self.prompt = Some(Prompt::SaveAnyway {
                    missing: missing.clone(),
                });
                return Ok(SaveOutcome::Blocked { missing });
            }
        }

        self.phase = CommitPhase::Saving;
        self.prompt = None;
        let payload = self.state.dirty_payload();
        let keys: Vec<&String> = payload.keys().collect();
        info!(namespace = %self.namespace, keys = ?keys, "saving config");

        let batched = self
            .service
            .batch_update_config(&self.namespace, &payload)
            .await;
        if let Err(err) = batched {
            self.phase = CommitPhase::Dirty;
            return Err(self.report("save", err));
        }
        let persisted = self.service.save_config(&self.namespace).await;
        if let Err(err) = persisted {
            self.phase = CommitPhase::Dirty;
            return Err(self.report("save", err));
        }

        let restart = restart_keys(&self.items, payload.keys().map(String::as_str));
        self.state.clear_dirty();
        self.phase = CommitPhase::Clean;
        self.notifier.notify(NoticeKind::Success, "Configuration saved");

        if let Some(hook) = &self.on_refresh {
            hook();
        }
        match self.service.get_config_list(&self.namespace).await {
            Ok(items) => self.install(items, false),
            Err(err) => {
                warn!(namespace = %self.namespace, error = %err, "refresh after save failed");
                self.notifier.notify(
                    NoticeKind::Warning,
                    &format!("Saved, but refreshing failed: {err}"),
                );
            }
        }

        if !restart.is_empty() {
            info!(namespace = %self.namespace, keys = ?restart, "saved keys need a restart");
            self.prompt = Some(Prompt::Restart {
                keys: restart.clone(),
            });
        }
        Ok(SaveOutcome::Saved {
            restart_keys: restart,
        })
    }

    /// Accept the pending prompt.
    pub async fn confirm(&mut self) -> Result<Option<SaveOutcome>, EditorError> {
        match self.prompt.clone() {
            Some(Prompt::SaveAnyway { .. }) => self.save(SaveMode::Force).await.map(Some),
            Some(Prompt::Restart { .. }) => self.confirm_restart().await.map(|_| None),
            Some(Prompt::Reload) => self.confirm_reload().await.map(|_| None),
            None => Ok(None),
        }
    }

    /// Dismiss the pending prompt without acting on it.
    pub fn cancel(&mut self) {
        if self.phase == CommitPhase::BlockedOnRequired {
            self.phase = CommitPhase::Dirty;
        }
        self.prompt = None;
    }

    /// Ask the restart trigger to restart the system. Returns whether the
    /// backend accepted.
    pub async fn confirm_restart(&mut self) -> Result<bool, EditorError> {
        let trigger = self.begin_restart()?;
        let response = trigger.restart_system().await;
        self.finish_restart(response)
    }

    /// Claim the restart slot and hand out the trigger to run it.
    ///
    /// Edits stay available until [`finish_restart`](Self::finish_restart)
    /// reports the response; a second claim in between is refused.
    pub fn begin_restart(&mut self) -> Result<Arc<dyn RestartTrigger>, EditorError> {
        self.dismiss_restart();
        if self.restarting {
            self.notifier
                .notify(NoticeKind::Warning, "A restart is already in progress");
            return Err(EditorError::RestartInProgress);
        }
        let Some(trigger) = self.restart.clone() else {
            self.notifier.notify(NoticeKind::Error, "Restart is not available");
            return Err(EditorError::RestartUnavailable);
        };
        debug!("restart started");
        self.restarting = true;
        Ok(trigger)
    }

    /// Release the restart slot and report the trigger's response.
    pub fn finish_restart(
        &mut self,
        response: Result<RestartResponse, ServiceError>,
    ) -> Result<bool, EditorError> {
        self.restarting = false;
        match response {
            Ok(response) if response.ok => {
                info!("restart requested");
                self.notifier.notify(NoticeKind::Success, "Restart requested");
                Ok(true)
            }
            Ok(_) => {
                warn!("restart refused by backend");
                self.notifier.notify(NoticeKind::Error, "Restart failed");
                Ok(false)
            }
            Err(err) => Err(self.report("restart", err)),
        }
    }

    pub fn dismiss_restart(&mut self) {
        if matches!(self.prompt, Some(Prompt::Restart { .. })) {
            self.prompt = None;
        }
    }

    /// Arm the reload confirmation; nothing is discarded yet.
    pub fn request_reload(&mut self) {
        self.prompt = Some(Prompt::Reload);
    }

    /// Reload the namespace from the backend, discarding every staged edit.
    pub async fn confirm_reload(&mut self) -> Result<(), EditorError> {
        self.prompt = None;
        let reloaded = self.service.reload_config(&self.namespace).await;
        if let Err(err) = reloaded {
            return Err(self.report("reload", err));
        }
        let items = self.fetch_items("reload").await?;
        self.install(items, true);
        self.notifier.notify(NoticeKind::Info, "Configuration reloaded");
        Ok(())
    }

    async fn fetch_items(&self, action: &str) -> Result<Vec<ConfigItem>, EditorError> {
        match self.service.get_config_list(&self.namespace).await {
            Ok(items) => Ok(items),
            Err(err) => Err(self.report(action, err)),
        }
    }

    fn install(&mut self, items: Vec<ConfigItem>, discard_ui: bool) {
        for defect in lint_items(&items) {
            warn!(namespace = %self.namespace, %defect, "schema defect");
        }
        if discard_ui {
            self.state.reset(&items);
        } else {
            self.state.seed(&items);
        }
        debug!(namespace = %self.namespace, items = items.len(), "edit state seeded");
        self.items = items;
        self.phase = CommitPhase::Clean;
    }

    fn mark_edited(&mut self) {
        if matches!(self.phase, CommitPhase::Clean) {
            self.phase = CommitPhase::Dirty;
        }
    }

    fn report(&self, action: &str, err: ServiceError) -> EditorError {
        warn!(namespace = %self.namespace, action, error = %err, "config service call failed");
        self.notifier
            .notify(NoticeKind::Error, &format!("Failed to {action}: {err}"));
        EditorError::Service(err)
    }
}

fn find_item<'a>(items: &'a [ConfigItem], key: &str) -> Result<&'a ConfigItem, EditorError> {
    items
        .iter()
        .find(|item| item.key == key)
        .ok_or_else(|| EditorError::UnknownKey(key.to_string()))
}
