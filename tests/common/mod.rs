#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use configtable::{
    ConfigEditor, ConfigItem, ConfigService, MemoryConfigService, MemoryStore, Notice, NoticeKind,
    Notifier, RestartResponse, RestartTrigger, ServiceError,
    domain::{ModelGroup, ModelTypeOption},
    service::ServiceResult,
};
use indexmap::IndexMap;

pub const NAMESPACE: &str = "system";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    Batch(Vec<(String, String)>),
    Save,
    Reload,
}

/// Memory-backed service that records every call and can be told to fail.
#[derive(Debug)]
pub struct RecordingService {
    inner: MemoryConfigService,
    calls: Mutex<Vec<Call>>,
    fail: Mutex<Option<&'static str>>,
}

impl RecordingService {
    pub fn new(items: Vec<ConfigItem>) -> Self {
        Self {
            inner: MemoryConfigService::new(
                MemoryStore::default().with_namespace(NAMESPACE, items),
            ),
            calls: Mutex::new(Vec::new()),
            fail: Mutex::new(None),
        }
    }

    /// Make the named call ("list", "batch", "save", "reload") fail.
    pub fn fail_on(&self, call: Option<&'static str>) {
        *self.fail.lock().unwrap() = call;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn batches(&self) -> Vec<Vec<(String, String)>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Batch(payload) => Some(payload),
                _ => None,
            })
            .collect()
    }

    pub fn memory(&self) -> &MemoryConfigService {
        &self.inner
    }

    fn record(&self, call: Call, name: &str) -> ServiceResult<()> {
        self.calls.lock().unwrap().push(call);
        if *self.fail.lock().unwrap() == Some(name) {
            return Err(ServiceError::backend(format!("{name} unavailable")));
        }
        Ok(())
    }
}

#[async_trait]
impl ConfigService for RecordingService {
    async fn get_config_list(&self, namespace: &str) -> ServiceResult<Vec<ConfigItem>> {
        self.record(Call::List, "list")?;
        self.inner.get_config_list(namespace).await
    }

    async fn batch_update_config(
        &self,
        namespace: &str,
        values: &IndexMap<String, String>,
    ) -> ServiceResult<()> {
        let payload = values
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        self.record(Call::Batch(payload), "batch")?;
        self.inner.batch_update_config(namespace, values).await
    }

    async fn save_config(&self, namespace: &str) -> ServiceResult<()> {
        self.record(Call::Save, "save")?;
        self.inner.save_config(namespace).await
    }

    async fn reload_config(&self, namespace: &str) -> ServiceResult<()> {
        self.record(Call::Reload, "reload")?;
        self.inner.reload_config(namespace).await
    }

    async fn get_model_groups(&self) -> ServiceResult<IndexMap<String, ModelGroup>> {
        self.inner.get_model_groups().await
    }

    async fn get_model_types(&self) -> ServiceResult<Vec<ModelTypeOption>> {
        self.inner.get_model_types().await
    }
}

#[derive(Debug, Default)]
pub struct CapturingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl CapturingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Notice> {
        self.notices.lock().unwrap().last().cloned()
    }

    pub fn count(&self, kind: NoticeKind) -> usize {
        self.notices()
            .iter()
            .filter(|notice| notice.kind == kind)
            .count()
    }
}

impl Notifier for CapturingNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        self.notices.lock().unwrap().push(Notice {
            kind,
            message: message.to_string(),
        });
    }
}

#[derive(Debug)]
pub struct FakeRestart {
    pub ok: bool,
    pub calls: Mutex<usize>,
}

impl FakeRestart {
    pub fn new(ok: bool) -> Self {
        Self {
            ok,
            calls: Mutex::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl RestartTrigger for FakeRestart {
    async fn restart_system(&self) -> ServiceResult<RestartResponse> {
        *self.calls.lock().unwrap() += 1;
        Ok(RestartResponse { ok: self.ok })
    }
}

pub struct Harness {
    pub editor: ConfigEditor,
    pub service: Arc<RecordingService>,
    pub notifier: Arc<CapturingNotifier>,
    pub restart: Arc<FakeRestart>,
}

pub async fn harness(items: Vec<ConfigItem>) -> Harness {
    harness_with(items, |editor| editor).await
}

pub async fn harness_with(
    items: Vec<ConfigItem>,
    configure: impl FnOnce(ConfigEditor) -> ConfigEditor,
) -> Harness {
    let service = Arc::new(RecordingService::new(items));
    let notifier = Arc::new(CapturingNotifier::default());
    let restart = Arc::new(FakeRestart::new(true));
    let editor = ConfigEditor::new(NAMESPACE, service.clone(), notifier.clone())
        .with_restart_trigger(restart.clone());
    let mut editor = configure(editor);
    editor.load().await.expect("initial load");
    service.clear_calls();
    Harness {
        editor,
        service,
        notifier,
        restart,
    }
}
