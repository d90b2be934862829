use std::path::{Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;
use indexmap::IndexMap;
use tracing::info;

use crate::{
    domain::{ConfigItem, ModelGroup, ModelTypeOption, PresetRecord},
    service::{ConfigService, MemoryConfigService, PresetDirectory, ServiceError, ServiceResult},
};

use super::document::{load_store, write_store};

/// Config backend stored in one document file.
///
/// Works like [`MemoryConfigService`]; `save_config` writes the document
/// first and only promotes the working copy once the write succeeded.
#[derive(Debug)]
pub struct FileConfigService {
    path: PathBuf,
    inner: MemoryConfigService,
}

impl FileConfigService {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let store = load_store(&path)?;
        info!(
            path = %path.display(),
            namespaces = store.namespaces.len(),
            "loaded config document"
        );
        Ok(Self {
            path,
            inner: MemoryConfigService::new(store),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn memory(&self) -> &MemoryConfigService {
        &self.inner
    }

    /// Namespaces present in the document, in file order.
    pub async fn namespaces(&self) -> Vec<String> {
        self.inner.working().await.namespaces.keys().cloned().collect()
    }
}

#[async_trait]
impl ConfigService for FileConfigService {
    async fn get_config_list(&self, namespace: &str) -> ServiceResult<Vec<ConfigItem>> {
        self.inner.get_config_list(namespace).await
    }

    async fn batch_update_config(
        &self,
        namespace: &str,
        values: &IndexMap<String, String>,
    ) -> ServiceResult<()> {
        self.inner.batch_update_config(namespace, values).await
    }

    async fn save_config(&self, namespace: &str) -> ServiceResult<()> {
        let items = self
            .inner
            .working()
            .await
            .namespaces
            .shift_remove(namespace)
            .ok_or_else(|| ServiceError::NamespaceNotFound(namespace.to_string()))?;
        let mut store = self.inner.persisted().await;
        store.namespaces.insert(namespace.to_string(), items);
        write_store(&self.path, &store).map_err(|err| ServiceError::Document {
            path: self.path.display().to_string(),
            message: format!("{err:#}"),
        })?;
        info!(namespace, path = %self.path.display(), "config document written");
        self.inner.save_config(namespace).await
    }

    async fn reload_config(&self, namespace: &str) -> ServiceResult<()> {
        self.inner.reload_config(namespace).await
    }

    async fn get_model_groups(&self) -> ServiceResult<IndexMap<String, ModelGroup>> {
        self.inner.get_model_groups().await
    }

    async fn get_model_types(&self) -> ServiceResult<Vec<ModelTypeOption>> {
        self.inner.get_model_types().await
    }
}

#[async_trait]
impl PresetDirectory for FileConfigService {
    async fn list_presets(&self) -> ServiceResult<Vec<PresetRecord>> {
        self.inner.list_presets().await
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::json;

    use super::*;

    const DOCUMENT: &str = r#"{
        "namespaces": {
            "system": [
                {"key": "name", "type": "str", "value": "bot"},
                {"key": "port", "type": "int", "value": 8080}
            ]
        }
    }"#;

    #[tokio::test]
    async fn save_writes_only_persisted_state_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, DOCUMENT).unwrap();
        let service = FileConfigService::open(&path).unwrap();
        assert_eq!(service.namespaces().await, vec!["system".to_string()]);

        let mut values = IndexMap::new();
        values.insert("port".to_string(), "9090".to_string());
        service.batch_update_config("system", &values).await.unwrap();
        let on_disk: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk["namespaces"]["system"][1]["value"], json!(8080));

        service.save_config("system").await.unwrap();
        let reopened = FileConfigService::open(&path).unwrap();
        let items = reopened.get_config_list("system").await.unwrap();
        assert_eq!(items[1].value, json!(9090));
    }

    #[tokio::test]
    async fn failed_write_keeps_the_previous_persisted_state() {
        let dir = tempfile::tempdir().unwrap();
        let parent = dir.path().join("conf");
        fs::create_dir(&parent).unwrap();
        let path = parent.join("config.json");
        fs::write(&path, DOCUMENT).unwrap();
        let service = FileConfigService::open(&path).unwrap();

        let mut values = IndexMap::new();
        values.insert("port".to_string(), "9090".to_string());
        service.batch_update_config("system", &values).await.unwrap();
        fs::remove_dir_all(&parent).unwrap();

        let err = service.save_config("system").await.unwrap_err();
        assert!(matches!(err, ServiceError::Document { .. }));
        let persisted = service.memory().persisted().await;
        assert_eq!(persisted.namespaces["system"][1].value, json!(8080));

        service.reload_config("system").await.unwrap();
        let items = service.get_config_list("system").await.unwrap();
        assert_eq!(items[1].value, json!(8080));
    }

    #[test]
    fn opening_a_missing_file_fails_with_context() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileConfigService::open(dir.path().join("absent.json")).unwrap_err();
        assert!(format!("{err:#}").contains("absent.json"));
    }
}
