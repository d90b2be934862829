use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::{
    ConfigItem, ModelGroup, ModelTypeOption, PresetRecord, ValueShape, deserialize_value,
};

use super::{ConfigService, PresetDirectory, ServiceError, ServiceResult};

/// Everything a config backend holds, in its on-disk layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryStore {
    pub namespaces: IndexMap<String, Vec<ConfigItem>>,
    pub presets: Vec<PresetRecord>,
    pub model_groups: IndexMap<String, ModelGroup>,
    pub model_types: Vec<ModelTypeOption>,
}

impl MemoryStore {
    pub fn with_namespace(mut self, namespace: impl Into<String>, items: Vec<ConfigItem>) -> Self {
        self.namespaces.insert(namespace.into(), items);
        self
    }
}

/// In-memory config backend.
///
/// Batch updates land in a working copy; `save_config` promotes the working
/// copy of a namespace to the persisted one and `reload_config` throws the
/// working copy away.
#[derive(Debug, Default)]
pub struct MemoryConfigService {
    working: RwLock<MemoryStore>,
    persisted: RwLock<MemoryStore>,
}

impl MemoryConfigService {
    pub fn new(store: MemoryStore) -> Self {
        Self {
            working: RwLock::new(store.clone()),
            persisted: RwLock::new(store),
        }
    }

    /// Snapshot of the persisted state.
    pub async fn persisted(&self) -> MemoryStore {
        self.persisted.read().await.clone()
    }

    /// Snapshot of the working state, including unsaved batch updates.
    pub async fn working(&self) -> MemoryStore {
        self.working.read().await.clone()
    }
}

fn decode_updates(
    items: &[ConfigItem],
    values: &IndexMap<String, String>,
) -> ServiceResult<Vec<(usize, Value)>> {
    values
        .iter()
        .map(|(key, raw)| {
            let index = items
                .iter()
                .position(|item| &item.key == key)
                .ok_or_else(|| ServiceError::backend(format!("unknown config key: {key}")))?;
            let shape = ValueShape::of(&items[index]);
            let value = deserialize_value(raw, shape).map_err(|err| {
                ServiceError::backend(format!("invalid value for {key}: {}", err.message))
            })?;
            Ok((index, value))
        })
        .collect()
}

#[async_trait]
impl ConfigService for MemoryConfigService {
    async fn get_config_list(&self, namespace: &str) -> ServiceResult<Vec<ConfigItem>> {
        let store = self.working.read().await;
        store
            .namespaces
            .get(namespace)
            .cloned()
            .ok_or_else(|| ServiceError::NamespaceNotFound(namespace.to_string()))
    }

    async fn batch_update_config(
        &self,
        namespace: &str,
        values: &IndexMap<String, String>,
    ) -> ServiceResult<()> {
        let mut store = self.working.write().await;
        let items = store
            .namespaces
            .get_mut(namespace)
            .ok_or_else(|| ServiceError::NamespaceNotFound(namespace.to_string()))?;
        // Decode everything first so a bad value leaves the namespace untouched.
        let updates = decode_updates(items, values)?;
        for (index, value) in updates {
            items[index].value = value;
        }
        debug!(namespace, keys = values.len(), "applied batch update");
        Ok(())
    }

    async fn save_config(&self, namespace: &str) -> ServiceResult<()> {
        let working = self.working.read().await;
        let items = working
            .namespaces
            .get(namespace)
            .cloned()
            .ok_or_else(|| ServiceError::NamespaceNotFound(namespace.to_string()))?;
        drop(working);
        self.persisted
            .write()
            .await
            .namespaces
            .insert(namespace.to_string(), items);
        debug!(namespace, "persisted namespace");
        Ok(())
    }

    async fn reload_config(&self, namespace: &str) -> ServiceResult<()> {
        let persisted = self.persisted.read().await;
        let items = persisted
            .namespaces
            .get(namespace)
            .cloned()
            .ok_or_else(|| ServiceError::NamespaceNotFound(namespace.to_string()))?;
        drop(persisted);
        self.working
            .write()
            .await
            .namespaces
            .insert(namespace.to_string(), items);
        Ok(())
    }

    async fn get_model_groups(&self) -> ServiceResult<IndexMap<String, ModelGroup>> {
        Ok(self.working.read().await.model_groups.clone())
    }

    async fn get_model_types(&self) -> ServiceResult<Vec<ModelTypeOption>> {
        Ok(self.working.read().await.model_types.clone())
    }
}

#[async_trait]
impl PresetDirectory for MemoryConfigService {
    async fn list_presets(&self) -> ServiceResult<Vec<PresetRecord>> {
        Ok(self.working.read().await.presets.clone())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::FieldType;

    fn service() -> MemoryConfigService {
        let mut ports = ConfigItem::new("ports", FieldType::List, json!([80]));
        ports.element_type = Some(FieldType::Int);
        MemoryConfigService::new(MemoryStore::default().with_namespace(
            "system",
            vec![ConfigItem::new("name", FieldType::Str, json!("bot")), ports],
        ))
    }

    fn payload(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn batch_update_stays_unsaved_until_save() {
        let service = service();
        service
            .batch_update_config("system", &payload(&[("ports", "[80,443]")]))
            .await
            .unwrap();
        let items = service.get_config_list("system").await.unwrap();
        assert_eq!(items[1].value, json!([80, 443]));
        assert_eq!(
            service.persisted().await.namespaces["system"][1].value,
            json!([80])
        );

        service.save_config("system").await.unwrap();
        assert_eq!(
            service.persisted().await.namespaces["system"][1].value,
            json!([80, 443])
        );
    }

    #[tokio::test]
    async fn reload_discards_working_changes() {
        let service = service();
        service
            .batch_update_config("system", &payload(&[("name", "other")]))
            .await
            .unwrap();
        service.reload_config("system").await.unwrap();
        let items = service.get_config_list("system").await.unwrap();
        assert_eq!(items[0].value, json!("bot"));
    }

    #[tokio::test]
    async fn bad_values_reject_the_whole_batch() {
        let service = service();
        let err = service
            .batch_update_config("system", &payload(&[("name", "x"), ("ports", "{")]))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("ports"));
        let items = service.get_config_list("system").await.unwrap();
        assert_eq!(items[0].value, json!("bot"));

        let err = service.get_config_list("missing").await.unwrap_err();
        assert!(matches!(err, ServiceError::NamespaceNotFound(_)));
    }
}
