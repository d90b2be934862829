//! Collaborators the editor talks to: the config service, the preset
//! directory and the restart trigger.

mod error;
mod memory;

use async_trait::async_trait;
use indexmap::IndexMap;

use crate::domain::{ConfigItem, ModelGroup, ModelTypeOption, PresetRecord};

pub use error::ServiceError;
pub use memory::{MemoryConfigService, MemoryStore};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Values always cross this boundary as strings, JSON for structured ones.
#[async_trait]
pub trait ConfigService: Send + Sync {
    async fn get_config_list(&self, namespace: &str) -> ServiceResult<Vec<ConfigItem>>;

    async fn batch_update_config(
        &self,
        namespace: &str,
        values: &IndexMap<String, String>,
    ) -> ServiceResult<()>;

    /// Persist whatever was batch-updated into the namespace.
    async fn save_config(&self, namespace: &str) -> ServiceResult<()>;

    /// Drop unsaved backend changes and re-read the canonical values.
    async fn reload_config(&self, namespace: &str) -> ServiceResult<()>;

    async fn get_model_groups(&self) -> ServiceResult<IndexMap<String, ModelGroup>> {
        Ok(IndexMap::new())
    }

    async fn get_model_types(&self) -> ServiceResult<Vec<ModelTypeOption>> {
        Ok(Vec::new())
    }
}

#[async_trait]
pub trait PresetDirectory: Send + Sync {
    async fn list_presets(&self) -> ServiceResult<Vec<PresetRecord>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestartResponse {
    pub ok: bool,
}

#[async_trait]
pub trait RestartTrigger: Send + Sync {
    async fn restart_system(&self) -> ServiceResult<RestartResponse>;
}
