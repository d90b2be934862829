use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A model group as returned by the config service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelGroup {
    pub model_type: Option<String>,
    pub models: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelTypeOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetRecord {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub remote: bool,
}

/// Option lists the cross-reference widgets resolve against.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub model_groups: IndexMap<String, ModelGroup>,
    pub model_types: Vec<ModelTypeOption>,
    pub presets: Vec<PresetRecord>,
}

impl ReferenceData {
    /// Group names usable for a field, filtered by its declared model type.
    pub fn model_group_names(&self, model_type: Option<&str>) -> Vec<String> {
        self.model_groups
            .iter()
            .filter(|(_, group)| match model_type {
                Some(wanted) => group.model_type.as_deref() == Some(wanted),
                None => true,
            })
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Display label of a model type; the raw value when it is not listed.
    pub fn model_type_label<'a>(&'a self, value: &'a str) -> &'a str {
        self.model_types
            .iter()
            .find(|option| option.value == value)
            .map_or(value, |option| option.label.as_str())
    }

    pub fn preset(&self, id: i64) -> Option<&PresetRecord> {
        self.presets.iter().find(|preset| preset.id == id)
    }
}
