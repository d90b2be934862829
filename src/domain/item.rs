use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declared type tag of a config field.
///
/// Unknown tags are preserved in [`FieldType::Other`] and edited as text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    #[default]
    Str,
    Text,
    Int,
    Float,
    Bool,
    List,
    Dict,
    Preset,
    Presets,
    Other(String),
}

impl FieldType {
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Str => "str",
            FieldType::Text => "text",
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::Bool => "bool",
            FieldType::List => "list",
            FieldType::Dict => "dict",
            FieldType::Preset => "preset",
            FieldType::Presets => "presets",
            FieldType::Other(tag) => tag,
        }
    }
}

impl From<String> for FieldType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "str" | "string" => FieldType::Str,
            "text" => FieldType::Text,
            "int" | "integer" => FieldType::Int,
            "float" | "number" => FieldType::Float,
            "bool" | "boolean" => FieldType::Bool,
            "list" => FieldType::List,
            "dict" | "object" => FieldType::Dict,
            "preset" => FieldType::Preset,
            "presets" => FieldType::Presets,
            _ => FieldType::Other(tag),
        }
    }
}

impl From<FieldType> for String {
    fn from(kind: FieldType) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a complex item's `field_schema`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubFieldSchema {
    #[serde(rename = "type")]
    pub kind: FieldType,
    pub title: Option<String>,
    pub description: Option<String>,
    pub element_type: Option<FieldType>,
    pub default: Option<Value>,
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<String>>,
    pub is_secret: bool,
    pub is_textarea: bool,
    pub is_need_restart: bool,
    pub i18n_title: Option<IndexMap<String, String>>,
    pub i18n_description: Option<IndexMap<String, String>>,
}

/// One configurable field of a namespace, as delivered by the config service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigItem {
    pub key: String,
    pub value: Value,
    #[serde(rename = "type")]
    pub kind: FieldType,
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_complex: bool,
    pub field_schema: IndexMap<String, SubFieldSchema>,
    pub element_type: Option<FieldType>,
    pub sub_item_name: Option<String>,
    pub default: Option<Value>,
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<String>>,
    pub is_secret: bool,
    pub is_textarea: bool,
    pub required: bool,
    pub is_hidden: bool,
    pub overridable: bool,
    pub is_need_restart: bool,
    pub ref_model_groups: bool,
    pub model_type: Option<String>,
    pub ref_presets: bool,
    pub ref_presets_multiple: bool,
    pub enable_toggle: Option<String>,
    pub i18n_title: Option<IndexMap<String, String>>,
    pub i18n_description: Option<IndexMap<String, String>>,
}

impl ConfigItem {
    pub fn new(key: impl Into<String>, kind: FieldType, value: Value) -> Self {
        Self {
            key: key.into(),
            kind,
            value,
            ..Self::default()
        }
    }

    pub fn display_title(&self, locale: Option<&str>) -> String {
        localized(self.i18n_title.as_ref(), locale)
            .or_else(|| self.title.clone())
            .unwrap_or_else(|| self.key.clone())
    }

    pub fn display_description(&self, locale: Option<&str>) -> Option<String> {
        localized(self.i18n_description.as_ref(), locale).or_else(|| self.description.clone())
    }

    /// Whether a restart is needed after this item changes.
    ///
    /// A `field_schema` entry named like the item itself is consulted too.
    pub fn needs_restart(&self) -> bool {
        self.is_need_restart
            || self
                .field_schema
                .get(&self.key)
                .is_some_and(|schema| schema.is_need_restart)
    }
}

impl SubFieldSchema {
    pub fn display_title(&self, name: &str, locale: Option<&str>) -> String {
        localized(self.i18n_title.as_ref(), locale)
            .or_else(|| self.title.clone())
            .unwrap_or_else(|| name.to_string())
    }

    pub fn display_description(&self, locale: Option<&str>) -> Option<String> {
        localized(self.i18n_description.as_ref(), locale).or_else(|| self.description.clone())
    }
}

/// Read-only view shared by top-level items and sub-fields, consumed by the
/// widget selector.
pub trait FieldMeta {
    fn kind(&self) -> &FieldType;
    fn element_type(&self) -> Option<&FieldType>;
    fn is_complex(&self) -> bool {
        false
    }
    fn enum_values(&self) -> Option<&[String]>;
    fn is_secret(&self) -> bool;
    fn is_textarea(&self) -> bool;
    fn ref_model_groups(&self) -> bool {
        false
    }
    fn model_type(&self) -> Option<&str> {
        None
    }
    fn ref_presets(&self) -> bool {
        false
    }
    fn ref_presets_multiple(&self) -> bool {
        false
    }
}

impl FieldMeta for ConfigItem {
    fn kind(&self) -> &FieldType {
        &self.kind
    }

    fn element_type(&self) -> Option<&FieldType> {
        self.element_type.as_ref()
    }

    fn is_complex(&self) -> bool {
        self.is_complex
    }

    fn enum_values(&self) -> Option<&[String]> {
        self.enum_values.as_deref()
    }

    fn is_secret(&self) -> bool {
        self.is_secret
    }

    fn is_textarea(&self) -> bool {
        self.is_textarea
    }

    fn ref_model_groups(&self) -> bool {
        self.ref_model_groups
    }

    fn model_type(&self) -> Option<&str> {
        self.model_type.as_deref()
    }

    fn ref_presets(&self) -> bool {
        self.ref_presets || self.kind == FieldType::Preset
    }

    fn ref_presets_multiple(&self) -> bool {
        self.ref_presets_multiple || self.kind == FieldType::Presets
    }
}

impl FieldMeta for SubFieldSchema {
    fn kind(&self) -> &FieldType {
        &self.kind
    }

    fn element_type(&self) -> Option<&FieldType> {
        self.element_type.as_ref()
    }

    fn enum_values(&self) -> Option<&[String]> {
        self.enum_values.as_deref()
    }

    fn is_secret(&self) -> bool {
        self.is_secret
    }

    fn is_textarea(&self) -> bool {
        self.is_textarea
    }
}

fn localized(table: Option<&IndexMap<String, String>>, locale: Option<&str>) -> Option<String> {
    let table = table?;
    let locale = locale?;
    if let Some(text) = table.get(locale) {
        return Some(text.clone());
    }
    let language = locale.split(['-', '_']).next().unwrap_or(locale);
    table
        .iter()
        .find(|(tag, _)| tag.split(['-', '_']).next() == Some(language))
        .map(|(_, text)| text.clone())
}
