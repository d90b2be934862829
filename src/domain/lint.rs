use std::collections::HashSet;
use std::fmt;

use super::item::{ConfigItem, FieldType};

/// Structural problem in a namespace's item list.
///
/// None of these stop the editor; they are surfaced for schema authors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaDefect {
    DuplicateKey { key: String },
    EmptyFieldSchema { key: String },
    MissingToggle { key: String, toggle: String },
    NonBooleanToggle { key: String, toggle: String },
}

impl fmt::Display for SchemaDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaDefect::DuplicateKey { key } => write!(f, "{key}: duplicate key"),
            SchemaDefect::EmptyFieldSchema { key } => {
                write!(f, "{key}: complex list without field_schema")
            }
            SchemaDefect::MissingToggle { key, toggle } => {
                write!(f, "{key}: enable_toggle '{toggle}' does not exist")
            }
            SchemaDefect::NonBooleanToggle { key, toggle } => {
                write!(f, "{key}: enable_toggle '{toggle}' is not a bool item")
            }
        }
    }
}

pub fn lint_items(items: &[ConfigItem]) -> Vec<SchemaDefect> {
    let mut defects = Vec::new();
    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(item.key.as_str()) {
            defects.push(SchemaDefect::DuplicateKey {
                key: item.key.clone(),
            });
        }
        if item.is_complex && item.kind == FieldType::List && item.field_schema.is_empty() {
            defects.push(SchemaDefect::EmptyFieldSchema {
                key: item.key.clone(),
            });
        }
        if let Some(toggle) = &item.enable_toggle {
            match items.iter().find(|candidate| &candidate.key == toggle) {
                None => defects.push(SchemaDefect::MissingToggle {
                    key: item.key.clone(),
                    toggle: toggle.clone(),
                }),
                Some(target) if target.kind != FieldType::Bool => {
                    defects.push(SchemaDefect::NonBooleanToggle {
                        key: item.key.clone(),
                        toggle: toggle.clone(),
                    })
                }
                Some(_) => {}
            }
        }
    }
    defects
}
