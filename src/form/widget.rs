//! Maps a field's declared type and modifiers to an editable control.

use serde_json::Value;

use crate::domain::{
    FieldMeta, ReferenceData, ScalarKind, ValueShape, deserialize_value, parse_scalar,
};

/// Sentinel preset id meaning "use the default preset".
pub const DEFAULT_PRESET_ID: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKind {
    ModelGroupSelect,
    PresetMultiSelect,
    PresetSelect,
    EnumSelect,
    Summary,
    Toggle,
    Numeric,
    Text,
    InvalidJson,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PresetOption {
    pub id: i64,
    pub title: String,
    pub remote: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PresetChip {
    pub id: i64,
    pub title: Option<String>,
    pub unknown: bool,
}

/// Editable control descriptor for one cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Widget {
    ModelGroupSelect {
        value: String,
        options: Vec<String>,
        invalid: bool,
        /// Label of the field's model type; the raw type when unlisted.
        model_type: Option<String>,
        manage_route: String,
    },
    PresetMultiSelect {
        chips: Vec<PresetChip>,
        options: Vec<PresetOption>,
    },
    PresetSelect {
        value: i64,
        options: Vec<PresetOption>,
        invalid: bool,
    },
    EnumSelect {
        value: String,
        options: Vec<String>,
        selected: Option<usize>,
    },
    Summary {
        shape: ValueShape,
        count: usize,
        expand_key: String,
        expanded: bool,
    },
    Toggle {
        value: bool,
    },
    Numeric {
        value: String,
        float: bool,
        invalid: bool,
    },
    Text {
        value: String,
        multiline: bool,
        secret: Option<SecretState>,
    },
    InvalidJson {
        raw: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecretState {
    pub revealed: bool,
}

/// One selectable entry of a choice widget and the string it stages.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub label: String,
    pub staged: String,
    pub active: bool,
}

pub struct WidgetRequest<'a> {
    pub meta: &'a dyn FieldMeta,
    pub staged: &'a str,
    pub expand_key: &'a str,
    pub expanded: bool,
    pub revealed: bool,
}

pub struct WidgetContext<'a> {
    pub refs: &'a ReferenceData,
    pub model_group_route: &'a str,
}

/// Pick the control for a field. The first matching rule wins.
pub fn select_widget(request: WidgetRequest<'_>, ctx: &WidgetContext<'_>) -> Widget {
    let meta = request.meta;
    let staged = request.staged;

    if meta.ref_model_groups() {
        let options = ctx.refs.model_group_names(meta.model_type());
        let invalid = !options.iter().any(|option| option == staged);
        let model_type = meta
            .model_type()
            .map(|value| ctx.refs.model_type_label(value).to_string());
        return Widget::ModelGroupSelect {
            value: staged.to_string(),
            options,
            invalid,
            model_type,
            manage_route: ctx.model_group_route.to_string(),
        };
    }

    if meta.ref_presets_multiple() {
        return match parse_preset_ids(staged) {
            Some(ids) => Widget::PresetMultiSelect {
                chips: ids
                    .into_iter()
                    .map(|id| {
                        let title = ctx.refs.preset(id).map(|preset| preset.title.clone());
                        PresetChip {
                            id,
                            unknown: title.is_none(),
                            title,
                        }
                    })
                    .collect(),
                options: preset_options(ctx.refs, false),
            },
            None => Widget::InvalidJson {
                raw: staged.to_string(),
            },
        };
    }

    if meta.ref_presets() {
        let parsed = staged.trim().parse::<i64>().ok();
        let value = parsed.unwrap_or(DEFAULT_PRESET_ID);
        let known = value == DEFAULT_PRESET_ID || ctx.refs.preset(value).is_some();
        let blank = staged.trim().is_empty();
        return Widget::PresetSelect {
            value,
            options: preset_options(ctx.refs, true),
            invalid: !known || (parsed.is_none() && !blank),
        };
    }

    if let Some(options) = meta.enum_values() {
        return Widget::EnumSelect {
            value: staged.to_string(),
            selected: options.iter().position(|option| option == staged),
            options: options.to_vec(),
        };
    }

    let shape = ValueShape::of(meta);
    if shape.is_structured() {
        return match deserialize_value(staged, shape) {
            Ok(value) => Widget::Summary {
                shape,
                count: collection_len(&value),
                expand_key: request.expand_key.to_string(),
                expanded: request.expanded,
            },
            Err(_) => Widget::InvalidJson {
                raw: staged.to_string(),
            },
        };
    }

    match shape {
        ValueShape::Scalar(ScalarKind::Text) => Widget::Text {
            value: staged.to_string(),
            multiline: meta.is_textarea(),
            secret: meta.is_secret().then_some(SecretState {
                revealed: request.revealed,
            }),
        },
        ValueShape::Scalar(kind) => scalar_widget(kind, staged),
        _ => Widget::Text {
            value: staged.to_string(),
            multiline: false,
            secret: None,
        },
    }
}

/// Control for a primitive list / dict element.
pub fn scalar_widget(kind: ScalarKind, raw: &str) -> Widget {
    match kind {
        ScalarKind::Bool => Widget::Toggle {
            value: parse_scalar(raw, ScalarKind::Bool)
                .ok()
                .and_then(|value| value.as_bool())
                .unwrap_or(false),
        },
        ScalarKind::Integer | ScalarKind::Float => Widget::Numeric {
            value: raw.to_string(),
            float: kind == ScalarKind::Float,
            invalid: parse_scalar(raw, kind).is_err(),
        },
        ScalarKind::Text => Widget::Text {
            value: raw.to_string(),
            multiline: false,
            secret: None,
        },
    }
}

impl Widget {
    pub fn kind(&self) -> WidgetKind {
        match self {
            Widget::ModelGroupSelect { .. } => WidgetKind::ModelGroupSelect,
            Widget::PresetMultiSelect { .. } => WidgetKind::PresetMultiSelect,
            Widget::PresetSelect { .. } => WidgetKind::PresetSelect,
            Widget::EnumSelect { .. } => WidgetKind::EnumSelect,
            Widget::Summary { .. } => WidgetKind::Summary,
            Widget::Toggle { .. } => WidgetKind::Toggle,
            Widget::Numeric { .. } => WidgetKind::Numeric,
            Widget::Text { .. } => WidgetKind::Text,
            Widget::InvalidJson { .. } => WidgetKind::InvalidJson,
        }
    }

    pub fn is_invalid(&self) -> bool {
        match self {
            Widget::ModelGroupSelect { invalid, .. }
            | Widget::PresetSelect { invalid, .. }
            | Widget::Numeric { invalid, .. } => *invalid,
            Widget::PresetMultiSelect { chips, .. } => chips.iter().any(|chip| chip.unknown),
            Widget::InvalidJson { .. } => true,
            _ => false,
        }
    }

    /// Whether the control edits free text rather than picking from a list.
    pub fn is_free_text(&self) -> bool {
        matches!(
            self,
            Widget::Text { .. } | Widget::Numeric { .. } | Widget::InvalidJson { .. }
        )
    }

    /// Raw text the inline editor starts from.
    pub fn edit_text(&self) -> Option<&str> {
        match self {
            Widget::Text { value, .. } | Widget::Numeric { value, .. } => Some(value),
            Widget::InvalidJson { raw } => Some(raw),
            _ => None,
        }
    }

    /// Options of choice controls, with the staged string each one writes.
    pub fn choices(&self) -> Option<Vec<Choice>> {
        match self {
            Widget::ModelGroupSelect { value, options, .. } => Some(
                options
                    .iter()
                    .map(|option| Choice {
                        label: option.clone(),
                        staged: option.clone(),
                        active: option == value,
                    })
                    .collect(),
            ),
            Widget::EnumSelect { value, options, .. } => Some(
                options
                    .iter()
                    .map(|option| Choice {
                        label: option.clone(),
                        staged: option.clone(),
                        active: option == value,
                    })
                    .collect(),
            ),
            Widget::PresetSelect { value, options, .. } => Some(
                options
                    .iter()
                    .map(|option| Choice {
                        label: option.title.clone(),
                        staged: option.id.to_string(),
                        active: option.id == *value,
                    })
                    .collect(),
            ),
            Widget::PresetMultiSelect { chips, options } => {
                let current: Vec<i64> = chips.iter().map(|chip| chip.id).collect();
                Some(
                    options
                        .iter()
                        .map(|option| Choice {
                            label: option.title.clone(),
                            staged: toggle_preset_id(&current, option.id),
                            active: current.contains(&option.id),
                        })
                        .collect(),
                )
            }
            _ => None,
        }
    }
}

fn parse_preset_ids(staged: &str) -> Option<Vec<i64>> {
    if staged.trim().is_empty() {
        return Some(Vec::new());
    }
    let value: Value = serde_json::from_str(staged).ok()?;
    value
        .as_array()?
        .iter()
        .map(|id| id.as_i64())
        .collect::<Option<Vec<_>>>()
}

/// Staged JSON array after adding or removing `id`.
pub fn toggle_preset_id(current: &[i64], id: i64) -> String {
    let mut ids = current.to_vec();
    if let Some(position) = ids.iter().position(|existing| *existing == id) {
        ids.remove(position);
    } else {
        ids.push(id);
    }
    Value::from(ids).to_string()
}

fn preset_options(refs: &ReferenceData, with_default: bool) -> Vec<PresetOption> {
    let mut options = Vec::with_capacity(refs.presets.len() + 1);
    if with_default {
        options.push(PresetOption {
            id: DEFAULT_PRESET_ID,
            title: "Default".to_string(),
            remote: false,
        });
    }
    options.extend(refs.presets.iter().map(|preset| PresetOption {
        id: preset.id,
        title: preset.title.clone(),
        remote: preset.remote,
    }));
    options
}

fn collection_len(value: &Value) -> usize {
    match value {
        Value::Array(items) => items.len(),
        Value::Object(map) => map.len(),
        _ => 0,
    }
}
