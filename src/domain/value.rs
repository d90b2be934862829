use serde_json::{Map, Value};
use thiserror::Error;

use super::item::SubFieldSchema;
use super::shape::{ScalarKind, ValueShape};

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ValueError {
    pub message: String,
}

impl ValueError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Serialize a value into its staged string form.
///
/// Strings are staged verbatim, lists and maps as compact JSON.
pub fn serialize_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Number(num) => num.to_string(),
        Value::Bool(flag) => flag.to_string(),
        other => other.to_string(),
    }
}

/// Parse a staged string back into a value of the given shape.
pub fn deserialize_value(staged: &str, shape: ValueShape) -> Result<Value, ValueError> {
    match shape {
        ValueShape::Scalar(kind) => parse_scalar(staged, kind),
        ValueShape::SimpleList { .. } | ValueShape::ComplexList => {
            let value = parse_structured(staged)?;
            if value.is_array() {
                Ok(value)
            } else {
                Err(ValueError::new("expected a JSON array"))
            }
        }
        ValueShape::SimpleDict { .. } | ValueShape::ComplexDict => {
            let value = parse_structured(staged)?;
            if value.is_object() {
                Ok(value)
            } else {
                Err(ValueError::new("expected a JSON object"))
            }
        }
    }
}

pub fn parse_structured(staged: &str) -> Result<Value, ValueError> {
    serde_json::from_str(staged).map_err(|err| ValueError::new(format!("invalid JSON: {err}")))
}

pub fn parse_scalar(raw: &str, kind: ScalarKind) -> Result<Value, ValueError> {
    match kind {
        ScalarKind::Text => Ok(Value::String(raw.to_string())),
        ScalarKind::Integer => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Ok(Value::from(0));
            }
            trimmed
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| ValueError::new(format!("'{trimmed}' is not a valid integer")))
        }
        ScalarKind::Float => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Ok(Value::from(0.0));
            }
            let parsed = trimmed
                .parse::<f64>()
                .map_err(|_| ValueError::new(format!("'{trimmed}' is not a valid number")))?;
            serde_json::Number::from_f64(parsed)
                .map(Value::Number)
                .ok_or_else(|| ValueError::new(format!("'{trimmed}' is not a finite number")))
        }
        ScalarKind::Bool => match raw.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" | "" => Ok(Value::Bool(false)),
            other => Err(ValueError::new(format!("'{other}' is not a valid boolean"))),
        },
    }
}

pub fn scalar_default(kind: ScalarKind) -> Value {
    match kind {
        ScalarKind::Text => Value::String(String::new()),
        ScalarKind::Integer => Value::from(0),
        ScalarKind::Float => Value::from(0.0),
        ScalarKind::Bool => Value::Bool(false),
    }
}

pub fn shape_default(shape: ValueShape) -> Value {
    match shape {
        ValueShape::Scalar(kind) => scalar_default(kind),
        ValueShape::SimpleList { .. } | ValueShape::ComplexList => Value::Array(Vec::new()),
        ValueShape::SimpleDict { .. } | ValueShape::ComplexDict => Value::Object(Map::new()),
    }
}

/// Default of one sub-field: its declared default, else its type default.
pub fn sub_field_default(schema: &SubFieldSchema) -> Value {
    schema
        .default
        .clone()
        .unwrap_or_else(|| shape_default(ValueShape::of(schema)))
}

/// Fresh element of a complex list or dict, one entry per sub-field.
pub fn element_template<'a>(
    fields: impl IntoIterator<Item = (&'a String, &'a SubFieldSchema)>,
) -> Value {
    let object = fields
        .into_iter()
        .map(|(name, schema)| (name.clone(), sub_field_default(schema)))
        .collect::<Map<String, Value>>();
    Value::Object(object)
}

/// Short human summary used in collapsed cells.
pub fn summarize_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(num) => num.to_string(),
        Value::String(text) => {
            if text.chars().count() > 12 {
                let head: String = text.chars().take(10).collect();
                format!("\"{head}…\"")
            } else {
                format!("\"{text}\"")
            }
        }
        Value::Array(items) => format!("array({})", items.len()),
        Value::Object(map) => format!("object({})", map.len()),
    }
}
