//! Nested edits of structured values.
//!
//! Every operation parses the item's staged value, changes one spot, and
//! stages the whole re-serialized top-level value again.

use serde_json::Value;

use crate::domain::{
    ConfigItem, ValueShape, deserialize_value, element_template, parse_scalar,
    parse_structured, scalar_default, serialize_value, shape_default,
};

use super::{
    error::EditError,
    path::{PathSegment, value_at, value_at_mut},
    state::EditState,
};

/// The item's current structured value.
///
/// Falls back to the loaded value when the staged string is not valid JSON,
/// and to the shape default when neither is structured.
pub fn current_value(item: &ConfigItem, state: &EditState) -> Value {
    let shape = ValueShape::of(item);
    if let Some(Ok(value)) = state
        .staged(&item.key)
        .map(|staged| deserialize_value(staged, shape))
    {
        return value;
    }
    match (&item.value, shape) {
        (Value::Array(_), ValueShape::SimpleList { .. } | ValueShape::ComplexList) => {
            item.value.clone()
        }
        (Value::Object(_), ValueShape::SimpleDict { .. } | ValueShape::ComplexDict) => {
            item.value.clone()
        }
        (Value::String(raw), _) if shape.is_structured() => {
            parse_structured(raw).unwrap_or_else(|_| shape_default(shape))
        }
        _ => shape_default(shape),
    }
}

/// Shape of the value found at `path` inside the item, per its schema.
pub fn shape_at(item: &ConfigItem, path: &[PathSegment]) -> Option<ValueShape> {
    let shape = ValueShape::of(item);
    match (shape, path) {
        (_, []) => Some(shape),
        (ValueShape::SimpleList { element }, [PathSegment::Index(_)])
        | (ValueShape::SimpleDict { element }, [PathSegment::Key(_)]) => {
            Some(ValueShape::Scalar(element))
        }
        (ValueShape::ComplexList, [PathSegment::Index(_)])
        | (ValueShape::ComplexDict, [PathSegment::Key(_)]) => Some(ValueShape::ComplexDict),
        (
            ValueShape::ComplexList | ValueShape::ComplexDict,
            [_, PathSegment::Key(field), rest @ ..],
        ) => {
            let sub = ValueShape::of(item.field_schema.get(field)?);
            match (sub, rest) {
                (_, []) => Some(sub),
                (ValueShape::SimpleList { element }, [PathSegment::Index(_)])
                | (ValueShape::SimpleDict { element }, [PathSegment::Key(_)]) => {
                    Some(ValueShape::Scalar(element))
                }
                _ => None,
            }
        }
        _ => None,
    }
}

/// Seed value appended to the collection at `path`.
pub fn element_seed(item: &ConfigItem, path: &[PathSegment]) -> Option<Value> {
    match shape_at(item, path)? {
        ValueShape::SimpleList { element } | ValueShape::SimpleDict { element } => {
            Some(scalar_default(element))
        }
        ValueShape::ComplexList | ValueShape::ComplexDict if path.is_empty() => {
            Some(element_template(&item.field_schema))
        }
        _ => None,
    }
}

pub fn delete_element(
    item: &ConfigItem,
    state: &mut EditState,
    path: &[PathSegment],
) -> Result<(), EditError> {
    let Some((last, parent_path)) = path.split_last() else {
        return Err(EditError::NotNestable {
            key: item.key.clone(),
        });
    };
    let mut root = current_value(item, state);
    let parent = value_at_mut(&mut root, parent_path)
        .ok_or_else(|| EditError::invalid_path(&item.key, path))?;
    let removed = match (last, parent) {
        (PathSegment::Index(index), Value::Array(items)) if *index < items.len() => {
            items.remove(*index);
            true
        }
        (PathSegment::Key(key), Value::Object(map)) => map.shift_remove(key).is_some(),
        _ => false,
    };
    if !removed {
        return Err(EditError::invalid_path(&item.key, path));
    }
    state.stage(&item.key, serialize_value(&root));
    Ok(())
}

/// Append the type-appropriate default to the list at `path`.
pub fn append_element(
    item: &ConfigItem,
    state: &mut EditState,
    path: &[PathSegment],
) -> Result<(), EditError> {
    let seed = element_seed(item, path).ok_or_else(|| EditError::not_container(&item.key, path))?;
    let mut root = current_value(item, state);
    if matches!(value_at(&root, path), None | Some(Value::Null)) {
        write_at(&mut root, path, Value::Array(Vec::new()))
            .ok_or_else(|| EditError::invalid_path(&item.key, path))?;
    }
    match value_at_mut(&mut root, path) {
        Some(Value::Array(items)) => items.push(seed),
        _ => return Err(EditError::not_container(&item.key, path)),
    }
    state.stage(&item.key, serialize_value(&root));
    Ok(())
}

/// Insert `new_key` into the map at `path`.
///
/// Returns `Ok(false)` without staging anything when the key already exists
/// or is blank.
pub fn insert_key(
    item: &ConfigItem,
    state: &mut EditState,
    path: &[PathSegment],
    new_key: &str,
) -> Result<bool, EditError> {
    let new_key = new_key.trim();
    if new_key.is_empty() {
        return Ok(false);
    }
    let seed = element_seed(item, path).ok_or_else(|| EditError::not_container(&item.key, path))?;
    let mut root = current_value(item, state);
    if matches!(value_at(&root, path), None | Some(Value::Null)) {
        write_at(&mut root, path, Value::Object(serde_json::Map::new()))
            .ok_or_else(|| EditError::invalid_path(&item.key, path))?;
    }
    let Some(Value::Object(map)) = value_at_mut(&mut root, path) else {
        return Err(EditError::not_container(&item.key, path));
    };
    if map.contains_key(new_key) {
        return Ok(false);
    }
    map.insert(new_key.to_string(), seed);
    state.stage(&item.key, serialize_value(&root));
    Ok(true)
}

/// Replace the value at `path` with `raw`, parsed per the schema there.
pub fn set_element(
    item: &ConfigItem,
    state: &mut EditState,
    path: &[PathSegment],
    raw: &str,
) -> Result<(), EditError> {
    if path.is_empty() {
        state.stage(&item.key, raw);
        return Ok(());
    }
    let shape = shape_at(item, path).ok_or_else(|| EditError::invalid_path(&item.key, path))?;
    let parsed = match shape {
        ValueShape::Scalar(kind) => parse_scalar(raw, kind),
        other => deserialize_value(raw, other),
    }
    .map_err(|err| EditError::InvalidValue {
        key: item.key.clone(),
        message: err.message,
    })?;
    let mut root = current_value(item, state);
    write_at(&mut root, path, parsed).ok_or_else(|| EditError::invalid_path(&item.key, path))?;
    state.stage(&item.key, serialize_value(&root));
    Ok(())
}

fn write_at(root: &mut Value, path: &[PathSegment], value: Value) -> Option<()> {
    let (last, parent_path) = path.split_last()?;
    let parent = value_at_mut(root, parent_path)?;
    match (last, parent) {
        (PathSegment::Index(index), Value::Array(items)) => {
            *items.get_mut(*index)? = value;
        }
        (PathSegment::Key(key), Value::Object(map)) => {
            map.insert(key.clone(), value);
        }
        (PathSegment::Key(key), slot @ Value::Null) => {
            let mut map = serde_json::Map::new();
            map.insert(key.clone(), value);
            *slot = Value::Object(map);
        }
        _ => return None,
    }
    Some(())
}
