use std::fmt;

use serde_json::Value;

/// One step into a structured value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Index(usize),
    Key(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Index(index) => write!(f, "[{index}]"),
            PathSegment::Key(key) => write!(f, "[{key:?}]"),
        }
    }
}

pub type ValuePath = Vec<PathSegment>;

pub fn display_path(path: &[PathSegment]) -> String {
    path.iter().map(ToString::to_string).collect()
}

/// Where a widget writes: a top-level key plus a path inside its value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Binding {
    pub key: String,
    pub path: ValuePath,
}

impl Binding {
    pub fn top(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            path: Vec::new(),
        }
    }

    pub fn nested(key: impl Into<String>, path: ValuePath) -> Self {
        Self {
            key: key.into(),
            path,
        }
    }

    pub fn is_top_level(&self) -> bool {
        self.path.is_empty()
    }
}

/// Expansion flag key of a nested collection, e.g. `bots[2].admins`.
///
/// Keys are positional: after a deletion they keep pointing at whatever
/// element now occupies the index.
pub fn expansion_key(parent: &str, element: &PathSegment, field: &str) -> String {
    format!("{parent}{element}.{field}")
}

pub fn value_at<'a>(value: &'a Value, path: &[PathSegment]) -> Option<&'a Value> {
    let mut current = value;
    for segment in path {
        current = match (segment, current) {
            (PathSegment::Index(index), Value::Array(items)) => items.get(*index)?,
            (PathSegment::Key(key), Value::Object(map)) => map.get(key)?,
            _ => return None,
        };
    }
    Some(current)
}

pub fn value_at_mut<'a>(value: &'a mut Value, path: &[PathSegment]) -> Option<&'a mut Value> {
    let mut current = value;
    for segment in path {
        current = match (segment, current) {
            (PathSegment::Index(index), Value::Array(items)) => items.get_mut(*index)?,
            (PathSegment::Key(key), Value::Object(map)) => map.get_mut(key)?,
            _ => return None,
        };
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn expansion_keys_are_positional() {
        assert_eq!(
            expansion_key("bots", &PathSegment::Index(2), "admins"),
            "bots[2].admins"
        );
        assert_eq!(
            expansion_key("routes", &PathSegment::Key("qq".into()), "hosts"),
            "routes[\"qq\"].hosts"
        );
    }

    #[test]
    fn walks_nested_values() {
        let mut value = json!([{"tags": ["a", "b"]}]);
        let path = vec![
            PathSegment::Index(0),
            PathSegment::Key("tags".into()),
            PathSegment::Index(1),
        ];
        assert_eq!(value_at(&value, &path), Some(&json!("b")));
        *value_at_mut(&mut value, &path).expect("present") = json!("c");
        assert_eq!(value, json!([{"tags": ["a", "c"]}]));
        assert!(value_at(&value, &[PathSegment::Key("tags".into())]).is_none());
        assert_eq!(display_path(&path), "[0][\"tags\"][1]");
    }
}
