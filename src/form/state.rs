use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};

use crate::domain::{ConfigItem, serialize_value};

/// Client-side working state of one editor instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditState {
    staged: IndexMap<String, String>,
    dirty: IndexSet<String>,
    expanded: HashMap<String, bool>,
    revealed: HashMap<String, bool>,
}

impl EditState {
    pub fn from_items(items: &[ConfigItem]) -> Self {
        let mut state = Self::default();
        state.seed(items);
        state
    }

    /// Re-seed staged values from freshly loaded items and clear the dirty
    /// set. Expansion and reveal flags survive.
    pub fn seed(&mut self, items: &[ConfigItem]) {
        self.staged = items
            .iter()
            .map(|item| (item.key.clone(), serialize_value(&item.value)))
            .collect();
        self.dirty.clear();
    }

    /// Replace everything, UI flags included.
    pub fn reset(&mut self, items: &[ConfigItem]) {
        *self = Self::from_items(items);
    }

    pub fn stage(&mut self, key: &str, value: impl Into<String>) {
        self.staged.insert(key.to_string(), value.into());
        self.dirty.insert(key.to_string());
    }

    pub fn staged(&self, key: &str) -> Option<&str> {
        self.staged.get(key).map(String::as_str)
    }

    pub fn is_dirty(&self, key: &str) -> bool {
        self.dirty.contains(key)
    }

    pub fn has_changes(&self) -> bool {
        !self.dirty.is_empty()
    }

    pub fn dirty_keys(&self) -> impl Iterator<Item = &str> {
        self.dirty.iter().map(String::as_str)
    }

    pub fn dirty_count(&self) -> usize {
        self.dirty.len()
    }

    /// `{key: staged}` for exactly the dirty keys, in edit order.
    pub fn dirty_payload(&self) -> IndexMap<String, String> {
        self.dirty
            .iter()
            .filter_map(|key| {
                self.staged
                    .get(key)
                    .map(|value| (key.clone(), value.clone()))
            })
            .collect()
    }

    pub fn clear_dirty(&mut self) {
        self.dirty.clear();
    }

    pub fn is_expanded(&self, key: &str) -> bool {
        self.expanded.get(key).copied().unwrap_or(false)
    }

    pub fn set_expanded(&mut self, key: &str, expanded: bool) {
        self.expanded.insert(key.to_string(), expanded);
    }

    pub fn toggle_expanded(&mut self, key: &str) -> bool {
        let next = !self.is_expanded(key);
        self.set_expanded(key, next);
        next
    }

    pub fn is_revealed(&self, key: &str) -> bool {
        self.revealed.get(key).copied().unwrap_or(false)
    }

    pub fn toggle_revealed(&mut self, key: &str) -> bool {
        let next = !self.is_revealed(key);
        self.revealed.insert(key.to_string(), next);
        next
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::FieldType;

    fn items() -> Vec<ConfigItem> {
        vec![
            ConfigItem::new("name", FieldType::Str, json!("bot")),
            ConfigItem::new("port", FieldType::Int, json!(8080)),
            ConfigItem::new("tags", FieldType::List, json!(["a", "b"])),
        ]
    }

    #[test]
    fn seeds_serialized_values() {
        let state = EditState::from_items(&items());
        assert_eq!(state.staged("name"), Some("bot"));
        assert_eq!(state.staged("port"), Some("8080"));
        assert_eq!(state.staged("tags"), Some(r#"["a","b"]"#));
        assert!(!state.has_changes());
    }

    #[test]
    fn staging_marks_dirty_in_edit_order() {
        let mut state = EditState::from_items(&items());
        state.stage("port", "9000");
        state.stage("name", "bot");
        state.stage("port", "9001");
        let payload = state.dirty_payload();
        let keys: Vec<_> = payload.keys().cloned().collect();
        assert_eq!(keys, vec!["port".to_string(), "name".to_string()]);
        assert_eq!(payload["port"], "9001");
        assert_eq!(state.dirty_count(), 2);
    }

    #[test]
    fn seed_keeps_ui_flags_but_reset_drops_them() {
        let mut state = EditState::from_items(&items());
        state.toggle_expanded("tags");
        state.toggle_revealed("name");
        state.stage("name", "other");
        state.seed(&items());
        assert!(state.is_expanded("tags"));
        assert!(state.is_revealed("name"));
        assert_eq!(state.staged("name"), Some("bot"));
        assert!(!state.has_changes());

        state.reset(&items());
        assert!(!state.is_expanded("tags"));
        assert!(!state.is_revealed("name"));
        assert_eq!(state, EditState::from_items(&items()));
    }
}
