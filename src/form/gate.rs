use crate::domain::{ConfigItem, ScalarKind, parse_scalar, serialize_value};

use super::state::EditState;

/// Current state of a boolean toggle item, staged value first.
///
/// A toggle that does not exist, or does not hold a bool, reads as `false`.
pub fn toggle_enabled(items: &[ConfigItem], state: &EditState, toggle: &str) -> bool {
    let raw = match state.staged(toggle) {
        Some(staged) => staged.to_string(),
        None => match items.iter().find(|item| item.key == toggle) {
            Some(item) => serialize_value(&item.value),
            None => return false,
        },
    };
    parse_scalar(&raw, ScalarKind::Bool)
        .ok()
        .and_then(|value| value.as_bool())
        .unwrap_or(false)
}

/// Whether `item` is switched off by its `enable_toggle` on an override page.
pub fn is_gated_off(
    item: &ConfigItem,
    items: &[ConfigItem],
    state: &EditState,
    override_mode: bool,
) -> bool {
    if !override_mode {
        return false;
    }
    match &item.enable_toggle {
        Some(toggle) => !toggle_enabled(items, state, toggle),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::FieldType;

    fn items() -> Vec<ConfigItem> {
        let toggle = ConfigItem::new("E", FieldType::Bool, json!(false));
        let mut gated = ConfigItem::new("x", FieldType::Str, json!(""));
        gated.enable_toggle = Some("E".into());
        let mut dangling = ConfigItem::new("y", FieldType::Str, json!(""));
        dangling.enable_toggle = Some("missing".into());
        vec![toggle, gated, dangling]
    }

    #[test]
    fn staged_toggle_value_wins() {
        let items = items();
        let mut state = EditState::from_items(&items);
        assert!(is_gated_off(&items[1], &items, &state, true));
        state.stage("E", "true");
        assert!(!is_gated_off(&items[1], &items, &state, true));
    }

    #[test]
    fn gating_only_applies_in_override_mode() {
        let items = items();
        let state = EditState::from_items(&items);
        assert!(!is_gated_off(&items[1], &items, &state, false));
    }

    #[test]
    fn missing_toggle_reads_as_disabled() {
        let items = items();
        let state = EditState::default();
        assert!(is_gated_off(&items[2], &items, &state, true));
        assert!(!toggle_enabled(&items, &state, "E"));
    }
}
