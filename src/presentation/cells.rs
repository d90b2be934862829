use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::{
    app::EditorOptions,
    domain::ValueShape,
    form::{Row, RowKind, Widget},
};

/// Label cell text: indentation by depth plus state markers.
pub fn row_label(row: &Row) -> String {
    let indent = "  ".repeat(row.depth);
    let mut label = match row.kind {
        RowKind::ElementHeader => format!("{indent}▪ {}", row.label),
        _ => format!("{indent}{}", row.label),
    };
    if row.required {
        label.push_str(" *");
    }
    if row.dirty {
        label.push_str(" ●");
    }
    if row.needs_restart {
        label.push_str(" ↻");
    }
    label
}

/// Value cell text for a row's widget.
pub fn widget_text(widget: &Widget, options: &EditorOptions) -> String {
    match widget {
        Widget::ModelGroupSelect { value, invalid, .. } => {
            let value = if value.is_empty() { "(none)" } else { value };
            if *invalid {
                format!("{value} ▾ (unknown group)")
            } else {
                format!("{value} ▾")
            }
        }
        Widget::PresetMultiSelect { chips, .. } => {
            if chips.is_empty() {
                return "(no presets)".to_string();
            }
            chips
                .iter()
                .map(|chip| match &chip.title {
                    Some(title) => format!("[{title}]"),
                    None => format!("[#{} ?]", chip.id),
                })
                .collect::<Vec<_>>()
                .join(" ")
        }
        Widget::PresetSelect { value, options: presets, invalid } => {
            let title = presets
                .iter()
                .find(|option| option.id == *value)
                .map(|option| option.title.clone());
            match (title, invalid) {
                (Some(title), false) => format!("{title} ▾"),
                _ => format!("#{value} ▾ (unknown preset)"),
            }
        }
        Widget::EnumSelect { value, .. } => format!("{value} ▾"),
        Widget::Summary {
            shape,
            count,
            expanded,
            ..
        } => {
            let noun = match shape {
                ValueShape::SimpleList { .. } | ValueShape::ComplexList => "item",
                _ => "key",
            };
            let plural = if *count == 1 { "" } else { "s" };
            let arrow = if *expanded { "▾" } else { "▸" };
            format!("{arrow} {count} {noun}{plural}")
        }
        Widget::Toggle { value } => {
            if *value {
                "[x] on".to_string()
            } else {
                "[ ] off".to_string()
            }
        }
        Widget::Numeric { value, .. } => value.clone(),
        Widget::Text {
            value,
            multiline,
            secret,
        } => match secret {
            Some(secret) if !secret.revealed => {
                options.secret_mask.to_string().repeat(value.chars().count().min(12))
            }
            _ if *multiline && value.contains('\n') => {
                let first = value.lines().next().unwrap_or_default();
                format!("{first} ¶")
            }
            _ => value.clone(),
        },
        Widget::InvalidJson { .. } => format!("⚠ {}", options.invalid_json_placeholder),
    }
}

/// Cut `text` to at most `width` display columns, marking the cut with `…`.
pub fn fit(text: &str, width: usize) -> String {
    if UnicodeWidthStr::width(text) <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + ch_width + 1 > width {
            break;
        }
        out.push(ch);
        used += ch_width;
    }
    out.push('…');
    out
}
