//! Flattens config items into table rows, recursing into nested collections.

use serde_json::Value;

use crate::domain::{
    ConfigItem, ReferenceData, ScalarKind, SubFieldSchema, ValueShape, serialize_value,
    sub_field_default,
};

use super::{
    gate::is_gated_off,
    mutate::current_value,
    path::{Binding, PathSegment, ValuePath, expansion_key},
    state::EditState,
    widget::{Widget, WidgetContext, WidgetRequest, scalar_widget, select_widget},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Main,
    Element,
    ElementHeader,
    SubField,
    AddItem,
    NewKey,
}

/// Something a row lets the user trigger besides editing its widget.
#[derive(Debug, Clone, PartialEq)]
pub enum RowAction {
    ToggleExpand { expand_key: String },
    Delete { key: String, path: ValuePath },
    Append { key: String, path: ValuePath },
    InsertKey { key: String, path: ValuePath },
    ToggleReveal { reveal_key: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub kind: RowKind,
    pub depth: usize,
    pub label: String,
    pub description: Option<String>,
    pub binding: Binding,
    pub widget: Option<Widget>,
    pub actions: Vec<RowAction>,
    pub disabled: bool,
    pub dirty: bool,
    pub needs_restart: bool,
    pub required: bool,
}

impl Row {
    fn new(kind: RowKind, depth: usize, label: String, binding: Binding) -> Self {
        Self {
            kind,
            depth,
            label,
            description: None,
            binding,
            widget: None,
            actions: Vec::new(),
            disabled: false,
            dirty: false,
            needs_restart: false,
            required: false,
        }
    }

    pub fn delete_action(&self) -> Option<&RowAction> {
        self.actions
            .iter()
            .find(|action| matches!(action, RowAction::Delete { .. }))
    }

    /// Key of the reveal flag a masked secret widget reads.
    pub fn reveal_key(&self) -> Option<&str> {
        self.actions.iter().find_map(|action| match action {
            RowAction::ToggleReveal { reveal_key } => Some(reveal_key.as_str()),
            _ => None,
        })
    }

    /// Action fired by activating the row itself (Enter / click).
    pub fn primary_action(&self) -> Option<&RowAction> {
        self.actions.iter().find(|action| {
            matches!(
                action,
                RowAction::Append { .. }
                    | RowAction::InsertKey { .. }
                    | RowAction::ToggleExpand { .. }
            )
        })
    }
}

pub struct RowContext<'a> {
    pub items: &'a [ConfigItem],
    pub state: &'a EditState,
    pub refs: &'a ReferenceData,
    pub locale: Option<&'a str>,
    pub override_mode: bool,
    pub model_group_route: &'a str,
}

impl RowContext<'_> {
    fn widget_context(&self) -> WidgetContext<'_> {
        WidgetContext {
            refs: self.refs,
            model_group_route: self.model_group_route,
        }
    }
}

/// Rows of every visible item, in item order.
pub fn table_rows(ctx: &RowContext<'_>) -> Vec<Row> {
    ctx.items
        .iter()
        .filter(|item| !item.is_hidden)
        .flat_map(|item| item_rows(item, ctx))
        .collect()
}

/// One main row, then nested rows when the item is expanded.
pub fn item_rows(item: &ConfigItem, ctx: &RowContext<'_>) -> Vec<Row> {
    let state = ctx.state;
    let staged = state
        .staged(&item.key)
        .map(str::to_string)
        .unwrap_or_else(|| serialize_value(&item.value));
    let shape = ValueShape::of(item);
    let expanded = state.is_expanded(&item.key);

    let mut main = Row::new(
        RowKind::Main,
        0,
        item.display_title(ctx.locale),
        Binding::top(&item.key),
    );
    main.description = item.display_description(ctx.locale);
    main.widget = Some(select_widget(
        WidgetRequest {
            meta: item,
            staged: &staged,
            expand_key: &item.key,
            expanded,
            revealed: state.is_revealed(&item.key),
        },
        &ctx.widget_context(),
    ));
    main.dirty = state.is_dirty(&item.key);
    main.needs_restart = item.needs_restart();
    main.required = item.required;
    if matches!(main.widget, Some(Widget::Summary { .. })) {
        main.actions.push(RowAction::ToggleExpand {
            expand_key: item.key.clone(),
        });
    }
    push_reveal(&mut main, &item.key);

    let mut rows = vec![main];
    if expanded && shape.is_structured() && !is_reference_list(item) {
        let value = current_value(item, state);
        let builder = NestedRows { item, ctx };
        builder.collection(&mut rows, &[], &value, shape, 1);
    }

    if is_gated_off(item, ctx.items, state, ctx.override_mode) {
        for row in &mut rows {
            row.disabled = true;
        }
    }
    rows
}

fn push_reveal(row: &mut Row, reveal_key: &str) {
    if matches!(row.widget, Some(Widget::Text { secret: Some(_), .. })) {
        row.actions.push(RowAction::ToggleReveal {
            reveal_key: reveal_key.to_string(),
        });
    }
}

fn is_reference_list(item: &ConfigItem) -> bool {
    item.ref_presets_multiple || item.ref_model_groups
}

struct NestedRows<'a, 'b> {
    item: &'a ConfigItem,
    ctx: &'a RowContext<'b>,
}

impl NestedRows<'_, '_> {
    fn collection(
        &self,
        out: &mut Vec<Row>,
        path: &[PathSegment],
        value: &Value,
        shape: ValueShape,
        depth: usize,
    ) {
        match (shape, value) {
            (ValueShape::SimpleList { element }, Value::Array(items)) => {
                for (index, element_value) in items.iter().enumerate() {
                    let segment = PathSegment::Index(index);
                    let label = self.element_label(path, index);
                    out.push(self.scalar_row(path, segment, label, element, element_value, depth));
                }
                out.push(self.add_row(path, depth));
            }
            (ValueShape::SimpleDict { element }, Value::Object(map)) => {
                for (key, element_value) in map {
                    let segment = PathSegment::Key(key.clone());
                    out.push(self.scalar_row(
                        path,
                        segment,
                        key.clone(),
                        element,
                        element_value,
                        depth,
                    ));
                }
                out.push(self.new_key_row(path, depth));
            }
            (ValueShape::ComplexList, Value::Array(items)) => {
                for (index, element_value) in items.iter().enumerate() {
                    let label = self.element_label(path, index);
                    self.complex_element(
                        out,
                        PathSegment::Index(index),
                        label,
                        element_value,
                        depth,
                    );
                }
                out.push(self.add_row(path, depth));
            }
            (ValueShape::ComplexDict, Value::Object(map)) => {
                for (key, element_value) in map {
                    self.complex_element(
                        out,
                        PathSegment::Key(key.clone()),
                        key.clone(),
                        element_value,
                        depth,
                    );
                }
                out.push(self.new_key_row(path, depth));
            }
            _ => {}
        }
    }

    fn complex_element(
        &self,
        out: &mut Vec<Row>,
        segment: PathSegment,
        label: String,
        element: &Value,
        depth: usize,
    ) {
        let element_path = vec![segment.clone()];
        let mut header = Row::new(
            RowKind::ElementHeader,
            depth,
            label,
            Binding::nested(&self.item.key, element_path.clone()),
        );
        header.actions.push(RowAction::Delete {
            key: self.item.key.clone(),
            path: element_path.clone(),
        });
        out.push(header);

        for (name, schema) in &self.item.field_schema {
            self.sub_field(out, &segment, name, schema, element, depth + 1);
        }
    }

    fn sub_field(
        &self,
        out: &mut Vec<Row>,
        segment: &PathSegment,
        name: &str,
        schema: &SubFieldSchema,
        element: &Value,
        depth: usize,
    ) {
        let state = self.ctx.state;
        let path = vec![segment.clone(), PathSegment::Key(name.to_string())];
        let value = element
            .get(name)
            .cloned()
            .unwrap_or_else(|| sub_field_default(schema));
        let staged = serialize_value(&value);
        let nested_key = expansion_key(&self.item.key, segment, name);
        let expanded = state.is_expanded(&nested_key);

        let mut row = Row::new(
            RowKind::SubField,
            depth,
            schema.display_title(name, self.ctx.locale),
            Binding::nested(&self.item.key, path.clone()),
        );
        row.description = schema.display_description(self.ctx.locale);
        row.needs_restart = schema.is_need_restart;
        row.widget = Some(select_widget(
            WidgetRequest {
                meta: schema,
                staged: &staged,
                expand_key: &nested_key,
                expanded,
                revealed: state.is_revealed(&nested_key),
            },
            &self.ctx.widget_context(),
        ));
        if matches!(row.widget, Some(Widget::Summary { .. })) {
            row.actions.push(RowAction::ToggleExpand {
                expand_key: nested_key.clone(),
            });
        }
        push_reveal(&mut row, &nested_key);
        out.push(row);

        let shape = ValueShape::of(schema);
        if expanded && shape.is_structured() {
            self.collection(out, &path, &value, shape, depth + 1);
        }
    }

    fn scalar_row(
        &self,
        parent: &[PathSegment],
        segment: PathSegment,
        label: String,
        kind: ScalarKind,
        value: &Value,
        depth: usize,
    ) -> Row {
        let mut path = parent.to_vec();
        path.push(segment);
        let mut row = Row::new(
            RowKind::Element,
            depth,
            label,
            Binding::nested(&self.item.key, path.clone()),
        );
        row.widget = Some(scalar_widget(kind, &serialize_value(value)));
        row.actions.push(RowAction::Delete {
            key: self.item.key.clone(),
            path,
        });
        row
    }

    fn add_row(&self, path: &[PathSegment], depth: usize) -> Row {
        let mut row = Row::new(
            RowKind::AddItem,
            depth,
            "+ Add item".to_string(),
            Binding::nested(&self.item.key, path.to_vec()),
        );
        row.actions.push(RowAction::Append {
            key: self.item.key.clone(),
            path: path.to_vec(),
        });
        row
    }

    fn new_key_row(&self, path: &[PathSegment], depth: usize) -> Row {
        let mut row = Row::new(
            RowKind::NewKey,
            depth,
            "+ New key".to_string(),
            Binding::nested(&self.item.key, path.to_vec()),
        );
        row.actions.push(RowAction::InsertKey {
            key: self.item.key.clone(),
            path: path.to_vec(),
        });
        row
    }

    fn element_label(&self, path: &[PathSegment], index: usize) -> String {
        match (&self.item.sub_item_name, path.is_empty()) {
            (Some(name), true) => format!("{name} {index}"),
            _ => format!("#{index}"),
        }
    }
}
