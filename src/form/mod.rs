mod error;
mod gate;
mod mutate;
mod path;
mod rows;
mod state;
mod widget;

pub use error::EditError;
pub use gate::{is_gated_off, toggle_enabled};
pub use mutate::{
    append_element, current_value, delete_element, element_seed, insert_key, set_element, shape_at,
};
pub use path::{
    Binding, PathSegment, ValuePath, display_path, expansion_key, value_at, value_at_mut,
};
pub use rows::{Row, RowAction, RowContext, RowKind, item_rows, table_rows};
pub use state::EditState;
pub use widget::{
    Choice, DEFAULT_PRESET_ID, PresetChip, PresetOption, SecretState, Widget, WidgetContext,
    WidgetKind, WidgetRequest, scalar_widget, select_widget, toggle_preset_id,
};
