mod item;
mod lint;
mod refs;
mod shape;
mod value;

pub use item::{ConfigItem, FieldMeta, FieldType, SubFieldSchema};
pub use lint::{SchemaDefect, lint_items};
pub use refs::{ModelGroup, ModelTypeOption, PresetRecord, ReferenceData};
pub use shape::{ScalarKind, ValueShape};
pub use value::{
    ValueError, deserialize_value, element_template, parse_scalar, parse_structured,
    scalar_default, serialize_value, shape_default, sub_field_default, summarize_value,
};
