use super::item::{FieldMeta, FieldType};

/// Editable kind of a primitive value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Text,
    Integer,
    Float,
    Bool,
}

impl ScalarKind {
    pub fn from_type(kind: &FieldType) -> Self {
        match kind {
            FieldType::Int | FieldType::Preset => ScalarKind::Integer,
            FieldType::Float => ScalarKind::Float,
            FieldType::Bool => ScalarKind::Bool,
            _ => ScalarKind::Text,
        }
    }
}

/// Structural shape of a field, derived from its declared type flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    Scalar(ScalarKind),
    SimpleList { element: ScalarKind },
    ComplexList,
    SimpleDict { element: ScalarKind },
    ComplexDict,
}

impl ValueShape {
    pub fn of(meta: &(impl FieldMeta + ?Sized)) -> Self {
        let element = meta
            .element_type()
            .map(ScalarKind::from_type)
            .unwrap_or(ScalarKind::Text);
        match meta.kind() {
            FieldType::List if meta.is_complex() => ValueShape::ComplexList,
            FieldType::List => ValueShape::SimpleList { element },
            FieldType::Presets => ValueShape::SimpleList {
                element: ScalarKind::Integer,
            },
            FieldType::Dict if meta.is_complex() => ValueShape::ComplexDict,
            FieldType::Dict => ValueShape::SimpleDict { element },
            other => ValueShape::Scalar(ScalarKind::from_type(other)),
        }
    }

    /// Shapes whose staged value is JSON.
    pub fn is_structured(self) -> bool {
        !matches!(self, ValueShape::Scalar(_))
    }
}
