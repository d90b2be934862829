mod cells;
mod components;
mod view;

pub use cells::{fit, row_label, widget_text};
pub use view::{DialogView, InputRender, PopupRender, UiContext, draw};
