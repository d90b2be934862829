mod dialog;
mod footer;
mod input;
mod layout;
mod popup;
mod table;

pub use dialog::render_dialog;
pub use footer::render_footer;
pub use input::render_input;
pub use popup::render_popup;
pub use table::render_table;
