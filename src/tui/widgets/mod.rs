//! Reusable TUI widgets.

pub mod alert;
pub mod form;
pub mod status_bar;
pub mod word_counter;

pub use alert::draw_alert;
pub use form::{Form, FormField, draw_form};
pub use status_bar::{StatusBarContext, draw_status_bar, progress_line};
pub use word_counter::WordCounter;
