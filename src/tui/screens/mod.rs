//! TUI screen implementations.

pub mod activities;
pub mod application;
pub mod help;

pub use activities::{ActivityError, ActivityHandle, ActivityList, draw_activities};
pub use application::{ApplicationForm, FieldLocation, Panel, draw_application};
pub use help::{HelpState, draw_help};
