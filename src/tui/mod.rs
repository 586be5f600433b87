//! TUI: App state, event loop, step panels, validation, widgets.

pub mod action;
pub mod app;
pub mod error;
pub mod screens;
pub mod steps;
pub mod validator;
pub mod widgets;

pub use app::App;
pub use error::AppError;
