//! Actions returned by screen event handlers.

/// An action that a screen handler returns to the [`App`](super::App).
///
/// The `App` interprets these to update global state: autosave, alerts,
/// the help overlay, submission, and quitting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// No state change needed.
    None,
    /// A value in the form changed; reschedule the autosave.
    Edited,
    /// Show a modal alert with the given message.
    Alert(String),
    /// Validate the form and, if it passes, send it.
    Submit,
    /// Show or hide the keybinding reference.
    ToggleHelp,
    /// Quit the application.
    Quit,
}
