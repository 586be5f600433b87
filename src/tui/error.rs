use crate::draft::PrefillError;
use crate::remote::RemoteError;

/// Errors that can occur in the TUI layer.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// An I/O error occurred (terminal, event reading, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The pre-fill draft could not be loaded.
    #[error("Pre-fill error: {0}")]
    Prefill(#[from] PrefillError),

    /// The HTTP client could not be set up.
    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),
}
