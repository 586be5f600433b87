use std::path::PathBuf;

/// Errors that can occur while reading a pre-fill draft.
#[derive(Debug, thiserror::Error)]
pub enum PrefillError {
    /// The draft file could not be read.
    #[error("could not read draft {path}: {source}")]
    Io {
        /// The file that failed to open.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The draft file is not valid draft JSON.
    #[error("invalid draft JSON: {0}")]
    Json(#[from] serde_json::Error),
}
