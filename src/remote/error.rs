/// Errors talking to the application endpoints.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// The request could not be sent or the response could not be decoded.
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    /// An upload could not be read from disk.
    #[error("could not read upload: {0}")]
    Io(#[from] std::io::Error),

    /// The endpoint answered with a non-success HTTP status.
    #[error("server responded with status {0}")]
    Status(u16),

    /// The endpoint answered but reported `success: false`.
    #[error("server rejected the request")]
    Rejected,
}

impl RemoteError {
    /// Returns `true` when the server was reached and refused the request.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Status(_) | Self::Rejected)
    }
}
