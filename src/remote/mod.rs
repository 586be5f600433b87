//! HTTP collaborators: the autosave and submission endpoints.

mod client;
mod error;

pub use client::{ApplicationEndpoint, HttpEndpoint};
pub use error::RemoteError;
