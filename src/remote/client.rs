use std::path::Path;
use std::time::Duration;

use futures::future::BoxFuture;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use super::error::RemoteError;
use crate::model::FormData;
use crate::model::schema::is_upload;

/// The two server endpoints the form talks to.
///
/// Futures are `'static` so callers can hand them to a spawned task.
pub trait ApplicationEndpoint: Send + Sync + 'static {
    /// Persists an in-progress snapshot.
    fn autosave(&self, data: FormData) -> BoxFuture<'static, Result<(), RemoteError>>;

    /// Sends the final, validated application.
    fn submit(&self, data: FormData) -> BoxFuture<'static, Result<(), RemoteError>>;
}

/// Body of the autosave endpoint's JSON reply.
#[derive(Debug, Deserialize)]
struct SaveReply {
    #[serde(default)]
    success: bool,
}

/// [`ApplicationEndpoint`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpEndpoint {
    client: reqwest::Client,
    autosave_url: String,
    submit_url: String,
}

impl HttpEndpoint {
    /// Creates an endpoint posting drafts to `autosave_url` and applications to `submit_url`.
    pub fn new(
        autosave_url: impl Into<String>,
        submit_url: impl Into<String>,
    ) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            autosave_url: autosave_url.into(),
            submit_url: submit_url.into(),
        })
    }

    /// Returns the autosave URL.
    pub fn autosave_url(&self) -> &str {
        &self.autosave_url
    }

    /// Returns the submission URL.
    pub fn submit_url(&self) -> &str {
        &self.submit_url
    }
}

impl ApplicationEndpoint for HttpEndpoint {
    fn autosave(&self, data: FormData) -> BoxFuture<'static, Result<(), RemoteError>> {
        let client = self.client.clone();
        let url = self.autosave_url.clone();
        Box::pin(async move {
            let response = client.post(&url).form(data.entries()).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(RemoteError::Status(status.as_u16()));
            }
            let reply: SaveReply = response.json().await?;
            if reply.success {
                Ok(())
            } else {
                Err(RemoteError::Rejected)
            }
        })
    }

    fn submit(&self, data: FormData) -> BoxFuture<'static, Result<(), RemoteError>> {
        let client = self.client.clone();
        let url = self.submit_url.clone();
        Box::pin(async move {
            let mut form = Form::new();
            for (name, value) in data.entries() {
                if !is_upload(name) {
                    form = form.text(name.clone(), value.clone());
                } else if !value.is_empty() {
                    form = form.part(name.clone(), file_part(value).await?);
                }
            }

            let response = client.post(&url).multipart(form).send().await?;
            let status = response.status();
            if status.is_success() {
                Ok(())
            } else {
                Err(RemoteError::Status(status.as_u16()))
            }
        })
    }
}

async fn file_part(path: &str) -> Result<Part, RemoteError> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    Ok(Part::bytes(bytes).file_name(file_name))
}
