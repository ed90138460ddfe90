//! Background stripping, delegated to an external service.

use super::MediaError;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use tracing::instrument;

pub const REMOVE_BG_URL: &str = "https://api.remove.bg/v1.0/removebg";

#[async_trait]
pub trait BackgroundRemover: Send + Sync {
    fn name(&self) -> &'static str;

    /// PNG bytes of the image at `image_url` with its background removed.
    async fn remove(&self, image_url: &str) -> Result<Bytes, MediaError>;
}

/// remove.bg-compatible HTTP client.
pub struct RemoveBgClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl RemoveBgClient {
    pub fn new(client: Client, endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key,
        }
    }
}

#[async_trait]
impl BackgroundRemover for RemoveBgClient {
    fn name(&self) -> &'static str {
        "remove.bg"
    }

    #[instrument(skip(self))]
    async fn remove(&self, image_url: &str) -> Result<Bytes, MediaError> {
        let api_key = self.api_key.as_deref().ok_or(MediaError::MissingCredentials)?;

        let response = self
            .client
            .post(&self.endpoint)
            .header("X-Api-Key", api_key)
            .header("Accept", "image/png")
            .form(&[("image_url", image_url), ("size", "auto"), ("format", "png")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MediaError::Status(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(MediaError::EmptyImage);
        }
        Ok(bytes)
    }
}
