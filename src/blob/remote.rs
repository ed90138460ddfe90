//! Supabase Storage blob store.

use super::{BlobError, BlobStore};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use tracing::{debug, instrument};

pub struct SupabaseBlobStore {
    client: Client,
    base_url: Option<String>,
    api_key: Option<String>,
    bucket: String,
}

impl SupabaseBlobStore {
    pub fn new(
        client: Client,
        base_url: Option<String>,
        api_key: Option<String>,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url,
            api_key,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl BlobStore for SupabaseBlobStore {
    fn name(&self) -> &'static str {
        "supabase"
    }

    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<String, BlobError> {
        let (base, api_key) = match (self.base_url.as_deref(), self.api_key.as_deref()) {
            (Some(base), Some(api_key)) => (base.trim_end_matches('/'), api_key),
            _ => return Err(BlobError::MissingCredentials),
        };

        let response = self
            .client
            .post(format!("{base}/storage/v1/object/{}/{key}", self.bucket))
            .header("apikey", api_key)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("Content-Type", content_type)
            .header("x-upsert", "true")
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BlobError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let public = format!("{base}/storage/v1/object/public/{}/{key}", self.bucket);
        debug!(url = %public, "blob uploaded");
        Ok(public)
    }
}
