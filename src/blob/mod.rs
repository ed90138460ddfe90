//! Blob storage for uploaded and background-stripped images.

pub mod local;
pub mod remote;

pub use local::LocalBlobStore;
pub use remote::SupabaseBlobStore;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("Blob storage credentials not configured")]
    MissingCredentials,
    #[error("Blob upload failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Blob storage returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Blob I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    fn name(&self) -> &'static str;

    /// Store `bytes` under `key` and return a URL the worksheet can load.
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> Result<String, BlobError>;
}

/// Content-addressed object key: identical bytes land on the same object.
pub fn object_key(prefix: &str, bytes: &[u8], extension: &str) -> String {
    let digest = blake3::hash(bytes).to_hex();
    format!("{}/{}.{}", prefix.trim_matches('/'), &digest.as_str()[..32], extension)
}

#[cfg(test)]
mod tests;
