//! Directory-backed blob store.

use super::{BlobError, BlobStore};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

pub struct LocalBlobStore {
    root: PathBuf,
    public_base: Option<String>,
}

impl LocalBlobStore {
    /// `public_base`, when set, is the URL prefix the directory is served
    /// under; otherwise the returned locator is the file path.
    pub fn new(root: impl Into<PathBuf>, public_base: Option<String>) -> Self {
        Self {
            root: root.into(),
            public_base,
        }
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn put(&self, key: &str, bytes: Bytes, _content_type: &str) -> Result<String, BlobError> {
        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, &bytes).await?;
        debug!(path = %path.display(), size = bytes.len(), "blob written");

        Ok(match &self.public_base {
            Some(base) => format!("{}/{}", base.trim_end_matches('/'), key),
            None => path.display().to_string(),
        })
    }
}
