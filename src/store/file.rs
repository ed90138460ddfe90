//! JSON-file cache backend for single-machine installs.
//!
//! The whole table is read and rewritten per write; fine for a classroom's
//! worth of dishes. Writes from one process are serialized by the lock.

use super::{most_relevant, upsert, CacheRecord, CacheStore, NewCacheEntry, StoreError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<CacheRecord>, StoreError> {
        match fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(Vec::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, records: &[CacheRecord]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(records)?).await?;
        fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), rows = records.len(), "cache file written");
        Ok(())
    }
}

#[async_trait]
impl CacheStore for FileStore {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn lookup(&self, refined_name: &str) -> Result<Option<CacheRecord>, StoreError> {
        let _guard = self.lock.lock().await;
        let records = self.load().await?;
        Ok(most_relevant(records.iter(), refined_name))
    }

    async fn record(&self, entry: NewCacheEntry) -> Result<CacheRecord, StoreError> {
        let _guard = self.lock.lock().await;
        let mut records = self.load().await?;
        let record = upsert(&mut records, entry);
        self.save(&records).await?;
        Ok(record)
    }
}
