//! In-process cache backend. The upsert runs under a single lock, so it is
//! atomic within the process.

use super::{most_relevant, upsert, CacheRecord, CacheStore, NewCacheEntry, StoreError};
use async_trait::async_trait;
use tokio::sync::Mutex;

#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<CacheRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<CacheRecord>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn lookup(&self, refined_name: &str) -> Result<Option<CacheRecord>, StoreError> {
        let guard = self.records.lock().await;
        Ok(most_relevant(guard.iter(), refined_name))
    }

    async fn record(&self, entry: NewCacheEntry) -> Result<CacheRecord, StoreError> {
        let mut guard = self.records.lock().await;
        Ok(upsert(&mut guard, entry))
    }
}
