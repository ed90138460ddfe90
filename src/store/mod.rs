//! Shared image cache: previously resolved images keyed by dish name.
//!
//! Writes are upserts keyed by `(refined_name, image_url)`; resolving the same
//! pair again bumps `usage_count` instead of adding a row.

pub mod file;
pub mod memory;
pub mod rest;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use rest::RestStore;

use crate::engine::types::Tier;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Cache store credentials not configured")]
    MissingCredentials,
    #[error("Cache store request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Cache store returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Cache store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cache store data error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid cache store URL: {0}")]
    Url(#[from] url::ParseError),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CacheRecord {
    pub id: String,
    pub refined_name: String,
    pub original_name: String,
    pub image_url: String,
    pub source: Tier,
    pub usage_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What a resolver hands the store after applying a new image.
#[derive(Serialize, Debug, Clone)]
pub struct NewCacheEntry {
    pub refined_name: String,
    pub original_name: String,
    pub image_url: String,
    pub source: Tier,
}

impl CacheRecord {
    pub fn from_entry(entry: NewCacheEntry, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            refined_name: entry.refined_name,
            original_name: entry.original_name,
            image_url: entry.image_url,
            source: entry.source,
            usage_count: 1,
            created_at: now,
            updated_at: now,
        }
    }

    fn bump(&mut self, source: Tier, now: DateTime<Utc>) {
        self.usage_count = self.usage_count.saturating_add(1);
        self.source = source;
        self.updated_at = now;
    }
}

#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &'static str;

    /// Most relevant record for `refined_name`: highest usage count, then most
    /// recently updated.
    async fn lookup(&self, refined_name: &str) -> Result<Option<CacheRecord>, StoreError>;

    /// Insert `entry`, or bump the usage count of the existing
    /// `(refined_name, image_url)` record.
    async fn record(&self, entry: NewCacheEntry) -> Result<CacheRecord, StoreError>;
}

/// Shared in-process upsert over a record list, used by the local backends.
pub(crate) fn upsert(records: &mut Vec<CacheRecord>, entry: NewCacheEntry) -> CacheRecord {
    let now = Utc::now();
    if let Some(existing) = records
        .iter_mut()
        .find(|r| r.refined_name == entry.refined_name && r.image_url == entry.image_url)
    {
        existing.bump(entry.source, now);
        return existing.clone();
    }
    let record = CacheRecord::from_entry(entry, now);
    records.push(record.clone());
    record
}

/// Ranking shared by the local backends.
pub(crate) fn most_relevant<'a>(
    records: impl Iterator<Item = &'a CacheRecord>,
    refined_name: &str,
) -> Option<CacheRecord> {
    records
        .filter(|r| r.refined_name == refined_name)
        .max_by(|a, b| {
            a.usage_count
                .cmp(&b.usage_count)
                .then(a.updated_at.cmp(&b.updated_at))
        })
        .cloned()
}
