//! Tier 2: read-only lookup in the shared cache store.

use crate::engine::types::{ImageReference, Tier};
use crate::store::{CacheStore, StoreError};
use std::sync::Arc;

pub struct CacheSource {
    store: Arc<dyn CacheStore>,
}

impl CacheSource {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    pub async fn lookup(&self, name: &str) -> Result<Option<ImageReference>, StoreError> {
        Ok(self
            .store
            .lookup(name)
            .await?
            .map(|record| ImageReference::new(record.image_url, Tier::SharedCache)))
    }
}
