//! Tier orchestration: picks an image for each dish.
//!
//! Automatic resolution only touches the cheap tiers (bundled presets, then
//! the shared cache). Search, generation and upload run when the user asks
//! for them. Every newly chosen image that is not a preset or a cache hit is
//! written back to the shared cache, best-effort.

use crate::blob::{object_key, BlobError, BlobStore};
use crate::engine::retrieval::sources::{CacheSource, ImageGenerator, ImageSearch, PresetSource};
use crate::engine::retrieval::{RetrievalError, SearchQuery};
use crate::engine::types::{ImageReference, MenuItemRecord, Tier};
use crate::media::{prepare_upload, BackgroundRemover, MediaError};
use crate::session::{MenuSession, SessionError};
use crate::store::{CacheStore, NewCacheEntry};
use futures::future::join_all;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Search query is empty")]
    EmptyQuery,
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),
    #[error(transparent)]
    Media(#[from] MediaError),
    #[error(transparent)]
    Blob(#[from] BlobError),
}

impl ResolveError {
    /// Missing provider credentials, as opposed to a provider failure.
    pub fn is_configuration(&self) -> bool {
        match self {
            ResolveError::Retrieval(e) => e.is_configuration(),
            ResolveError::Media(e) => matches!(e, MediaError::MissingCredentials),
            ResolveError::Blob(e) => matches!(e, BlobError::MissingCredentials),
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadSettings {
    pub max_edge: u32,
    pub key_prefix: String,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            max_edge: 800,
            key_prefix: "uploads".to_string(),
        }
    }
}

pub struct Resolver {
    presets: PresetSource,
    cache: CacheSource,
    search: Arc<dyn ImageSearch>,
    generator: Arc<dyn ImageGenerator>,
    remover: Option<Arc<dyn BackgroundRemover>>,
    blobs: Arc<dyn BlobStore>,
    upload: UploadSettings,
    search_limit: usize,
}

impl Resolver {
    pub fn new(
        presets: PresetSource,
        store: Arc<dyn CacheStore>,
        search: Arc<dyn ImageSearch>,
        generator: Arc<dyn ImageGenerator>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            presets,
            cache: CacheSource::new(store),
            search,
            generator,
            remover: None,
            blobs,
            upload: UploadSettings::default(),
            search_limit: 15,
        }
    }

    pub fn with_background_remover(mut self, remover: Arc<dyn BackgroundRemover>) -> Self {
        self.remover = Some(remover);
        self
    }

    pub fn with_upload_settings(mut self, upload: UploadSettings) -> Self {
        self.upload = upload;
        self
    }

    pub fn with_search_limit(mut self, limit: usize) -> Self {
        self.search_limit = limit.max(1);
        self
    }

    /* ---------- 1.  AUTOMATIC TIERS ---------- */

    /// Tier 1 then tier 2. A failing cache lookup counts as a miss.
    #[instrument(skip(self))]
    pub async fn resolve_automatic(&self, name: &str) -> Option<ImageReference> {
        if let Some(preset) = self.presets.lookup(name) {
            debug!(locator = %preset.locator, "preset hit");
            return Some(preset);
        }

        match self.cache.lookup(name).await {
            Ok(Some(hit)) => {
                info!(locator = %hit.locator, "shared cache hit");
                Some(hit)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(store = self.cache.store().name(), error = %e, "cache lookup failed");
                None
            }
        }
    }

    /// Run the automatic tiers once for every item that has no image and has
    /// not been tried in this session. Lookups for different items run
    /// concurrently. Returns how many items got an image.
    pub async fn resolve_pending(&self, session: &mut MenuSession) -> usize {
        let pending = session.pending();
        if pending.is_empty() {
            return 0;
        }
        for (id, _) in &pending {
            session.mark_attempted(*id);
        }

        let lookups = pending.iter().map(|(_, name)| self.resolve_automatic(name));
        let results = join_all(lookups).await;

        let mut resolved = 0;
        for ((id, _), found) in pending.into_iter().zip(results) {
            if let Some(image) = found {
                // replaced items are ignored; the session moved on
                if session.set_image(id, image).is_ok() {
                    resolved += 1;
                }
            }
        }
        info!(resolved, "automatic image lookup finished");
        resolved
    }

    /* ---------- 2.  USER-INITIATED TIERS ---------- */

    /// Tier 3: candidates for the user to pick from. Nothing is applied.
    pub async fn search_candidates(&self, query: &str) -> Result<Vec<String>, ResolveError> {
        let query = SearchQuery::new(query, self.search_limit);
        if query.is_blank() {
            return Err(ResolveError::EmptyQuery);
        }
        let urls = self.search.search(&query).await?;
        info!(provider = self.search.name(), hits = urls.len(), "image search finished");
        Ok(urls)
    }

    /// Apply a tier-3 candidate the user picked. The background is stripped
    /// when a remover is configured; if that fails the original URL is used.
    pub async fn apply_candidate(
        &self,
        session: &mut MenuSession,
        id: Uuid,
        url: &str,
    ) -> Result<ImageReference, ResolveError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ResolveError::EmptyQuery);
        }
        session.item(id)?;

        let locator = match self.strip_background(url).await {
            Some(processed) => processed,
            None => url.to_string(),
        };
        self.apply(session, id, locator, Tier::WebSearch).await
    }

    /// Tier 4: generate an image for the item's current name and apply it.
    pub async fn generate(
        &self,
        session: &mut MenuSession,
        id: Uuid,
    ) -> Result<ImageReference, ResolveError> {
        let name = session.item(id)?.display_name().to_string();
        let url = self.generator.generate(&name).await?;
        self.apply(session, id, url, Tier::AiGenerated).await
    }

    /// Manual upload: shrink, store, apply.
    pub async fn upload(
        &self,
        session: &mut MenuSession,
        id: Uuid,
        raw: &[u8],
    ) -> Result<ImageReference, ResolveError> {
        session.item(id)?;
        let prepared = prepare_upload(raw, self.upload.max_edge)?;
        let key = object_key(&self.upload.key_prefix, &prepared.bytes, prepared.extension);
        let url = self
            .blobs
            .put(&key, prepared.bytes, prepared.content_type)
            .await?;
        self.apply(session, id, url, Tier::UserUpload).await
    }

    /* ---------- 3.  HELPERS ---------- */

    async fn strip_background(&self, url: &str) -> Option<String> {
        let remover = self.remover.as_ref()?;
        let png = match remover.remove(url).await {
            Ok(png) => png,
            Err(e) => {
                warn!(remover = remover.name(), error = %e, "background removal failed, keeping original");
                return None;
            }
        };
        let key = object_key("processed", &png, "png");
        match self.blobs.put(&key, png, "image/png").await {
            Ok(stored) => Some(stored),
            Err(e) => {
                warn!(blobs = self.blobs.name(), error = %e, "storing processed image failed, keeping original");
                None
            }
        }
    }

    async fn apply(
        &self,
        session: &mut MenuSession,
        id: Uuid,
        locator: String,
        tier: Tier,
    ) -> Result<ImageReference, ResolveError> {
        let image = ImageReference::new(locator, tier);
        session.set_image(id, image.clone())?;
        session.mark_attempted(id);
        self.remember(session.item(id)?, &image).await;
        Ok(image)
    }

    /// Best-effort write-back to the shared cache.
    async fn remember(&self, item: &MenuItemRecord, image: &ImageReference) {
        if matches!(image.tier, Tier::Preset | Tier::SharedCache) {
            return;
        }
        let entry = NewCacheEntry {
            refined_name: item.display_name().to_string(),
            original_name: item.original_name.clone(),
            image_url: image.locator.clone(),
            source: image.tier,
        };
        match self.cache.store().record(entry).await {
            Ok(record) => debug!(usage = record.usage_count, "cached image recorded"),
            Err(e) => warn!(store = self.cache.store().name(), error = %e, "cache write failed"),
        }
    }
}
