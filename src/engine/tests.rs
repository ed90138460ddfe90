use super::*;
use crate::blob::{BlobError, BlobStore, LocalBlobStore};
use crate::engine::retrieval::sources::{ImageGenerator, ImageSearch, PresetSource};
use crate::engine::retrieval::{RetrievalError, SearchQuery};
use crate::media::{BackgroundRemover, MediaError};
use crate::session::MenuSession;
use crate::store::{CacheRecord, CacheStore, MemoryStore, NewCacheEntry, StoreError};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::NaiveDate;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::tempdir;

/* ---------- fakes ---------- */

#[derive(Default)]
struct CountingStore {
    inner: MemoryStore,
    lookups: AtomicUsize,
    fail_lookups: bool,
}

#[async_trait]
impl CacheStore for CountingStore {
    fn name(&self) -> &'static str {
        "counting"
    }

    async fn lookup(&self, refined_name: &str) -> Result<Option<CacheRecord>, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_lookups {
            return Err(StoreError::MissingCredentials);
        }
        self.inner.lookup(refined_name).await
    }

    async fn record(&self, entry: NewCacheEntry) -> Result<CacheRecord, StoreError> {
        self.inner.record(entry).await
    }
}

#[derive(Default)]
struct FakeSearch {
    urls: Vec<String>,
    calls: AtomicUsize,
}

#[async_trait]
impl ImageSearch for FakeSearch {
    fn name(&self) -> &'static str {
        "fake-search"
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<String>, RetrievalError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.urls.iter().take(query.limit).cloned().collect())
    }
}

struct FakeGenerator {
    url: Option<String>,
}

#[async_trait]
impl ImageGenerator for FakeGenerator {
    fn name(&self) -> &'static str {
        "fake-gen"
    }

    async fn generate(&self, food_name: &str) -> Result<String, RetrievalError> {
        match &self.url {
            Some(url) => Ok(format!("{url}?q={food_name}")),
            None => Err(RetrievalError::MissingCredentials(self.name())),
        }
    }
}

struct FakeRemover {
    works: bool,
}

#[async_trait]
impl BackgroundRemover for FakeRemover {
    fn name(&self) -> &'static str {
        "fake-remover"
    }

    async fn remove(&self, _image_url: &str) -> Result<Bytes, MediaError> {
        if self.works {
            Ok(Bytes::from_static(b"stripped-png"))
        } else {
            Err(MediaError::Status(500))
        }
    }
}

struct MemoryBlobs;

#[async_trait]
impl BlobStore for MemoryBlobs {
    fn name(&self) -> &'static str {
        "memory-blobs"
    }

    async fn put(&self, key: &str, _bytes: Bytes, _content_type: &str) -> Result<String, BlobError> {
        Ok(format!("https://blobs/{key}"))
    }
}

struct Fixture {
    store: Arc<CountingStore>,
    search: Arc<FakeSearch>,
    resolver: Resolver,
}

fn fixture_with(store: CountingStore, search: FakeSearch, generator: FakeGenerator) -> Fixture {
    let store = Arc::new(store);
    let search = Arc::new(search);
    let resolver = Resolver::new(
        PresetSource::default(),
        store.clone(),
        search.clone(),
        Arc::new(generator),
        Arc::new(MemoryBlobs),
    );
    Fixture {
        store,
        search,
        resolver,
    }
}

fn fixture() -> Fixture {
    fixture_with(
        CountingStore::default(),
        FakeSearch::default(),
        FakeGenerator {
            url: Some("https://gen/img.png".into()),
        },
    )
}

fn session(lines: &[&str]) -> MenuSession {
    let mut session = MenuSession::new(NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
    session.replace_items(lines);
    session
}

async fn seed(store: &CountingStore, name: &str, url: &str) {
    store
        .record(NewCacheEntry {
            refined_name: name.into(),
            original_name: name.into(),
            image_url: url.into(),
            source: Tier::AiGenerated,
        })
        .await
        .unwrap();
}

/* ---------- automatic tiers ---------- */

#[tokio::test]
async fn preset_wins_over_cache_entry() {
    let fx = fixture();
    seed(&fx.store, "현미밥", "https://cache/rice.png").await;

    let image = fx.resolver.resolve_automatic("현미밥").await.unwrap();
    assert_eq!(image.tier, Tier::Preset);
    assert_eq!(fx.store.lookups.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn cache_answers_when_no_preset_matches() {
    let fx = fixture();
    seed(&fx.store, "돈육불고기", "https://cache/bulgogi.png").await;

    let image = fx.resolver.resolve_automatic("돈육불고기").await.unwrap();
    assert_eq!(image, ImageReference::new("https://cache/bulgogi.png", Tier::SharedCache));
}

#[tokio::test]
async fn failing_cache_counts_as_a_miss() {
    let fx = fixture_with(
        CountingStore {
            fail_lookups: true,
            ..Default::default()
        },
        FakeSearch::default(),
        FakeGenerator { url: None },
    );
    assert!(fx.resolver.resolve_automatic("돈육불고기").await.is_none());
    assert_eq!(fx.store.lookups.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn resolve_pending_attaches_images_and_runs_once_per_item() {
    let fx = fixture();
    seed(&fx.store, "잡채", "https://cache/japchae.png").await;
    let mut session = session(&["친환경현미밥(1.2)", "쇠고기미역국(5.6)", "잡채(1.2)", "탕평채"]);

    let resolved = fx.resolver.resolve_pending(&mut session).await;
    assert_eq!(resolved, 3);
    let tiers: Vec<_> = session
        .items()
        .iter()
        .map(|i| i.image.as_ref().map(|img| img.tier))
        .collect();
    assert_eq!(
        tiers,
        [Some(Tier::Preset), Some(Tier::Preset), Some(Tier::SharedCache), None]
    );
    // presets never reach the cache: only 잡채 and 탕평채 were looked up
    assert_eq!(fx.store.lookups.load(Ordering::SeqCst), 2);

    // re-render: the unresolved item was already tried
    assert_eq!(fx.resolver.resolve_pending(&mut session).await, 0);
    assert_eq!(fx.store.lookups.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn new_fetch_allows_fresh_attempts() {
    let fx = fixture();
    let mut session = session(&["탕평채"]);
    fx.resolver.resolve_pending(&mut session).await;
    seed(&fx.store, "탕평채", "https://cache/t.png").await;

    session.replace_items(&["탕평채"]);
    assert_eq!(fx.resolver.resolve_pending(&mut session).await, 1);
}

/* ---------- search ---------- */

#[tokio::test]
async fn blank_search_makes_no_call() {
    let fx = fixture();
    let err = fx.resolver.search_candidates("  ").await.unwrap_err();
    assert!(matches!(err, ResolveError::EmptyQuery));
    assert_eq!(fx.search.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn empty_search_result_is_an_empty_list() {
    let fx = fixture();
    let urls = fx.resolver.search_candidates("탕평채").await.unwrap();
    assert!(urls.is_empty());
    assert_eq!(fx.search.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn search_results_are_not_applied() {
    let fx = fixture_with(
        CountingStore::default(),
        FakeSearch {
            urls: vec!["https://s/1.jpg".into(), "https://s/2.jpg".into()],
            ..Default::default()
        },
        FakeGenerator { url: None },
    );
    let resolver = fx.resolver.with_search_limit(1);
    let urls = resolver.search_candidates("탕평채").await.unwrap();
    assert_eq!(urls, ["https://s/1.jpg"]);
    assert!(fx.store.inner.is_empty().await);
}

/* ---------- applying user choices ---------- */

#[tokio::test]
async fn picked_candidate_without_remover_keeps_url_and_is_cached() {
    let fx = fixture();
    let mut session = session(&["탕평채(5)"]);
    let id = session.items()[0].id;

    let image = fx
        .resolver
        .apply_candidate(&mut session, id, "https://s/1.jpg")
        .await
        .unwrap();
    assert_eq!(image, ImageReference::new("https://s/1.jpg", Tier::WebSearch));

    let cached = fx.store.inner.lookup("탕평채").await.unwrap().unwrap();
    assert_eq!(cached.image_url, "https://s/1.jpg");
    assert_eq!(cached.original_name, "탕평채(5)");
    assert_eq!(cached.source, Tier::WebSearch);
}

#[tokio::test]
async fn picked_candidate_is_background_stripped_when_possible() {
    let fx = fixture();
    let resolver = fx
        .resolver
        .with_background_remover(Arc::new(FakeRemover { works: true }));
    let mut session = session(&["탕평채"]);
    let id = session.items()[0].id;

    let image = resolver
        .apply_candidate(&mut session, id, "https://s/1.jpg")
        .await
        .unwrap();
    assert!(image.locator.starts_with("https://blobs/processed/"));
    assert!(image.locator.ends_with(".png"));
    assert_eq!(image.tier, Tier::WebSearch);
}

#[tokio::test]
async fn failed_background_removal_falls_back_to_original() {
    let fx = fixture();
    let resolver = fx
        .resolver
        .with_background_remover(Arc::new(FakeRemover { works: false }));
    let mut session = session(&["탕평채"]);
    let id = session.items()[0].id;

    let image = resolver
        .apply_candidate(&mut session, id, "https://s/1.jpg")
        .await
        .unwrap();
    assert_eq!(image.locator, "https://s/1.jpg");
}

#[tokio::test]
async fn generation_replaces_existing_image_and_counts_reuse() {
    let fx = fixture();
    let mut session = session(&["현미밥", "현미밥"]);
    fx.resolver.resolve_pending(&mut session).await;
    let first = session.items()[0].id;
    let second = session.items()[1].id;

    let image = fx.resolver.generate(&mut session, first).await.unwrap();
    assert_eq!(image.tier, Tier::AiGenerated);
    assert_eq!(session.item(first).unwrap().image, Some(image.clone()));

    fx.resolver.generate(&mut session, second).await.unwrap();
    let cached = fx.store.inner.lookup("현미밥").await.unwrap().unwrap();
    assert_eq!(cached.usage_count, 2);
    assert_eq!(fx.store.inner.len().await, 1);
}

#[tokio::test]
async fn generation_uses_the_overridden_label() {
    let fx = fixture();
    let mut session = session(&["쇠고기미역국"]);
    let id = session.items()[0].id;
    session.rename(id, "미역국").unwrap();

    let image = fx.resolver.generate(&mut session, id).await.unwrap();
    assert!(image.locator.ends_with("?q=미역국"));
    assert!(fx.store.inner.lookup("미역국").await.unwrap().is_some());
}

#[tokio::test]
async fn missing_generator_key_is_a_configuration_error() {
    let fx = fixture_with(
        CountingStore::default(),
        FakeSearch::default(),
        FakeGenerator { url: None },
    );
    let mut session = session(&["탕평채"]);
    let id = session.items()[0].id;

    let err = fx.resolver.generate(&mut session, id).await.unwrap_err();
    assert!(err.is_configuration());
    assert!(session.item(id).unwrap().image.is_none());
}

#[tokio::test]
async fn upload_is_compressed_stored_and_labelled() {
    let dir = tempdir().unwrap();
    let store = Arc::new(MemoryStore::new());
    let resolver = Resolver::new(
        PresetSource::default(),
        store.clone(),
        Arc::new(FakeSearch::default()),
        Arc::new(FakeGenerator { url: None }),
        Arc::new(LocalBlobStore::new(dir.path(), Some("http://localhost/blobs".into()))),
    )
    .with_upload_settings(UploadSettings {
        max_edge: 32,
        key_prefix: "uploads".into(),
    });

    let mut raw = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(image::RgbImage::new(64, 64))
        .write_to(&mut raw, image::ImageFormat::Png)
        .unwrap();

    let mut session = session(&["탕평채"]);
    let id = session.items()[0].id;
    let image = resolver
        .upload(&mut session, id, raw.get_ref())
        .await
        .unwrap();

    assert_eq!(image.tier, Tier::UserUpload);
    assert!(image.locator.starts_with("http://localhost/blobs/uploads/"));
    assert!(image.locator.ends_with(".jpg"));
    assert_eq!(store.lookup("탕평채").await.unwrap().unwrap().source, Tier::UserUpload);
}

#[tokio::test]
async fn unknown_item_is_rejected_before_any_call() {
    let fx = fixture();
    let mut session = session(&["탕평채"]);
    let stray = uuid::Uuid::new_v4();

    let err = fx
        .resolver
        .apply_candidate(&mut session, stray, "https://s/1.jpg")
        .await
        .unwrap_err();
    assert!(matches!(err, ResolveError::Session(_)));
    assert!(fx.store.inner.is_empty().await);
}
