//! User actions, one function each. Every command answers with a JSON string
//! or a human-readable error, so any front end (the CLI, a web shell) can
//! forward the result unchanged.

use crate::blob::{BlobStore, LocalBlobStore, SupabaseBlobStore};
use crate::config::{BlobBackend, Config, SearchProvider, StoreBackend};
use crate::engine::retrieval::sources::{
    ImageGenerator, ImageSearch, NaverImageSearch, OpenAiImageGenerator, PixabayImageSearch,
    PresetSource,
};
use crate::engine::{Resolver, UploadSettings};
use crate::media::RemoveBgClient;
use crate::neis::NeisClient;
use crate::preprocessing::{refine as refine_name, search_keywords};
use crate::session::MenuSession;
use crate::store::{CacheStore, FileStore, MemoryStore, RestStore};
use crate::worksheet::Worksheet;
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

pub struct AppState {
    pub config: Config,
    pub neis: NeisClient,
    pub resolver: Resolver,
}

impl AppState {
    pub fn new(config: Config, neis: NeisClient, resolver: Resolver) -> Self {
        Self {
            config,
            neis,
            resolver,
        }
    }

    /// Wire every provider from `config`. One HTTP client is shared.
    pub fn from_config(config: Config) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.http.timeout())
            .user_agent(config.http.user_agent.clone())
            .build()?;

        let neis = NeisClient::new(client.clone(), config.neis.base_url.clone(), config.neis.api_key.clone())
            .with_page_sizes(config.neis.school_page_size, config.neis.meal_page_size);

        let store: Arc<dyn CacheStore> = match config.store.backend {
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
            StoreBackend::File => Arc::new(FileStore::new(config.store.path.clone())),
            StoreBackend::Rest => Arc::new(RestStore::new(
                client.clone(),
                config.store.url.clone(),
                config.store.api_key.clone(),
                config.store.table.clone(),
            )),
        };

        let search: Arc<dyn ImageSearch> = match config.search.provider {
            SearchProvider::Naver => Arc::new(NaverImageSearch::new(
                client.clone(),
                config.search.naver_base_url.clone(),
                config.search.naver_client_id.clone(),
                config.search.naver_client_secret.clone(),
                config.search.naver_suffix.clone(),
            )),
            SearchProvider::Pixabay => Arc::new(PixabayImageSearch::new(
                client.clone(),
                config.search.pixabay_base_url.clone(),
                config.search.pixabay_api_key.clone(),
                config.search.pixabay_suffix.clone(),
            )),
        };

        let generator: Arc<dyn ImageGenerator> = Arc::new(OpenAiImageGenerator::new(
            client.clone(),
            config.generation.base_url.clone(),
            config.generation.api_key.clone(),
            config.generation.model.clone(),
            config.generation.size.clone(),
        ));

        let blobs: Arc<dyn BlobStore> = match config.blob.backend {
            BlobBackend::Local => Arc::new(LocalBlobStore::new(
                config.blob.root.clone(),
                config.blob.public_base.clone(),
            )),
            BlobBackend::Supabase => Arc::new(SupabaseBlobStore::new(
                client.clone(),
                config.blob.url.clone(),
                config.blob.api_key.clone(),
                config.blob.bucket.clone(),
            )),
        };

        let mut resolver = Resolver::new(
            PresetSource::new(config.presets.asset_root.clone()),
            store,
            search,
            generator,
            blobs,
        )
        .with_search_limit(config.search.limit)
        .with_upload_settings(UploadSettings {
            max_edge: config.upload.max_edge,
            key_prefix: config.upload.key_prefix.clone(),
        });

        if config.strips_backgrounds() {
            resolver = resolver.with_background_remover(Arc::new(RemoveBgClient::new(
                client,
                config.background.endpoint.clone(),
                config.background.api_key.clone(),
            )));
        }

        info!(
            store = ?config.store.backend,
            search = ?config.search.provider,
            blobs = ?config.blob.backend,
            "providers configured"
        );
        Ok(Self::new(config, neis, resolver))
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| e.to_string())
}

/// Accepts an item UUID or its 1-based position in the menu.
pub fn item_id(session: &MenuSession, key: &str) -> Result<Uuid, String> {
    let key = key.trim();
    if let Ok(position) = key.parse::<usize>() {
        return position
            .checked_sub(1)
            .and_then(|index| session.items().get(index))
            .map(|item| item.id)
            .ok_or_else(|| format!("No menu item at position {position}"));
    }
    Uuid::parse_str(key).map_err(|_| format!("Not an item id or position: {key}"))
}

/* ---------- 1.  NAMES ---------- */

#[derive(Serialize)]
struct RefinedName {
    original: String,
    refined: String,
    keywords: String,
}

pub fn refine(raw: &str) -> Result<String, String> {
    let refined = refine_name(raw);
    to_json(&RefinedName {
        original: raw.to_string(),
        keywords: search_keywords(&refined),
        refined,
    })
}

/* ---------- 2.  SCHOOL + MENU ---------- */

pub async fn search_schools(state: &AppState, query: &str) -> Result<String, String> {
    let schools = state
        .neis
        .search_schools(query)
        .await
        .map_err(|e| e.to_string())?;
    to_json(&schools)
}

#[derive(Serialize)]
struct MenuView<'a> {
    session: &'a MenuSession,
    resolved: usize,
    worksheet: Worksheet,
}

/// Fetch the day's menu for the selected school, replace the session items
/// and run the automatic image tiers once.
pub async fn fetch_menu(state: &AppState, session: &mut MenuSession) -> Result<String, String> {
    if !session.has_school() {
        return Err("No school selected".to_string());
    }
    let lines = state
        .neis
        .daily_menu(&session.office_code, &session.school_code, session.date)
        .await
        .map_err(|e| e.to_string())?;

    session.replace_items(&lines);
    let resolved = state.resolver.resolve_pending(session).await;
    info!(items = lines.len(), resolved, date = %session.date, "menu loaded");

    to_json(&MenuView {
        worksheet: Worksheet::build(session),
        resolved,
        session,
    })
}

pub fn worksheet(session: &MenuSession) -> Result<String, String> {
    to_json(&Worksheet::build(session))
}

/* ---------- 3.  IMAGES ---------- */

pub async fn search_images(state: &AppState, query: &str) -> Result<String, String> {
    let urls = state
        .resolver
        .search_candidates(query)
        .await
        .map_err(|e| e.to_string())?;
    to_json(&urls)
}

pub async fn apply_image(
    state: &AppState,
    session: &mut MenuSession,
    item: &str,
    url: &str,
) -> Result<String, String> {
    let id = item_id(session, item)?;
    let image = state
        .resolver
        .apply_candidate(session, id, url)
        .await
        .map_err(|e| e.to_string())?;
    to_json(&image)
}

pub async fn generate_image(
    state: &AppState,
    session: &mut MenuSession,
    item: &str,
) -> Result<String, String> {
    let id = item_id(session, item)?;
    let image = state
        .resolver
        .generate(session, id)
        .await
        .map_err(|e| e.to_string())?;
    to_json(&image)
}

pub async fn upload_image(
    state: &AppState,
    session: &mut MenuSession,
    item: &str,
    bytes: &[u8],
) -> Result<String, String> {
    let id = item_id(session, item)?;
    let image = state
        .resolver
        .upload(session, id, bytes)
        .await
        .map_err(|e| e.to_string())?;
    to_json(&image)
}

/* ---------- 4.  ITEM EDITS ---------- */

pub fn rename_item(session: &mut MenuSession, item: &str, name: &str) -> Result<String, String> {
    let id = item_id(session, item)?;
    session.rename(id, name).map_err(|e| e.to_string())?;
    to_json(session.item(id).map_err(|e| e.to_string())?)
}

pub fn toggle_item(session: &mut MenuSession, item: &str) -> Result<String, String> {
    let id = item_id(session, item)?;
    session.toggle_hidden(id).map_err(|e| e.to_string())?;
    to_json(session.item(id).map_err(|e| e.to_string())?)
}

pub fn toggle_tracing_text(session: &mut MenuSession) -> Result<String, String> {
    session.toggle_tracing_text();
    worksheet(session)
}
