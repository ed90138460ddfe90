//! Runtime configuration.
//!
//! Load order: built-in defaults, then an optional TOML file, then
//! environment variables. Credentials stay `Option<String>`; each provider
//! reports a missing one when it is actually called.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::engine::retrieval::sources::{
    DEFAULT_ASSET_ROOT, NAVER_BASE_URL, OPENAI_BASE_URL, PIXABAY_BASE_URL,
};
use crate::media::background::REMOVE_BG_URL;
use crate::neis::NEIS_BASE_URL;
use crate::store::rest::DEFAULT_TABLE;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/* ---------- 1.  SECTIONS ---------- */

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub neis: NeisConfig,
    pub search: SearchConfig,
    pub generation: GenerationConfig,
    pub store: StoreConfig,
    pub blob: BlobConfig,
    pub background: BackgroundConfig,
    pub presets: PresetConfig,
    pub upload: UploadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: concat!("menutray/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NeisConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub school_page_size: u32,
    pub meal_page_size: u32,
}

impl Default for NeisConfig {
    fn default() -> Self {
        Self {
            base_url: NEIS_BASE_URL.to_string(),
            api_key: None,
            school_page_size: 20,
            meal_page_size: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchProvider {
    #[default]
    Naver,
    Pixabay,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub provider: SearchProvider,
    pub limit: usize,
    pub naver_base_url: String,
    pub naver_client_id: Option<String>,
    pub naver_client_secret: Option<String>,
    /// Appended to every Naver query to bias results toward food photos.
    pub naver_suffix: String,
    pub pixabay_base_url: String,
    pub pixabay_api_key: Option<String>,
    pub pixabay_suffix: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            provider: SearchProvider::Naver,
            limit: 15,
            naver_base_url: NAVER_BASE_URL.to_string(),
            naver_client_id: None,
            naver_client_secret: None,
            naver_suffix: "음식".to_string(),
            pixabay_base_url: PIXABAY_BASE_URL.to_string(),
            pixabay_api_key: None,
            pixabay_suffix: "isolated white background food".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub size: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: OPENAI_BASE_URL.to_string(),
            api_key: None,
            model: "dall-e-3".to_string(),
            size: "1024x1024".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    #[default]
    File,
    Rest,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub path: PathBuf,
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub table: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::File,
            path: PathBuf::from(".menutray/cache.json"),
            url: None,
            api_key: None,
            table: DEFAULT_TABLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlobBackend {
    #[default]
    Local,
    Supabase,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlobConfig {
    pub backend: BlobBackend,
    pub root: PathBuf,
    /// URL prefix for locally stored files; plain file paths when unset.
    pub public_base: Option<String>,
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub bucket: String,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            backend: BlobBackend::Local,
            root: PathBuf::from(".menutray/images"),
            public_base: None,
            url: None,
            api_key: None,
            bucket: "menu-images".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub api_key: Option<String>,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: REMOVE_BG_URL.to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PresetConfig {
    pub asset_root: String,
}

impl Default for PresetConfig {
    fn default() -> Self {
        Self {
            asset_root: DEFAULT_ASSET_ROOT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub max_edge: u32,
    pub key_prefix: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_edge: 800,
            key_prefix: "uploads".to_string(),
        }
    }
}

/* ---------- 2.  LOADING ---------- */

impl Config {
    /// Defaults, then `path` if given, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&raw)?)
    }

    /// Overlay credentials from `lookup`. Blank values count as unset and
    /// leave the file value alone.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let set = |slot: &mut Option<String>, name: &str| {
            if let Some(value) = var(name) {
                *slot = Some(value);
            }
        };

        set(&mut self.neis.api_key, "NEIS_API_KEY");
        set(&mut self.search.naver_client_id, "NAVER_CLIENT_ID");
        set(&mut self.search.naver_client_secret, "NAVER_CLIENT_SECRET");
        set(&mut self.search.pixabay_api_key, "PIXABAY_API_KEY");
        set(&mut self.generation.api_key, "OPENAI_API_KEY");
        set(&mut self.store.url, "SUPABASE_URL");
        set(&mut self.store.api_key, "SUPABASE_ANON_KEY");
        set(&mut self.blob.url, "SUPABASE_URL");
        set(&mut self.blob.api_key, "SUPABASE_ANON_KEY");
        set(&mut self.background.api_key, "REMOVE_BG_API_KEY");

        // a blank key in the file is also "not configured"
        for slot in [
            &mut self.neis.api_key,
            &mut self.search.naver_client_id,
            &mut self.search.naver_client_secret,
            &mut self.search.pixabay_api_key,
            &mut self.generation.api_key,
            &mut self.store.url,
            &mut self.store.api_key,
            &mut self.blob.url,
            &mut self.blob.api_key,
            &mut self.background.api_key,
        ] {
            if slot.as_deref().is_some_and(|v| v.trim().is_empty()) {
                *slot = None;
            }
        }
    }

    /// Whether search candidates go through background removal. Off unless
    /// `background.enabled` is set and a key is configured.
    pub fn strips_backgrounds(&self) -> bool {
        self.background.enabled && self.background.api_key.is_some()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks: [(&str, bool); 6] = [
            ("http.timeout_secs", self.http.timeout_secs > 0),
            ("neis.school_page_size", self.neis.school_page_size > 0),
            ("neis.meal_page_size", self.neis.meal_page_size > 0),
            ("search.limit", self.search.limit > 0),
            ("upload.max_edge", self.upload.max_edge > 0),
            ("store.table", !self.store.table.trim().is_empty()),
        ];
        match checks.iter().find(|(_, ok)| !ok) {
            Some((field, _)) => Err(ConfigError::Invalid(format!("{field} must not be zero or empty"))),
            None => Ok(()),
        }
    }
}
