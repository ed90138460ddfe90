//! Tier 3: external image search. Candidates go back to the user for a
//! manual pick; nothing here applies an image.

use super::super::{RetrievalError, SearchQuery};
use super::check_status;
use crate::preprocessing::search_keywords;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

pub const NAVER_BASE_URL: &str = "https://openapi.naver.com";
pub const PIXABAY_BASE_URL: &str = "https://pixabay.com";

#[async_trait]
pub trait ImageSearch: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &'static str;

    /// Ranked candidate image URLs. No hits is `Ok(vec![])`.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<String>, RetrievalError>;
}

/* ---------- Naver ---------- */

/// Naver image search. It handles Korean dish names well, so the query is
/// only biased towards food photos.
pub struct NaverImageSearch {
    client: Client,
    base_url: String,
    client_id: Option<String>,
    client_secret: Option<String>,
    suffix: String,
}

#[derive(Deserialize)]
struct NaverResponse {
    #[serde(default)]
    items: Vec<NaverItem>,
}

#[derive(Deserialize)]
struct NaverItem {
    link: String,
}

impl NaverImageSearch {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        client_id: Option<String>,
        client_secret: Option<String>,
        suffix: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            client_id,
            client_secret,
            suffix: suffix.into(),
        }
    }
}

#[async_trait]
impl ImageSearch for NaverImageSearch {
    fn name(&self) -> &'static str {
        "naver"
    }

    #[instrument(skip(self, query), fields(q = %query.text))]
    async fn search(&self, query: &SearchQuery) -> Result<Vec<String>, RetrievalError> {
        if query.is_blank() {
            return Err(RetrievalError::EmptyQuery);
        }
        let (id, secret) = match (self.client_id.as_deref(), self.client_secret.as_deref()) {
            (Some(id), Some(secret)) => (id, secret),
            _ => return Err(RetrievalError::MissingCredentials(self.name())),
        };

        let final_query = format!("{} {}", query.text, self.suffix).trim().to_string();
        debug!(final_query = %final_query, "naver image search");

        // Naver accepts 1..=100 results per request.
        let display = query.limit.clamp(1, 100).to_string();
        let response = self
            .client
            .get(format!("{}/v1/search/image", self.base_url.trim_end_matches('/')))
            .header("X-Naver-Client-Id", id)
            .header("X-Naver-Client-Secret", secret)
            .query(&[
                ("query", final_query.as_str()),
                ("display", display.as_str()),
                ("sort", "sim"),
                ("filter", "medium"),
            ])
            .send()
            .await?;

        let body: NaverResponse = check_status(self.name(), response).await?.json().await?;
        Ok(body.items.into_iter().map(|item| item.link).collect())
    }
}

/* ---------- Pixabay ---------- */

/// Pixabay indexes English tags: the dish name is mapped to English keywords
/// and biased towards single-subject catalog shots.
pub struct PixabayImageSearch {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    suffix: String,
}

#[derive(Deserialize)]
struct PixabayResponse {
    #[serde(default)]
    hits: Vec<PixabayHit>,
}

#[derive(Deserialize)]
struct PixabayHit {
    #[serde(rename = "webformatURL")]
    webformat_url: String,
}

impl PixabayImageSearch {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        api_key: Option<String>,
        suffix: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key,
            suffix: suffix.into(),
        }
    }
}

#[async_trait]
impl ImageSearch for PixabayImageSearch {
    fn name(&self) -> &'static str {
        "pixabay"
    }

    #[instrument(skip(self, query), fields(q = %query.text))]
    async fn search(&self, query: &SearchQuery) -> Result<Vec<String>, RetrievalError> {
        if query.is_blank() {
            return Err(RetrievalError::EmptyQuery);
        }
        let key = self
            .api_key
            .as_deref()
            .ok_or(RetrievalError::MissingCredentials(self.name()))?;

        let keywords = format!("{} {}", search_keywords(&query.text), self.suffix)
            .trim()
            .to_string();
        debug!(keywords = %keywords, "pixabay image search");

        // Pixabay accepts 3..=200 results per page.
        let per_page = query.limit.clamp(3, 200).to_string();
        let response = self
            .client
            .get(format!("{}/api/", self.base_url.trim_end_matches('/')))
            .query(&[
                ("key", key),
                ("q", keywords.as_str()),
                ("image_type", "photo"),
                ("safesearch", "true"),
                ("per_page", per_page.as_str()),
            ])
            .send()
            .await?;

        let body: PixabayResponse = check_status(self.name(), response).await?.json().await?;
        Ok(body
            .hits
            .into_iter()
            .take(query.limit)
            .map(|hit| hit.webformat_url)
            .collect())
    }
}
