//! PostgREST (Supabase) cache backend.
//!
//! `record` is check-then-write: look the pair up, then PATCH the counter or
//! POST a new row. Nothing spans the two round trips, so two writers racing on
//! the same pair can both insert.

use super::{CacheRecord, CacheStore, NewCacheEntry, StoreError};
use crate::engine::types::Tier;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use tracing::{debug, instrument};
use url::Url;

pub const DEFAULT_TABLE: &str = "tool3_menu_images";

pub struct RestStore {
    client: Client,
    base_url: Option<String>,
    api_key: Option<String>,
    table: String,
}

#[derive(Serialize)]
struct InsertRow<'a> {
    refined_name: &'a str,
    original_name: &'a str,
    image_url: &'a str,
    source: Tier,
    usage_count: u32,
}

#[derive(Serialize)]
struct BumpRow {
    usage_count: u32,
    source: Tier,
    updated_at: chrono::DateTime<Utc>,
}

impl RestStore {
    pub fn new(
        client: Client,
        base_url: Option<String>,
        api_key: Option<String>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url,
            api_key,
            table: table.into(),
        }
    }

    fn endpoint(&self) -> Result<(Url, &str), StoreError> {
        let (base, key) = match (self.base_url.as_deref(), self.api_key.as_deref()) {
            (Some(base), Some(key)) => (base, key),
            _ => return Err(StoreError::MissingCredentials),
        };
        let url = Url::parse(&format!(
            "{}/rest/v1/{}",
            base.trim_end_matches('/'),
            self.table
        ))?;
        Ok((url, key))
    }

    fn authorize(builder: RequestBuilder, key: &str) -> RequestBuilder {
        builder
            .header("apikey", key)
            .header("Authorization", format!("Bearer {key}"))
    }

    async fn rows(response: Response) -> Result<Vec<CacheRecord>, StoreError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn find_pair(
        &self,
        refined_name: &str,
        image_url: &str,
    ) -> Result<Option<CacheRecord>, StoreError> {
        let (url, key) = self.endpoint()?;
        let request = self.client.get(url).query(&[
            ("select", "*".to_string()),
            ("refined_name", format!("eq.{refined_name}")),
            ("image_url", format!("eq.{image_url}")),
            ("limit", "1".to_string()),
        ]);
        let rows = Self::rows(Self::authorize(request, key).send().await?).await?;
        Ok(rows.into_iter().next())
    }
}

#[async_trait]
impl CacheStore for RestStore {
    fn name(&self) -> &'static str {
        "rest"
    }

    #[instrument(skip(self))]
    async fn lookup(&self, refined_name: &str) -> Result<Option<CacheRecord>, StoreError> {
        let (url, key) = self.endpoint()?;
        let request = self.client.get(url).query(&[
            ("select", "*".to_string()),
            ("refined_name", format!("eq.{refined_name}")),
            ("order", "usage_count.desc,updated_at.desc".to_string()),
            ("limit", "1".to_string()),
        ]);
        let rows = Self::rows(Self::authorize(request, key).send().await?).await?;
        Ok(rows.into_iter().next())
    }

    #[instrument(skip(self, entry), fields(name = %entry.refined_name))]
    async fn record(&self, entry: NewCacheEntry) -> Result<CacheRecord, StoreError> {
        let existing = self.find_pair(&entry.refined_name, &entry.image_url).await?;
        let (url, key) = self.endpoint()?;

        let request = match existing {
            Some(row) => {
                debug!(id = %row.id, usage = row.usage_count, "bumping cached image");
                self.client
                    .patch(url)
                    .query(&[("id", format!("eq.{}", row.id))])
                    .json(&BumpRow {
                        usage_count: row.usage_count.saturating_add(1),
                        source: entry.source,
                        updated_at: Utc::now(),
                    })
            }
            None => {
                debug!("inserting cached image");
                self.client.post(url).json(&InsertRow {
                    refined_name: &entry.refined_name,
                    original_name: &entry.original_name,
                    image_url: &entry.image_url,
                    source: entry.source,
                    usage_count: 1,
                })
            }
        };

        let request = Self::authorize(request, key).header("Prefer", "return=representation");
        let rows = Self::rows(request.send().await?).await?;
        rows.into_iter().next().ok_or(StoreError::Status {
            status: 200,
            body: "empty representation".to_string(),
        })
    }
}
