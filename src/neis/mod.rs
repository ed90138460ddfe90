//! NEIS open-data client: school directory and daily meal lists.

pub mod client;
pub mod types;

pub use client::{split_dishes, NeisClient, NEIS_BASE_URL};
pub use types::School;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NeisError {
    #[error("NEIS_API_KEY is not configured")]
    MissingApiKey,
    #[error("NEIS request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("NEIS returned HTTP {0}")]
    Status(u16),
    #[error("Unexpected NEIS payload: {0}")]
    Decode(String),
}
