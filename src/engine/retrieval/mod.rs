//! Image retrieval tiers: bundled presets, the shared cache, external search
//! and external generation.

pub mod query;
pub mod sources;

pub use query::SearchQuery;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("{0} credentials not configured")]
    MissingCredentials(&'static str),
    #[error("Search query is empty")]
    EmptyQuery,
    #[error("Provider request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("{provider} returned HTTP {status}: {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },
    #[error("{0} returned no image")]
    EmptyResponse(&'static str),
}

impl RetrievalError {
    /// Configuration problems, as opposed to a provider simply finding nothing
    /// or failing.
    pub fn is_configuration(&self) -> bool {
        matches!(self, RetrievalError::MissingCredentials(_))
    }
}

pub type RetrievalResult<T> = Result<T, RetrievalError>;
