//! One module per tier source.

pub mod cache;
pub mod generate;
pub mod preset;
pub mod web;

pub use cache::CacheSource;
pub use generate::{ImageGenerator, OpenAiImageGenerator, OPENAI_BASE_URL};
pub use preset::{PresetSource, DEFAULT_ASSET_ROOT};
pub use web::{ImageSearch, NaverImageSearch, PixabayImageSearch, NAVER_BASE_URL, PIXABAY_BASE_URL};

use super::RetrievalError;
use reqwest::Response;

/// Turn a non-2xx response into [`RetrievalError::Status`].
pub(crate) async fn check_status(
    provider: &'static str,
    response: Response,
) -> Result<Response, RetrievalError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(RetrievalError::Status {
        provider,
        status: status.as_u16(),
        body,
    })
}
