//! Image handling before storage: downsizing uploads and stripping
//! backgrounds from search results.

pub mod background;
pub mod compress;

pub use background::{BackgroundRemover, RemoveBgClient};
pub use compress::{prepare_upload, PreparedImage};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Background removal credentials not configured")]
    MissingCredentials,
    #[error("Could not decode image: {0}")]
    Decode(#[source] image::ImageError),
    #[error("Could not encode image: {0}")]
    Encode(#[source] image::ImageError),
    #[error("Background removal request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Background removal returned HTTP {0}")]
    Status(u16),
    #[error("Background removal returned no image data")]
    EmptyImage,
}
