//! Public façade for the engine layer.

pub mod resolver;
pub mod retrieval;
pub mod types;

pub use resolver::{ResolveError, Resolver, UploadSettings};
pub use types::{ImageReference, MenuItemRecord, Tier};

#[cfg(test)]
mod tests;
