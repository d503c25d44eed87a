/// Error taxonomy for the gallery
///
/// Every failure is terminal for the unit of work it belongs to and isolated
/// from its siblings. Only `Config` aborts initialization; everything else is
/// recovered locally by the caller.

use thiserror::Error;

/// Errors carried through the gallery state and iced messages.
///
/// `Clone` is required because outcomes travel inside `Message`, so
/// transport errors are flattened to strings at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GalleryError {
    /// The `/config` endpoint failed or returned garbage
    #[error("failed to load config: {0}")]
    Config(String),

    /// The `/images` endpoint failed or returned a non-array body
    #[error("Failed to load images: {0}")]
    Catalog(String),

    /// A single thumbnail could not be fetched or decoded
    #[error("failed to load thumbnail {url}: {reason}")]
    Thumbnail { url: String, reason: String },

    /// The full-resolution image shown in the modal could not be loaded
    #[error("failed to load image {url}: {reason}")]
    FullImage { url: String, reason: String },

    /// The request was superseded before it completed
    #[error("request cancelled")]
    Cancelled,

    /// A category key that is neither "all" nor "<size>-<style>"
    #[error("invalid category: {0:?}")]
    InvalidCategory(String),

    /// Local settings could not be read or written
    #[error("settings error: {0}")]
    Settings(String),
}

impl GalleryError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, GalleryError::Cancelled)
    }
}
