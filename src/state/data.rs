/// Shared data structures for the gallery state
///
/// These structs represent the data model that flows between
/// the network layer and the gallery core.

use serde::Deserialize;

/// Represents a single image as listed by the `/images` endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImageRecord {
    /// URL of the small preview shown in the grid
    pub thumbnail: String,
    /// URL of the full-resolution image shown in the modal
    pub original: String,
}

/// Metadata encoded in the file name of `original`, e.g. `S-Crafts-012.jpg`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilenameMeta {
    Parsed { size: String, style: String },
    /// The name lacks a size or style token; such images only show under "all"
    Unparseable,
}

impl ImageRecord {
    pub fn new(thumbnail: impl Into<String>, original: impl Into<String>) -> Self {
        Self {
            thumbnail: thumbnail.into(),
            original: original.into(),
        }
    }

    /// Last path segment of the original URL, percent-decoded
    pub fn file_name(&self) -> String {
        file_name_of(&self.original)
    }

    /// Parse `<size>-<style>-...` from the original's file name
    pub fn meta(&self) -> FilenameMeta {
        parse_filename_meta(&self.original)
    }
}

/// Extract the last path segment of a URL, without query or fragment
pub fn file_name_of(url: &str) -> String {
    let path = url
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    let segment = path.rsplit('/').next().unwrap_or_default();

    match urlencoding::decode(segment) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => segment.to_string(),
    }
}

/// Best-effort parse of the size and style tokens from a file name.
///
/// Returns `Unparseable` instead of guessing so callers decide whether
/// the image still belongs in a listing.
pub fn parse_filename_meta(url: &str) -> FilenameMeta {
    let name = file_name_of(url);
    let mut tokens = name.split('-');

    match (tokens.next(), tokens.next()) {
        (Some(size), Some(style)) if !size.is_empty() && !style.is_empty() => {
            FilenameMeta::Parsed {
                size: size.to_string(),
                style: style.to_string(),
            }
        }
        _ => FilenameMeta::Unparseable,
    }
}
