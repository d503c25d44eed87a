/// Image catalog and category filtering
///
/// The catalog keeps every record in server order and derives the visible
/// subset for the active category. The visible list is an index list into
/// the records, so it is always a stable ordered subsequence.

use std::fmt;
use std::str::FromStr;

use super::data::{FilenameMeta, ImageRecord};
use crate::error::GalleryError;

/// Filter key: "all" or "<size>-<style>"
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Category {
    #[default]
    All,
    Sized { size: String, style: String },
}

impl Category {
    pub fn sized(size: impl Into<String>, style: impl Into<String>) -> Self {
        Category::Sized {
            size: size.into(),
            style: style.into(),
        }
    }

    /// Whether a record belongs to this category
    pub fn matches(&self, record: &ImageRecord) -> bool {
        match self {
            Category::All => true,
            Category::Sized { size, style } => match record.meta() {
                FilenameMeta::Parsed {
                    size: record_size,
                    style: record_style,
                } => record_size == *size && record_style == *style,
                FilenameMeta::Unparseable => false,
            },
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::All => write!(f, "all"),
            Category::Sized { size, style } => write!(f, "{}-{}", size, style),
        }
    }
}

impl FromStr for Category {
    type Err = GalleryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(Category::All);
        }

        match s.split_once('-') {
            Some((size, style)) if !size.is_empty() && !style.is_empty() => {
                Ok(Category::sized(size, style))
            }
            _ => Err(GalleryError::InvalidCategory(s.to_string())),
        }
    }
}

/// The full ordered list of image records plus the active filter
#[derive(Debug, Clone, Default)]
pub struct ImageCatalog {
    records: Vec<ImageRecord>,
    active: Category,
    /// Indices into `records` that pass the active filter, in catalog order
    visible: Vec<usize>,
}

impl ImageCatalog {
    pub fn new(records: Vec<ImageRecord>) -> Self {
        let mut catalog = Self {
            records,
            active: Category::All,
            visible: Vec::new(),
        };
        catalog.refilter();
        catalog
    }

    pub fn records(&self) -> &[ImageRecord] {
        &self.records
    }

    pub fn active_category(&self) -> &Category {
        &self.active
    }

    /// Switch the filter. Returns false when `category` is already active.
    pub fn set_category(&mut self, category: Category) -> bool {
        if self.active == category {
            return false;
        }
        self.active = category;
        self.refilter();
        true
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// Record at position `index` of the visible list
    pub fn visible(&self, index: usize) -> Option<&ImageRecord> {
        self.visible.get(index).map(|&i| &self.records[i])
    }

    pub fn visible_records(&self) -> impl Iterator<Item = &ImageRecord> + '_ {
        self.visible.iter().map(move |&i| &self.records[i])
    }

    fn refilter(&mut self) {
        let active = &self.active;
        self.visible = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, record)| active.matches(record))
            .map(|(i, _)| i)
            .collect();
    }
}
