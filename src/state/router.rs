/// Category buttons and their selection state
///
/// Sizes and styles can come from a fixed list or be discovered from the
/// catalog. Both are offered as strategies; the integrator picks one through
/// `CategoryMode`.

use std::collections::HashSet;

use super::catalog::Category;
use super::data::{FilenameMeta, ImageRecord};

pub const DEFAULT_SIZES: [&str; 2] = ["S", "M"];
pub const DEFAULT_STYLES: [&str; 3] = ["Hand Painted", "Crafts", "Ornaments"];

/// Source of the size and style button labels
pub trait CategoryStrategy {
    fn sizes(&self, records: &[ImageRecord]) -> Vec<String>;
    fn styles(&self, records: &[ImageRecord], size: &str) -> Vec<String>;
}

/// Fixed labels, independent of the catalog contents
#[derive(Debug, Clone)]
pub struct FixedCategories {
    sizes: Vec<String>,
    styles: Vec<String>,
}

impl FixedCategories {
    pub fn new(sizes: Vec<String>, styles: Vec<String>) -> Self {
        Self { sizes, styles }
    }
}

impl Default for FixedCategories {
    fn default() -> Self {
        Self::new(
            DEFAULT_SIZES.iter().map(|s| s.to_string()).collect(),
            DEFAULT_STYLES.iter().map(|s| s.to_string()).collect(),
        )
    }
}

impl CategoryStrategy for FixedCategories {
    fn sizes(&self, _records: &[ImageRecord]) -> Vec<String> {
        self.sizes.clone()
    }

    fn styles(&self, _records: &[ImageRecord], _size: &str) -> Vec<String> {
        self.styles.clone()
    }
}

/// Labels discovered from file names, in first-seen order
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscoveredCategories;

impl CategoryStrategy for DiscoveredCategories {
    fn sizes(&self, records: &[ImageRecord]) -> Vec<String> {
        unique(records.iter().filter_map(|r| match r.meta() {
            FilenameMeta::Parsed { size, .. } => Some(size),
            FilenameMeta::Unparseable => None,
        }))
    }

    fn styles(&self, records: &[ImageRecord], size: &str) -> Vec<String> {
        unique(records.iter().filter_map(|r| match r.meta() {
            FilenameMeta::Parsed { size: s, style } if s == size => Some(style),
            _ => None,
        }))
    }
}

fn unique(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values.filter(|v| seen.insert(v.clone())).collect()
}

/// How category labels are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryMode {
    #[default]
    Fixed,
    Discovered,
}

impl CategoryMode {
    pub fn strategy(self) -> Box<dyn CategoryStrategy> {
        match self {
            CategoryMode::Fixed => Box::new(FixedCategories::default()),
            CategoryMode::Discovered => Box::new(DiscoveredCategories),
        }
    }
}

pub struct CategoryRouter {
    strategy: Box<dyn CategoryStrategy>,
    sizes: Vec<String>,
    selected_size: Option<String>,
    /// Style buttons currently revealed; empty while hidden
    styles: Vec<String>,
    selected_style: Option<String>,
}

impl CategoryRouter {
    pub fn new(strategy: Box<dyn CategoryStrategy>, records: &[ImageRecord]) -> Self {
        let sizes = strategy.sizes(records);
        Self {
            strategy,
            sizes,
            selected_size: None,
            styles: Vec::new(),
            selected_style: None,
        }
    }

    pub fn sizes(&self) -> &[String] {
        &self.sizes
    }

    pub fn styles(&self) -> &[String] {
        &self.styles
    }

    pub fn selected_size(&self) -> Option<&str> {
        self.selected_size.as_deref()
    }

    pub fn selected_style(&self) -> Option<&str> {
        self.selected_style.as_deref()
    }

    /// Reveal the style buttons for `size`. Does not change the filter.
    pub fn select_size(&mut self, size: &str, records: &[ImageRecord]) -> &[String] {
        self.styles = self.strategy.styles(records, size);
        self.selected_size = Some(size.to_string());
        self.selected_style = None;
        &self.styles
    }

    /// Compose `<size>-<style>` with the selected size
    pub fn select_style(&mut self, style: &str) -> Option<Category> {
        let size = self.selected_size.as_ref()?;
        if !self.styles.iter().any(|s| s == style) {
            return None;
        }
        self.selected_style = Some(style.to_string());
        Some(Category::sized(size.clone(), style))
    }

    /// Hide the style row and return the "all" category
    pub fn select_all(&mut self) -> Category {
        self.selected_size = None;
        self.selected_style = None;
        self.styles.clear();
        Category::All
    }
}
