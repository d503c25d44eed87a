/// Application configuration and persisted settings
///
/// Startup configuration comes from environment variables; the theme
/// preference is stored as JSON in the user's config directory:
/// - Linux: ~/.config/masonry-gallery/settings.json
/// - macOS: ~/Library/Application Support/masonry-gallery/settings.json
/// - Windows: %APPDATA%\masonry-gallery\settings.json

use std::fs;
use std::path::{Path, PathBuf};

use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::GalleryError;
use crate::state::router::CategoryMode;

pub const ENV_SERVER_URL: &str = "GALLERY_SERVER_URL";
pub const ENV_CATEGORY_MODE: &str = "GALLERY_CATEGORY_MODE";
pub const ENV_INITIAL_WIDTH: &str = "GALLERY_INITIAL_WIDTH";

const DEFAULT_SERVER_URL: &str = "http://localhost:3000/";
const DEFAULT_INITIAL_WIDTH: f32 = 1200.0;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server exposing `/config` and `/images`
    pub server_url: Url,
    /// Where the size and style buttons come from
    pub category_mode: CategoryMode,
    /// Viewport width assumed until the window reports its size
    pub initial_width: f32,
    pub settings_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            category_mode: CategoryMode::Fixed,
            initial_width: DEFAULT_INITIAL_WIDTH,
            settings_path: Settings::default_path(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, GalleryError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key/value lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, GalleryError> {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_SERVER_URL) {
            config.server_url = Url::parse(&raw)
                .map_err(|e| GalleryError::Config(format!("{}={:?}: {}", ENV_SERVER_URL, raw, e)))?;
        }

        if let Some(raw) = lookup(ENV_CATEGORY_MODE) {
            config.category_mode = match raw.trim().to_ascii_lowercase().as_str() {
                "fixed" => CategoryMode::Fixed,
                "discovered" => CategoryMode::Discovered,
                other => {
                    return Err(GalleryError::Config(format!(
                        "{} must be \"fixed\" or \"discovered\", got {:?}",
                        ENV_CATEGORY_MODE, other
                    )))
                }
            };
        }

        if let Some(raw) = lookup(ENV_INITIAL_WIDTH) {
            config.initial_width = raw
                .trim()
                .parse::<f32>()
                .ok()
                .filter(|w| w.is_finite() && *w > 0.0)
                .ok_or_else(|| {
                    GalleryError::Config(format!("{} must be a positive number", ENV_INITIAL_WIDTH))
                })?;
        }

        Ok(config)
    }
}

fn default_server_url() -> Url {
    Url::parse(DEFAULT_SERVER_URL).expect("default server URL is valid")
}

/// Light or dark theme, stored as `"light"` / `"dark"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeChoice {
    #[default]
    Light,
    Dark,
}

impl ThemeChoice {
    pub fn toggled(self) -> Self {
        match self {
            ThemeChoice::Light => ThemeChoice::Dark,
            ThemeChoice::Dark => ThemeChoice::Light,
        }
    }
}

/// User preferences that survive restarts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub theme: ThemeChoice,
}

impl Settings {
    /// Get the path where settings should be stored
    pub fn default_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir().or_else(dirs::home_dir)?;
        path.push("masonry-gallery");
        path.push("settings.json");
        Some(path)
    }

    /// Load settings; a missing or unreadable file yields the defaults
    pub fn load(path: &Path) -> Self {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(_) => return Self::default(),
        };

        serde_json::from_str(&json).unwrap_or_else(|e| {
            warn!("⚠️  Ignoring corrupt settings at {}: {}", path.display(), e);
            Self::default()
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), GalleryError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| GalleryError::Settings(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| GalleryError::Settings(e.to_string()))?;
        fs::write(path, json).map_err(|e| GalleryError::Settings(e.to_string()))
    }
}
