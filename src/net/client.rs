/// HTTP access to the gallery server
///
/// Endpoints:
/// - `GET /config` → `{ "IMAGE_BASE_URL": "..." }`
/// - `GET /images` → `[{ "thumbnail": "...", "original": "..." }, ...]`
/// - image URLs from the catalog, resolved against `IMAGE_BASE_URL`

use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info};

use super::decode::{decode_image, FetchedImage};
use super::source::ImageSource;
use crate::error::GalleryError;
use crate::state::data::ImageRecord;

/// Shown when a failed `/images` response carries no `details`
pub const DEFAULT_CATALOG_FAILURE: &str = "Failed to load images";

/// Body of `GET /config`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteConfig {
    #[serde(rename = "IMAGE_BASE_URL")]
    pub image_base_url: String,
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    server: Url,
    image_base: Option<Url>,
}

impl HttpClient {
    pub fn new(server: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            server: with_trailing_slash(server),
            image_base: None,
        }
    }

    /// Resolve relative image URLs against `base` from now on
    pub fn with_image_base(mut self, base: &str) -> Result<Self, GalleryError> {
        let base = Url::parse(base)
            .map_err(|e| GalleryError::Config(format!("invalid IMAGE_BASE_URL {:?}: {}", base, e)))?;
        self.image_base = Some(with_trailing_slash(base));
        Ok(self)
    }

    pub async fn fetch_config(self) -> Result<RemoteConfig, GalleryError> {
        let url = self.endpoint("config").map_err(GalleryError::Config)?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| GalleryError::Config(e.to_string()))?;

        let body = response
            .text()
            .await
            .map_err(|e| GalleryError::Config(e.to_string()))?;
        let config: RemoteConfig =
            serde_json::from_str(&body).map_err(|e| GalleryError::Config(e.to_string()))?;

        info!("🔧 Image base URL: {}", config.image_base_url);
        Ok(config)
    }

    pub async fn fetch_catalog(self) -> Result<Vec<ImageRecord>, GalleryError> {
        let url = self.endpoint("images").map_err(GalleryError::Catalog)?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| GalleryError::Catalog(e.to_string()))?;

        let ok = response.status().is_success();
        let body = response
            .text()
            .await
            .map_err(|e| GalleryError::Catalog(e.to_string()))?;

        let records = parse_catalog_response(ok, &body)?
            .into_iter()
            .map(|record| ImageRecord {
                thumbnail: self.resolve(&record.thumbnail),
                original: self.resolve(&record.original),
            })
            .collect::<Vec<_>>();

        info!("📥 Received {} image records", records.len());
        Ok(records)
    }

    fn endpoint(&self, name: &str) -> Result<Url, String> {
        self.server.join(name).map_err(|e| e.to_string())
    }

    fn resolve(&self, raw: &str) -> String {
        resolve_url(self.image_base.as_ref().unwrap_or(&self.server), raw)
    }

    fn fetch_decoded(
        &self,
        url: &str,
        to_error: fn(String, String) -> GalleryError,
    ) -> BoxFuture<'static, Result<FetchedImage, GalleryError>> {
        let http = self.http.clone();
        let url = url.to_string();

        async move {
            let bytes = fetch_bytes(&http, &url)
                .await
                .map_err(|reason| to_error(url.clone(), reason))?;
            decode_image(bytes).await.map_err(|reason| to_error(url, reason))
        }
        .boxed()
    }
}

impl ImageSource for HttpClient {
    type Image = FetchedImage;

    fn fetch_thumbnail(&self, url: &str) -> BoxFuture<'static, Result<FetchedImage, GalleryError>> {
        self.fetch_decoded(url, |url, reason| GalleryError::Thumbnail { url, reason })
    }

    fn fetch_full(&self, url: &str) -> BoxFuture<'static, Result<FetchedImage, GalleryError>> {
        self.fetch_decoded(url, |url, reason| GalleryError::FullImage { url, reason })
    }
}

async fn fetch_bytes(http: &reqwest::Client, url: &str) -> Result<Vec<u8>, String> {
    let response = http
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| e.to_string())?;
    let bytes = response.bytes().await.map_err(|e| e.to_string())?;
    Ok(bytes.to_vec())
}

/// Interpret the body of `GET /images`.
///
/// Failed responses surface the server's `details` message; a successful
/// response must be a JSON array of records.
pub fn parse_catalog_response(ok: bool, body: &str) -> Result<Vec<ImageRecord>, GalleryError> {
    if !ok {
        let details = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| v.get("details").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| DEFAULT_CATALOG_FAILURE.to_string());
        return Err(GalleryError::Catalog(details));
    }

    let value: Value = serde_json::from_str(body)
        .map_err(|e| GalleryError::Catalog(format!("malformed response: {}", e)))?;

    if !value.is_array() {
        error!("❌ Received non-array response: {}", value);
        return Err(GalleryError::Catalog("expected a list of images".to_string()));
    }

    serde_json::from_value(value)
        .map_err(|e| GalleryError::Catalog(format!("malformed image record: {}", e)))
}

/// Absolute URLs pass through; relative ones are joined onto `base`
pub fn resolve_url(base: &Url, raw: &str) -> String {
    if Url::parse(raw).is_ok() {
        return raw.to_string();
    }
    base.join(raw)
        .map(|url| url.to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
