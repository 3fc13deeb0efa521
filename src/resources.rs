// ABOUTME: Image asset resolution for the slidecraft application
// ABOUTME: Turns inline, remote, or local image references into embeddable payloads

use crate::errors::{DeckError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::{debug, info, warn};
use parking_lot::Mutex;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::thread;
use std::time::Duration;
use url::Url;

/// 1x1 transparent PNG substituted for any image that cannot be resolved.
pub const PLACEHOLDER_PNG: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mP8/x8AAwMCAO8X1hQAAAAASUVORK5CYII=";

const DEFAULT_MIME: &str = "image/png";

/// An image ready to embed: its MIME type and raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ImagePayload {
    pub fn new(mime: &str, bytes: Vec<u8>) -> Self {
        Self {
            mime: mime.to_string(),
            bytes,
        }
    }

    pub fn placeholder() -> Self {
        Self::new(DEFAULT_MIME, STANDARD.decode(PLACEHOLDER_PNG).unwrap_or_default())
    }

    pub fn is_placeholder(&self) -> bool {
        *self == Self::placeholder()
    }

    /// Decode a `data:<mime>;base64,<payload>` URI.
    pub fn from_data_uri(uri: &str) -> Result<Self> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| DeckError::InvalidResourcePath("not a data URI".to_string()))?;
        let (header, payload) = rest.split_once(',').ok_or_else(|| {
            DeckError::InvalidResourcePath("data URI has no payload".to_string())
        })?;

        let mut params = header.split(';');
        let mime = params
            .next()
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_MIME);
        if !params.any(|p| p.eq_ignore_ascii_case("base64")) {
            return Err(DeckError::InvalidResourcePath(
                "only base64 data URIs are supported".to_string(),
            ));
        }

        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| DeckError::InvalidResourcePath(format!("bad base64 payload: {}", e)))?;
        Ok(Self::new(mime, bytes))
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }

    /// File extension used when the payload is stored in the package.
    pub fn extension(&self) -> &'static str {
        match self.mime.as_str() {
            "image/jpeg" | "image/jpg" => "jpeg",
            "image/gif" => "gif",
            "image/bmp" => "bmp",
            "image/tiff" => "tiff",
            "image/webp" => "webp",
            "image/svg+xml" => "svg",
            _ => "png",
        }
    }
}

/// How an image reference will be resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageReference<'a> {
    Inline(&'a str),
    Remote(Url),
    Local(&'a Path),
}

impl<'a> ImageReference<'a> {
    pub fn classify(reference: &'a str) -> Self {
        let trimmed = reference.trim();
        if trimmed.starts_with("data:") {
            return ImageReference::Inline(trimmed);
        }
        match Url::parse(trimmed) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {
                ImageReference::Remote(url)
            }
            _ => ImageReference::Local(Path::new(trimmed)),
        }
    }
}

/// Raw result of fetching a remote image.
#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Fetches remote image bytes. Injected so the network can be replaced in tests.
pub trait ImageFetcher: Send + Sync {
    fn fetch(&self, url: &Url) -> Result<FetchedImage>;
}

/// Configuration for asset resolution
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub timeout_ms: u64,
    pub attempts: u32,
    pub cache: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10000, // 10 seconds
            attempts: 2,
            cache: true,
        }
    }
}

/// Blocking HTTP fetcher with a request timeout and retry.
pub struct HttpFetcher {
    client: Client,
    attempts: u32,
}

impl HttpFetcher {
    pub fn new(config: &ResolverConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(DeckError::FetchError)?;
        Ok(Self {
            client,
            attempts: config.attempts.max(1),
        })
    }
}

impl ImageFetcher for HttpFetcher {
    fn fetch(&self, url: &Url) -> Result<FetchedImage> {
        info!("Fetching remote image: {}", url);

        let mut retry_delay = 250; // milliseconds, doubled after each failure
        let mut last_error = None;

        for attempt in 1..=self.attempts {
            match self.client.get(url.clone()).send() {
                Ok(response) if response.status().is_success() => {
                    let content_type = response
                        .headers()
                        .get(CONTENT_TYPE)
                        .and_then(|v| v.to_str().ok())
                        .map(String::from);
                    let bytes = response.bytes().map_err(DeckError::FetchError)?;
                    return Ok(FetchedImage {
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
                Ok(response) => {
                    last_error = Some(DeckError::ValidationError(format!(
                        "HTTP error: {}",
                        response.status()
                    )));
                }
                Err(e) => {
                    last_error = Some(DeckError::FetchError(e));
                }
            }

            if attempt < self.attempts {
                info!(
                    "Fetch attempt {} failed, retrying in {} ms",
                    attempt, retry_delay
                );
                thread::sleep(Duration::from_millis(retry_delay));
                retry_delay *= 2;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            DeckError::ValidationError("Unknown error fetching image".to_string())
        }))
    }
}

/// Resolves image references into payloads. Never fails: anything that cannot be
/// resolved becomes the placeholder image.
pub struct AssetResolver {
    fetcher: Box<dyn ImageFetcher>,
    cache: Option<Mutex<HashMap<String, ImagePayload>>>,
}

impl AssetResolver {
    pub fn new(fetcher: Box<dyn ImageFetcher>) -> Self {
        Self {
            fetcher,
            cache: None,
        }
    }

    /// Remember resolved remote and local images for the life of this resolver.
    pub fn with_cache(mut self) -> Self {
        self.cache = Some(Mutex::new(HashMap::new()));
        self
    }

    /// Build a resolver backed by the HTTP fetcher.
    pub fn from_config(config: &ResolverConfig) -> Result<Self> {
        let resolver = Self::new(Box::new(HttpFetcher::new(config)?));
        Ok(if config.cache {
            resolver.with_cache()
        } else {
            resolver
        })
    }

    /// Resolve one reference, substituting the placeholder on any failure.
    pub fn resolve(&self, reference: &str) -> ImagePayload {
        match self.try_resolve(reference) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(
                    "Using placeholder for image '{}': {}",
                    abbreviate(reference),
                    e
                );
                ImagePayload::placeholder()
            }
        }
    }

    /// Resolve several references concurrently. Output order matches input order.
    pub fn resolve_all(&self, references: &[&str]) -> Vec<ImagePayload> {
        if references.len() < 2 {
            return references.iter().map(|r| self.resolve(r)).collect();
        }

        thread::scope(|scope| {
            let handles: Vec<_> = references
                .iter()
                .map(|reference| scope.spawn(move || self.resolve(reference)))
                .collect();

            handles
                .into_iter()
                .map(|handle| {
                    handle.join().unwrap_or_else(|_| {
                        warn!("Image resolution thread panicked, using placeholder");
                        ImagePayload::placeholder()
                    })
                })
                .collect()
        })
    }

    /// Resolve one reference, reporting failures to the caller.
    pub fn try_resolve(&self, reference: &str) -> Result<ImagePayload> {
        if reference.trim().is_empty() {
            return Err(DeckError::InvalidResourcePath(
                "empty image reference".to_string(),
            ));
        }

        let source = ImageReference::classify(reference);
        if let ImageReference::Inline(uri) = &source {
            return ImagePayload::from_data_uri(uri);
        }

        if let Some(cached) = self.cached(reference) {
            debug!("Image cache hit: {}", abbreviate(reference));
            return Ok(cached);
        }

        let payload = match source {
            ImageReference::Remote(url) => {
                let fetched = self.fetcher.fetch(&url)?;
                let mime = declared_image_mime(fetched.content_type.as_deref())
                    .or_else(|| sniff_mime(&fetched.bytes))
                    .unwrap_or(DEFAULT_MIME);
                ImagePayload::new(mime, fetched.bytes)
            }
            ImageReference::Local(path) => read_local_image(path)?,
            ImageReference::Inline(uri) => ImagePayload::from_data_uri(uri)?,
        };

        if let Some(cache) = &self.cache {
            cache.lock().insert(reference.to_string(), payload.clone());
        }
        Ok(payload)
    }

    fn cached(&self, reference: &str) -> Option<ImagePayload> {
        self.cache
            .as_ref()
            .and_then(|cache| cache.lock().get(reference).cloned())
    }
}

fn read_local_image(path: &Path) -> Result<ImagePayload> {
    info!("Reading local image: {:?}", path);
    if !path.is_file() {
        return Err(DeckError::PathNotFoundError(path.to_path_buf()));
    }
    let bytes = fs::read(path).map_err(DeckError::FileReadError)?;
    let mime = sniff_mime(&bytes).unwrap_or(DEFAULT_MIME);
    Ok(ImagePayload::new(mime, bytes))
}

/// The declared content type when it names an image, without parameters.
fn declared_image_mime(content_type: Option<&str>) -> Option<&str> {
    content_type
        .and_then(|ct| ct.split(';').next())
        .map(str::trim)
        .filter(|ct| ct.starts_with("image/"))
}

fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    use image::ImageFormat;

    match image::guess_format(bytes).ok()? {
        ImageFormat::Png => Some("image/png"),
        ImageFormat::Jpeg => Some("image/jpeg"),
        ImageFormat::Gif => Some("image/gif"),
        ImageFormat::Bmp => Some("image/bmp"),
        ImageFormat::Tiff => Some("image/tiff"),
        ImageFormat::WebP => Some("image/webp"),
        _ => None,
    }
}

/// Keep log lines short when a reference is a long inline payload.
fn abbreviate(reference: &str) -> String {
    if reference.len() > 80 {
        let cut = (0..=80)
            .rev()
            .find(|i| reference.is_char_boundary(*i))
            .unwrap_or(0);
        format!("{}...", &reference[..cut])
    } else {
        reference.to_string()
    }
}
