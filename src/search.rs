// ABOUTME: Image search for the slidecraft application
// ABOUTME: Finds illustrative images for slides that lack them via a search API

use crate::errors::{DeckError, Result};
use crate::model::{ContentMap, Slide};
use crate::resources::{AssetResolver, ImagePayload};
use log::{debug, info, warn};
use parking_lot::Mutex;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

const GOOGLE_SEARCH_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";
const IMAGES_PER_GALLERY: usize = 3;
const FALLBACK_QUERY: &str = "presentation";

/// Looks up an image URL for a free-text query.
pub trait ImageSearch: Send + Sync {
    fn search(&self, query: &str) -> Option<String>;
}

/// Credentials and limits for the Custom Search API.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub api_key: String,
    pub cx: String,
    pub timeout_ms: u64,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    link: String,
}

/// Google Custom Search image lookup. Results, including misses, are cached for
/// the life of the searcher.
pub struct GoogleImageSearch {
    client: Client,
    config: SearchConfig,
    cache: Mutex<HashMap<String, Option<String>>>,
}

impl GoogleImageSearch {
    pub fn new(config: SearchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(DeckError::FetchError)?;
        Ok(Self {
            client,
            config,
            cache: Mutex::new(HashMap::new()),
        })
    }

    fn request_url(&self, query: &str) -> Result<Url> {
        Url::parse_with_params(
            GOOGLE_SEARCH_ENDPOINT,
            &[
                ("key", self.config.api_key.as_str()),
                ("cx", self.config.cx.as_str()),
                ("searchType", "image"),
                ("num", "1"),
                ("q", query),
            ],
        )
        .map_err(|e| DeckError::ConfigError(format!("Invalid search URL: {}", e)))
    }

    fn lookup(&self, query: &str) -> Result<Option<String>> {
        let response = self.client.get(self.request_url(query)?).send()?;
        if !response.status().is_success() {
            return Err(DeckError::ValidationError(format!(
                "Image search failed: {}",
                response.status()
            )));
        }
        let body: SearchResponse = response.json()?;
        Ok(body.items.into_iter().next().map(|item| item.link))
    }
}

impl ImageSearch for GoogleImageSearch {
    fn search(&self, query: &str) -> Option<String> {
        if query.is_empty() {
            return None;
        }
        if let Some(hit) = self.cache.lock().get(query) {
            debug!("Search cache hit: {}", query);
            return hit.clone();
        }

        match self.lookup(query) {
            Ok(found) => {
                self.cache.lock().insert(query.to_string(), found.clone());
                found
            }
            Err(e) => {
                warn!("Image search for '{}' failed: {}", query, e);
                None
            }
        }
    }
}

/// Fill in missing images on gallery, image and conclusion slides.
pub fn enrich_images(content_map: &mut ContentMap, search: &dyn ImageSearch) {
    let topic = content_map.topic().map(str::to_string);

    for slide in &mut content_map.slides {
        match slide {
            Slide::ThreeImagesWithDescription(fields) => {
                let have = fields.images.as_ref().map(Vec::len).unwrap_or(0);
                if have >= IMAGES_PER_GALLERY {
                    continue;
                }
                let base = fields
                    .title
                    .clone()
                    .filter(|t| !t.is_empty())
                    .or_else(|| topic.clone())
                    .unwrap_or_default();
                let found: Vec<String> = (1..=IMAGES_PER_GALLERY)
                    .filter_map(|i| search.search(format!("{} {}", base, i).trim()))
                    .collect();
                info!("Found {} gallery images for '{}'", found.len(), base);
                fields.images = Some(found);
            }
            Slide::Image(fields) | Slide::Conclusion(fields) => {
                if fields.image_url.as_deref().is_some_and(|u| !u.is_empty()) {
                    continue;
                }
                let query = fields
                    .title
                    .clone()
                    .filter(|t| !t.is_empty())
                    .or_else(|| topic.clone())
                    .unwrap_or_else(|| FALLBACK_QUERY.to_string());
                if let Some(url) = search.search(&query) {
                    fields.image_url = Some(url);
                }
            }
            _ => {}
        }
    }
}

/// Turns a search query straight into an embeddable image.
pub struct ImageProvider<'a> {
    search: &'a dyn ImageSearch,
    resolver: &'a AssetResolver,
}

impl<'a> ImageProvider<'a> {
    pub fn new(search: &'a dyn ImageSearch, resolver: &'a AssetResolver) -> Self {
        Self { search, resolver }
    }

    /// Search, then resolve. Any failure yields the placeholder image.
    pub fn provide(&self, query: &str) -> ImagePayload {
        match self.search.search(query) {
            Some(url) => self.resolver.resolve(&url),
            None => {
                warn!("No image found for '{}', using placeholder", query);
                ImagePayload::placeholder()
            }
        }
    }
}
