// ABOUTME: Configuration module for the slidecraft application
// ABOUTME: Provides configuration settings and environment variable handling

use crate::outline::DEFAULT_OUTLINE_LIMIT;
use crate::resources::ResolverConfig;
use crate::search::SearchConfig;
use std::env;
use std::path::PathBuf;

/// Global configuration for the application
#[derive(Debug, Clone)]
pub struct Config {
    pub fetch_timeout_ms: u64,
    pub fetch_attempts: u32,
    pub image_cache: bool,
    pub templates_dir: PathBuf,
    pub output_dir: PathBuf,
    pub google_api_key: Option<String>,
    pub google_cx: Option<String>,
    pub outline_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fetch_timeout_ms: 10000, // 10 seconds
            fetch_attempts: 2,
            image_cache: true,
            templates_dir: PathBuf::from("templates"),
            output_dir: PathBuf::from("."),
            google_api_key: None,
            google_cx: None,
            outline_limit: DEFAULT_OUTLINE_LIMIT,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Create a new configuration instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let fetch_timeout_ms = non_empty_var("FETCH_TIMEOUT_MS")
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(defaults.fetch_timeout_ms);
        let fetch_attempts = non_empty_var("FETCH_ATTEMPTS")
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(defaults.fetch_attempts);
        let image_cache = non_empty_var("IMAGE_CACHE")
            .map(|s| s.to_lowercase() != "false")
            .unwrap_or(defaults.image_cache);
        let outline_limit = non_empty_var("OUTLINE_LIMIT")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(defaults.outline_limit);

        Self {
            fetch_timeout_ms,
            fetch_attempts,
            image_cache,
            templates_dir: non_empty_var("TEMPLATES_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.templates_dir),
            output_dir: non_empty_var("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            google_api_key: non_empty_var("GOOGLE_API_KEY"),
            google_cx: non_empty_var("GOOGLE_CX"),
            outline_limit,
        }
    }

    /// Get an asset resolver configuration from this config
    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            timeout_ms: self.fetch_timeout_ms,
            attempts: self.fetch_attempts,
            cache: self.image_cache,
        }
    }

    /// Image search settings, or `None` when the API credentials are missing.
    pub fn search_config(&self) -> Option<SearchConfig> {
        Some(SearchConfig {
            api_key: self.google_api_key.clone()?,
            cx: self.google_cx.clone()?,
            timeout_ms: self.fetch_timeout_ms,
        })
    }
}
