//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (BROWSEKIT_*)
//! 2. TOML config file (if BROWSEKIT_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::browse::BrowseDefaults;
use crate::cache::MAX_CACHE_SIZE;
use crate::chunk::MAX_CHUNK_CHARS;

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (BROWSEKIT_*)
/// 2. TOML config file (if BROWSEKIT_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the JSON page cache.
    ///
    /// Set via BROWSEKIT_CACHE_PATH environment variable.
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,

    /// Number of pages kept in the cache.
    #[serde(default = "default_max_cache_size")]
    pub max_cache_size: usize,

    /// Maximum characters returned by a single chunk.
    #[serde(default = "default_max_chunk_chars")]
    pub max_chunk_chars: usize,

    /// Page fetch timeout in milliseconds.
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,

    /// Search timeout in milliseconds.
    #[serde(default = "default_search_timeout_ms")]
    pub search_timeout_ms: u64,

    /// Number of search hits returned when the caller does not say.
    #[serde(default = "default_max_search_results")]
    pub max_search_results: usize,

    /// Maximum bytes accepted from the reader per page.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// User-Agent string for HTTP requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Jina API key, sent as a bearer token when present.
    ///
    /// Set via BROWSEKIT_JINA_API_KEY environment variable.
    #[serde(default)]
    pub jina_api_key: Option<String>,

    /// Base URL of the reader service that turns a page into text.
    #[serde(default = "default_reader_base_url")]
    pub reader_base_url: String,

    /// Base URL of the search service.
    #[serde(default = "default_search_base_url")]
    pub search_base_url: String,
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("./browsing_cache.json")
}

fn default_max_cache_size() -> usize {
    MAX_CACHE_SIZE
}

fn default_max_chunk_chars() -> usize {
    MAX_CHUNK_CHARS
}

fn default_fetch_timeout_ms() -> u64 {
    15_000
}

fn default_search_timeout_ms() -> u64 {
    20_000
}

fn default_max_search_results() -> usize {
    3
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_user_agent() -> String {
    "browsekit/0.1".into()
}

fn default_reader_base_url() -> String {
    "https://r.jina.ai".into()
}

fn default_search_base_url() -> String {
    "https://s.jina.ai".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_path: default_cache_path(),
            max_cache_size: default_max_cache_size(),
            max_chunk_chars: default_max_chunk_chars(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
            search_timeout_ms: default_search_timeout_ms(),
            max_search_results: default_max_search_results(),
            max_bytes: default_max_bytes(),
            user_agent: default_user_agent(),
            jina_api_key: None,
            reader_base_url: default_reader_base_url(),
            search_base_url: default_search_base_url(),
        }
    }
}

impl AppConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn search_timeout(&self) -> Duration {
        Duration::from_millis(self.search_timeout_ms)
    }

    /// Defaults handed to the browse facade.
    pub fn browse_defaults(&self) -> BrowseDefaults {
        BrowseDefaults {
            fetch_timeout: self.fetch_timeout(),
            search_timeout: self.search_timeout(),
            max_results: self.max_search_results,
        }
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `BROWSEKIT_`
    /// 2. TOML file from `BROWSEKIT_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file or environment cannot be parsed, or
    /// validation fails after loading.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("BROWSEKIT_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("BROWSEKIT_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into()),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
