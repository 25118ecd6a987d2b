//! Seams to the network-facing collaborators.

use std::time::Duration;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Error;

/// Placeholder for search-result fields the provider did not supply.
pub const NOT_FOUND: &str = "Not found";

/// Retrieves the full extracted text of a page.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Human-readable provider name used in diagnostics.
    fn name(&self) -> &str;

    /// Fetch `url` (already stripped of its fragment) within `timeout`.
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<String, Error>;
}

/// A single search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SearchHit {
    pub url: String,
    pub title: String,
    pub description: String,
}

/// Turns a free-text query into ranked candidate URLs.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn search(&self, query: &str, max_results: usize, timeout: Duration) -> Result<Vec<SearchHit>, Error>;
}
