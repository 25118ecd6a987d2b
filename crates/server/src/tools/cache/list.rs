//! cache_list tool implementation.
//!
//! Lists the cached pages, newest first.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use browsekit_core::{Browser, CacheEntry};

use crate::tools::json_result;

/// A cached page, without its content.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachedPage {
    pub url: String,
    /// RFC 3339 time the page was written to the cache.
    pub timestamp: String,
    pub total_chars: usize,
}

impl From<&CacheEntry> for CachedPage {
    fn from(entry: &CacheEntry) -> Self {
        Self {
            url: entry.url.clone(),
            timestamp: entry.timestamp.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            total_chars: entry.content.chars().count(),
        }
    }
}

/// Output from the cache_list tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheListOutput {
    pub capacity: usize,
    pub entries: Vec<CachedPage>,
}

pub async fn list(browser: &Browser) -> CacheListOutput {
    let store = browser.retriever().store().clone();
    let capacity = store.capacity();
    let entries = tokio::task::spawn_blocking(move || store.entries())
        .await
        .unwrap_or_else(|e| {
            tracing::warn!("cache listing task failed: {}", e);
            Vec::new()
        });

    CacheListOutput { capacity, entries: entries.iter().map(CachedPage::from).collect() }
}

/// Implementation of the cache_list tool.
pub async fn list_impl(browser: &Browser) -> Result<CallToolResult, McpError> {
    json_result(&list(browser).await)
}
