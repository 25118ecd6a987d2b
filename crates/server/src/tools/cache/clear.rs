//! cache_clear tool implementation.
//!
//! Deletes the persisted page cache.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use browsekit_core::{Browser, Error};

use crate::tools::json_result;

/// Output from the cache_clear tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheClearOutput {
    /// Whether a cache file existed and was removed.
    pub cleared: bool,
}

pub async fn clear(browser: &Browser) -> Result<CacheClearOutput, Error> {
    let store = browser.retriever().store().clone();
    let cleared = tokio::task::spawn_blocking(move || store.clear())
        .await
        .map_err(|e| Error::CachePersist(e.to_string()))??;

    tracing::info!(cleared, "cache cleared");
    Ok(CacheClearOutput { cleared })
}

/// Implementation of the cache_clear tool.
pub async fn clear_impl(browser: &Browser) -> Result<CallToolResult, McpError> {
    json_result(&clear(browser).await?)
}
