//! web_chunk tool implementation.
//!
//! Reads a later window of a page opened earlier. Served from the cache
//! while the page stays cached.

use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use browsekit_core::{Browser, Error};

use super::web_open::ChunkOutput;
use super::{json_result, timeout_from_ms};

/// Input parameters for web_chunk tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct WebChunkParams {
    /// The URL to read from.
    pub url: String,

    /// First character offset (usually the previous chunk's `next_start`).
    pub start: usize,

    /// End offset, exclusive. Defaults to one full chunk after `start`;
    /// never more than one chunk is returned.
    #[serde(default)]
    pub end: Option<usize>,

    /// Fetch timeout in milliseconds (default: 15000).
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

pub async fn chunk(browser: &Browser, params: WebChunkParams) -> Result<ChunkOutput, Error> {
    let max = browser.retriever().max_chunk_chars();
    let end = params.end.unwrap_or_else(|| params.start.saturating_add(max));

    let result = browser
        .get_chunk(&params.url, params.start, end, timeout_from_ms(params.timeout_ms))
        .await?;
    Ok(ChunkOutput::new(params.url, result))
}

/// Implementation of the web_chunk tool.
pub async fn chunk_impl(browser: &Browser, params: WebChunkParams) -> Result<CallToolResult, McpError> {
    let output = chunk(browser, params).await?;
    json_result(&output)
}
