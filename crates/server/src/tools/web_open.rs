//! web_open tool implementation.
//!
//! Opens a URL and returns its first chunk, fetching only on a cache miss.

use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use browsekit_core::{Browser, ChunkResult, Error};

use super::{json_result, timeout_from_ms};

/// Input parameters for web_open tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct WebOpenParams {
    /// The URL to open.
    pub url: String,

    /// Fetch timeout in milliseconds (default: 15000).
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

/// Output shared by web_open and web_chunk.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ChunkOutput {
    /// The URL requested.
    pub url: String,
    /// The characters in `range`.
    pub content: String,
    /// Length of the whole document in characters.
    pub total_chars: usize,
    /// The `[start, end)` window actually returned.
    pub range: (usize, usize),
    /// Start offset of the next chunk, absent once the document is exhausted.
    pub next_start: Option<usize>,
}

impl ChunkOutput {
    pub fn new(url: String, chunk: ChunkResult) -> Self {
        let next_start = chunk.next_start();
        Self { url, content: chunk.content, total_chars: chunk.total_chars, range: chunk.range, next_start }
    }
}

pub async fn open(browser: &Browser, params: WebOpenParams) -> Result<ChunkOutput, Error> {
    let chunk = browser.open_url(&params.url, timeout_from_ms(params.timeout_ms)).await?;
    Ok(ChunkOutput::new(params.url, chunk))
}

/// Implementation of the web_open tool.
pub async fn open_impl(browser: &Browser, params: WebOpenParams) -> Result<CallToolResult, McpError> {
    let output = open(browser, params).await?;
    json_result(&output)
}
