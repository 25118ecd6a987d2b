//! web_search tool implementation.
//!
//! Finds candidate pages for a query. Results are not cached; open a hit
//! with web_open to read it.

use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use browsekit_core::{Browser, Error, SearchHit};

use super::{json_result, timeout_from_ms};

/// Input parameters for web_search tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct WebSearchParams {
    /// Search query (required).
    pub query: String,

    /// Number of results (default 3).
    #[serde(default)]
    pub max_results: Option<usize>,

    /// Search timeout in milliseconds (default: 20000).
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

/// Output structure for web_search tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WebSearchOutput {
    /// The search results, best first.
    pub results: Vec<SearchHit>,
}

pub async fn search(browser: &Browser, params: WebSearchParams) -> Result<WebSearchOutput, Error> {
    let results = browser
        .search(&params.query, params.max_results, timeout_from_ms(params.timeout_ms))
        .await?;
    Ok(WebSearchOutput { results })
}

/// Implementation of the web_search tool.
pub async fn search_impl(browser: &Browser, params: WebSearchParams) -> Result<CallToolResult, McpError> {
    let output = search(browser, params).await?;
    json_result(&output)
}
