//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use crate::tools::{
    cache::{clear_impl, list_impl},
    web_chunk::{WebChunkParams, chunk_impl},
    web_open::{WebOpenParams, open_impl},
    web_search::{WebSearchParams, search_impl},
};

use browsekit_core::Browser;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for browsekit.
#[derive(Clone)]
pub struct BrowseServer {
    browser: Browser,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl BrowseServer {
    /// Create a new server handler.
    pub fn new(browser: Browser) -> Self {
        Self { browser, tool_router: Self::tool_router() }
    }

    #[tool(description = "Search the web. Returns up to max_results hits with url, title and description.")]
    async fn web_search(&self, params: Parameters<WebSearchParams>) -> Result<CallToolResult, McpError> {
        search_impl(&self.browser, params.0).await
    }

    /// Open a page and return its first chunk.
    ///
    /// Long pages are returned in chunks; follow `next_start` with web_chunk
    /// to keep reading. The full text is cached, so later chunks do not
    /// refetch the page.
    #[tool(
        description = "Open a URL and return the first chunk of its text, with total_chars and next_start for paging."
    )]
    async fn web_open(&self, params: Parameters<WebOpenParams>) -> Result<CallToolResult, McpError> {
        open_impl(&self.browser, params.0).await
    }

    #[tool(
        description = "Read characters [start, end) of a page's text. At most one chunk is returned; pass next_start from the previous result to continue."
    )]
    async fn web_chunk(&self, params: Parameters<WebChunkParams>) -> Result<CallToolResult, McpError> {
        chunk_impl(&self.browser, params.0).await
    }

    #[tool(description = "List cached pages, newest first.")]
    async fn cache_list(&self) -> Result<CallToolResult, McpError> {
        list_impl(&self.browser).await
    }

    #[tool(description = "Delete the page cache so subsequent reads refetch.")]
    async fn cache_clear(&self) -> Result<CallToolResult, McpError> {
        clear_impl(&self.browser).await
    }
}

impl ServerHandler for BrowseServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "browsekit".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Use web_search to find pages, web_open to read the first chunk, and web_chunk with next_start to continue."
                    .into(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
