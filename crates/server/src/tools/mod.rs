//! MCP tool implementations.
//!
//! This module contains all tools exposed by the browsekit server.

use std::time::Duration;

use rmcp::{ErrorData as McpError, model::*};
use serde::Serialize;

use browsekit_core::Error;

pub mod cache;
pub mod web_chunk;
pub mod web_open;
pub mod web_search;

/// Wrap a tool's output as pretty-printed JSON text content.
pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

pub(crate) fn timeout_from_ms(timeout_ms: Option<u64>) -> Option<Duration> {
    timeout_ms.map(Duration::from_millis)
}
