//! Unified error types for browsekit.
//!
//! Display texts are what callers (and, through the MCP server, agents) read,
//! so the fetch-related wording stays stable across releases.

use std::time::Duration;

use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Upper bound on the length of provider error details carried in an error.
pub const MAX_ERROR_DETAIL_CHARS: usize = 10_000;

/// Unified error types for browsekit.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty URL or query).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// URL could not be parsed or uses an unsupported scheme.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Requested chunk ends before it starts.
    #[error("invalid range: end {end} is before start {start}")]
    InvalidRange { start: usize, end: usize },

    /// Content fetch exceeded its timeout.
    #[error(
        "Fetch timeout (timeout={} seconds). Please check your url or set a longer timeout argument if you need to.",
        .timeout.as_secs_f64()
    )]
    FetchTimeout { timeout: Duration },

    /// Search request exceeded its timeout.
    #[error(
        "Fetch timeout (timeout={} seconds). Please check your query or set a longer timeout argument if you need to.",
        .timeout.as_secs_f64()
    )]
    SearchTimeout { timeout: Duration },

    /// Non-timeout failure reported by a provider.
    #[error("{detail}")]
    FetchFailure { status: Option<u16>, detail: String },

    /// Nothing was cached for the URL and fetching it failed too.
    #[error("The content was not found in cache and using {provider} resulted in: {source}")]
    CacheMissThenFetchFailure {
        provider: String,
        #[source]
        source: Box<Error>,
    },

    /// Writing the cache document failed.
    #[error("failed to persist cache: {0}")]
    CachePersist(String),

    /// The cache document exists but cannot be read or decoded.
    #[error("cache file is corrupt: {0}")]
    CacheCorrupt(String),

    /// Search provider rejected the credentials.
    #[error("search authentication failed: {0}")]
    SearchAuth(String),

    /// Search provider rate limited the request.
    #[error("search rate limited: {0}")]
    SearchRateLimited(String),

    /// Search succeeded but returned nothing to open.
    #[error("no search results for: {0}")]
    NoSearchResults(String),
}

impl Error {
    /// A provider failure for a non-success HTTP status.
    pub fn status(code: u16) -> Self {
        Error::FetchFailure { status: Some(code), detail: format!("{code} status code") }
    }

    /// A provider failure with free-form detail, truncated to
    /// [`MAX_ERROR_DETAIL_CHARS`] characters.
    pub fn fetch_failure(detail: impl Into<String>) -> Self {
        Error::FetchFailure { status: None, detail: truncate_detail(detail.into()) }
    }

    /// Whether this error (or the fetch failure it wraps) is a timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::FetchTimeout { .. } | Error::SearchTimeout { .. } => true,
            Error::CacheMissThenFetchFailure { source, .. } => source.is_timeout(),
            _ => false,
        }
    }
}

fn truncate_detail(detail: String) -> String {
    match detail.char_indices().nth(MAX_ERROR_DETAIL_CHARS) {
        Some((idx, _)) => format!("{}...", &detail[..idx]),
        None => detail,
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidInput(_) | Error::InvalidRange { .. } => -32602,
            Error::CacheMissThenFetchFailure { .. } => -32001,
            Error::CachePersist(_) | Error::CacheCorrupt(_) => -32002,
            Error::InvalidUrl(_) => -32003,
            Error::FetchTimeout { .. } | Error::SearchTimeout { .. } => -32006,
            Error::FetchFailure { .. } => -32008,
            Error::SearchAuth(_) => -32009,
            Error::SearchRateLimited(_) => -32010,
            Error::NoSearchResults(_) => -32013,
        };

        McpError { code: ErrorCode(code), message: err.to_string().into(), data: None }
    }
}
