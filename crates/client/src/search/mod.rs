//! Jina search client.
//!
//! - **Endpoint**: `GET {base_url}/?q=<query>`
//! - **Authentication**: optional `Authorization: Bearer <key>` header.
//! - **Response**: `X-Respond-With: no-content` asks for titles, URLs and
//!   descriptions only; the plain-text listing is parsed by [`parse`].

pub mod parse;

pub use parse::parse_search_results;

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};

use browsekit_core::{AppConfig, Error, SearchHit, SearchProvider};

/// Search client configuration.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Base URL (default: https://s.jina.ai).
    pub base_url: String,
    /// Optional bearer token.
    pub api_key: Option<String>,
    /// User-agent string (default: browsekit/0.1).
    pub user_agent: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { base_url: "https://s.jina.ai".to_string(), api_key: None, user_agent: "browsekit/0.1".to_string() }
    }
}

impl From<&AppConfig> for SearchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            base_url: config.search_base_url.clone(),
            api_key: config.jina_api_key.clone(),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// [`SearchProvider`] backed by Jina search.
#[derive(Debug, Clone)]
pub struct JinaSearch {
    http: Client,
    config: SearchConfig,
}

impl JinaSearch {
    pub fn new(config: SearchConfig) -> Result<Self, Error> {
        url::Url::parse(&config.base_url)
            .map_err(|e| Error::InvalidUrl(format!("search base url {}: {e}", config.base_url)))?;

        let http = Client::builder()
            .user_agent(&config.user_agent)
            .use_rustls_tls()
            .build()
            .map_err(|e| Error::fetch_failure(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }
}

#[async_trait]
impl SearchProvider for JinaSearch {
    fn name(&self) -> &str {
        "Jina"
    }

    async fn search(&self, query: &str, max_results: usize, timeout: Duration) -> Result<Vec<SearchHit>, Error> {
        let start = Instant::now();
        let url = format!("{}/", self.config.base_url.trim_end_matches('/'));

        tracing::debug!("searching Jina: query={}", query);

        let mut request = self
            .http
            .get(&url)
            .timeout(timeout)
            .query(&[("q", query)])
            .header("X-Respond-With", "no-content");
        if let Some(key) = &self.config.api_key {
            request = request.header(header::AUTHORIZATION, format!("Bearer {key}"));
        }

        let response = request.send().await.map_err(|e| search_error(e, timeout))?;

        let status = response.status();
        tracing::debug!("Jina search response status: {}", status);

        match status {
            StatusCode::OK => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(Error::SearchAuth(format!("{} status code", status.as_u16())));
            }
            StatusCode::TOO_MANY_REQUESTS => {
                return Err(Error::SearchRateLimited(format!("{} status code", status.as_u16())));
            }
            other => return Err(Error::status(other.as_u16())),
        }

        let text = response.text().await.map_err(|e| search_error(e, timeout))?;
        let hits = parse_search_results(text.trim(), max_results);

        tracing::debug!("search completed in {:?}, {} results", start.elapsed(), hits.len());

        Ok(hits)
    }
}

fn search_error(err: reqwest::Error, timeout: Duration) -> Error {
    if err.is_timeout() { Error::SearchTimeout { timeout } } else { Error::fetch_failure(format!("network error: {err}")) }
}
