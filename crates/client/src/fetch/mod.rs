//! Page text retrieval through the Jina reader.
//!
//! The reader is addressed as `{base_url}/{target_url}` and answers with the
//! page's extracted text. The target is validated as an absolute
//! `http`/`https` URL and stripped of its fragment before the request.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};

use browsekit_core::url::parse_web_url;
use browsekit_core::{AppConfig, ContentFetcher, Error};

/// Configuration for the reader client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Reader base URL (default: "https://r.jina.ai")
    pub base_url: String,

    /// Optional bearer token.
    pub api_key: Option<String>,

    /// User agent string (default: "browsekit/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://r.jina.ai".to_string(),
            api_key: None,
            user_agent: "browsekit/0.1".to_string(),
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            base_url: config.reader_base_url.clone(),
            api_key: config.jina_api_key.clone(),
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
        }
    }
}

/// [`ContentFetcher`] backed by the Jina reader.
#[derive(Debug, Clone)]
pub struct JinaReader {
    http: Client,
    config: FetchConfig,
}

impl JinaReader {
    /// Create a new reader client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        url::Url::parse(&config.base_url)
            .map_err(|e| Error::InvalidUrl(format!("reader base url {}: {e}", config.base_url)))?;

        let http = Client::builder()
            .user_agent(&config.user_agent)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::fetch_failure(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    /// The reader endpoint for `target`.
    pub fn reader_url(&self, target: &str) -> Result<String, Error> {
        let target = parse_web_url(target)?;
        Ok(format!("{}/{}", self.config.base_url.trim_end_matches('/'), target))
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

#[async_trait]
impl ContentFetcher for JinaReader {
    fn name(&self) -> &str {
        "Jina"
    }

    async fn fetch(&self, url: &str, timeout: Duration) -> Result<String, Error> {
        let start = Instant::now();
        let endpoint = self.reader_url(url)?;

        let mut request = self.http.get(&endpoint).timeout(timeout);
        if let Some(key) = &self.config.api_key {
            request = request.header(header::AUTHORIZATION, format!("Bearer {key}"));
        }

        let response = request.send().await.map_err(|e| transport_error(e, timeout))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::status(status.as_u16()));
        }

        if let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(Error::fetch_failure(format!("{} bytes exceeds {}", len, self.config.max_bytes)));
        }

        let bytes = response.bytes().await.map_err(|e| transport_error(e, timeout))?;
        if bytes.len() > self.config.max_bytes {
            return Err(Error::fetch_failure(format!("{} bytes exceeds {}", bytes.len(), self.config.max_bytes)));
        }

        let content = String::from_utf8(bytes.to_vec())
            .map_err(|e| Error::fetch_failure(format!("response is not valid UTF-8: {e}")))?;

        tracing::debug!("read {} in {}ms ({} bytes)", url, start.elapsed().as_millis(), content.len());

        Ok(content)
    }
}

/// Map a reqwest failure to a timeout or a bounded failure message.
pub(crate) fn transport_error(err: reqwest::Error, timeout: Duration) -> Error {
    if err.is_timeout() { Error::FetchTimeout { timeout } } else { Error::fetch_failure(format!("network error: {err}")) }
}
