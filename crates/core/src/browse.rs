//! Entry points an agent uses to browse: search, open a page, read on.

use std::sync::Arc;
use std::time::Duration;

use crate::Error;
use crate::chunk::{ChunkResult, ChunkRetriever};
use crate::provider::{SearchHit, SearchProvider};

/// Default timeout for opening or reading a page.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// Default timeout for a search.
pub const DEFAULT_SEARCH_TIMEOUT: Duration = Duration::from_secs(20);

/// Default number of search hits returned.
pub const DEFAULT_MAX_RESULTS: usize = 3;

/// Values used when a caller leaves a parameter unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrowseDefaults {
    pub fetch_timeout: Duration,
    pub search_timeout: Duration,
    pub max_results: usize,
}

impl Default for BrowseDefaults {
    fn default() -> Self {
        Self {
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            search_timeout: DEFAULT_SEARCH_TIMEOUT,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

/// Search and chunked page reading behind one handle.
#[derive(Clone)]
pub struct Browser {
    retriever: ChunkRetriever,
    search: Arc<dyn SearchProvider>,
    defaults: BrowseDefaults,
}

impl Browser {
    pub fn new(retriever: ChunkRetriever, search: Arc<dyn SearchProvider>, defaults: BrowseDefaults) -> Self {
        Self { retriever, search, defaults }
    }

    pub fn retriever(&self) -> &ChunkRetriever {
        &self.retriever
    }

    pub fn defaults(&self) -> &BrowseDefaults {
        &self.defaults
    }

    /// First chunk of the page at `url`.
    pub async fn open_url(&self, url: &str, timeout: Option<Duration>) -> Result<ChunkResult, Error> {
        self.get_chunk(url, 0, self.retriever.max_chunk_chars(), timeout).await
    }

    /// Characters `[start, end)` of the page at `url`, bounded as described
    /// on [`ChunkRetriever::get_chunk`].
    pub async fn get_chunk(
        &self, url: &str, start: usize, end: usize, timeout: Option<Duration>,
    ) -> Result<ChunkResult, Error> {
        let timeout = timeout.unwrap_or(self.defaults.fetch_timeout);
        self.retriever.get_chunk(url, start, end, timeout).await
    }

    /// Ranked hits for `query`, at most `max_results` of them.
    pub async fn search(
        &self, query: &str, max_results: Option<usize>, timeout: Option<Duration>,
    ) -> Result<Vec<SearchHit>, Error> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::InvalidInput("query cannot be empty".into()));
        }

        let max_results = max_results.unwrap_or(self.defaults.max_results);
        if max_results == 0 {
            return Err(Error::InvalidInput("max_results must be at least 1".into()));
        }

        let timeout = timeout.unwrap_or(self.defaults.search_timeout);
        let mut hits = self.search.search(query, max_results, timeout).await?;
        hits.truncate(max_results);

        tracing::debug!("search via {} returned {} hits for {:?}", self.search.name(), hits.len(), query);
        Ok(hits)
    }

    /// Search for `query` and open the top hit.
    pub async fn search_and_open(
        &self, query: &str, timeout: Option<Duration>,
    ) -> Result<(SearchHit, ChunkResult), Error> {
        let hit = self
            .search(query, Some(1), timeout)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::NoSearchResults(query.to_string()))?;

        let chunk = self.open_url(&hit.url, timeout).await?;
        Ok((hit, chunk))
    }
}
