//! Chunked retrieval of page content.
//!
//! A chunk request names a character window of a page's full text. The
//! retriever serves it from the cache when the page is there, otherwise it
//! fetches the page once, stores it, and slices the fresh copy. Windows are
//! capped at a maximum size and clamped to the document length.

use std::sync::Arc;
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Error;
use crate::cache::CacheStore;
use crate::provider::ContentFetcher;
use crate::url::strip_fragment;

/// Default maximum number of characters returned per chunk.
pub const MAX_CHUNK_CHARS: usize = 5000;

/// A character window of a page's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ChunkResult {
    /// The characters in `range`.
    pub content: String,
    /// Length of the full document in characters.
    pub total_chars: usize,
    /// The window actually served. May be shorter than requested.
    pub range: (usize, usize),
}

impl ChunkResult {
    /// Offset to request next, if the document continues past this chunk.
    pub fn next_start(&self) -> Option<usize> {
        (self.range.1 < self.total_chars).then_some(self.range.1)
    }

    /// Whether nothing of the document remains after this chunk.
    pub fn is_exhausted(&self) -> bool {
        self.next_start().is_none()
    }
}

/// Serves bounded chunks of page content, preferring the cache over a fetch.
#[derive(Clone)]
pub struct ChunkRetriever {
    store: Arc<CacheStore>,
    fetcher: Arc<dyn ContentFetcher>,
    max_chunk_chars: usize,
}

impl std::fmt::Debug for ChunkRetriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkRetriever")
            .field("store", &self.store)
            .field("fetcher", &self.fetcher.name())
            .field("max_chunk_chars", &self.max_chunk_chars)
            .finish()
    }
}

impl ChunkRetriever {
    pub fn new(store: Arc<CacheStore>, fetcher: Arc<dyn ContentFetcher>, max_chunk_chars: usize) -> Self {
        Self { store, fetcher, max_chunk_chars }
    }

    pub fn max_chunk_chars(&self) -> usize {
        self.max_chunk_chars
    }

    pub fn store(&self) -> &Arc<CacheStore> {
        &self.store
    }

    /// Characters `[start, end)` of the page at `url`.
    ///
    /// `end` is capped at `start + max_chunk_chars` and at the document
    /// length. Starting at or past the end of the document yields an empty
    /// chunk, not an error.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for an empty URL, `InvalidRange` when `end < start`
    /// - `CacheMissThenFetchFailure` when the page is not cached and the
    ///   fetch fails
    pub async fn get_chunk(&self, url: &str, start: usize, end: usize, timeout: Duration) -> Result<ChunkResult, Error> {
        if url.trim().is_empty() {
            return Err(Error::InvalidInput("url cannot be empty".into()));
        }
        if end < start {
            return Err(Error::InvalidRange { start, end });
        }

        let end = end.min(start.saturating_add(self.max_chunk_chars));
        let content = self.content_for(url, timeout).await?;

        Ok(slice_chunk(&content, start, end))
    }

    /// Full text for `url`: cached copy if present, otherwise fetched and
    /// stored.
    async fn content_for(&self, url: &str, timeout: Duration) -> Result<String, Error> {
        if let Some(content) = self.lookup(url).await {
            tracing::debug!("cache hit for {}", url);
            return Ok(content);
        }

        tracing::debug!("cache miss for {}", url);
        let content = self.fetch(url, timeout).await.map_err(|source| Error::CacheMissThenFetchFailure {
            provider: self.fetcher.name().to_string(),
            source: Box::new(source),
        })?;

        if let Err(e) = self.save(url, content.clone()).await {
            tracing::warn!("failed to cache content for {}: {}", url, e);
        }

        Ok(content)
    }

    async fn lookup(&self, url: &str) -> Option<String> {
        let store = Arc::clone(&self.store);
        let url = url.to_string();
        match tokio::task::spawn_blocking(move || store.lookup(&url)).await {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("cache lookup task failed: {}", e);
                None
            }
        }
    }

    async fn save(&self, url: &str, content: String) -> Result<(), Error> {
        let store = Arc::clone(&self.store);
        let url = url.to_string();
        tokio::task::spawn_blocking(move || store.store(&url, content))
            .await
            .map_err(|e| Error::CachePersist(e.to_string()))?
    }

    async fn fetch(&self, url: &str, timeout: Duration) -> Result<String, Error> {
        let target = strip_fragment(url);
        let started = std::time::Instant::now();

        let content = tokio::time::timeout(timeout, self.fetcher.fetch(&target, timeout))
            .await
            .map_err(|_| Error::FetchTimeout { timeout })??;

        if content.is_empty() {
            return Err(Error::fetch_failure("provider returned empty content"));
        }

        tracing::debug!(
            "fetched {} via {} in {}ms ({} bytes)",
            target,
            self.fetcher.name(),
            started.elapsed().as_millis(),
            content.len()
        );
        Ok(content)
    }
}

/// Slice characters `[start, end)` of `content`, clamping `end` to its length.
pub fn slice_chunk(content: &str, start: usize, end: usize) -> ChunkResult {
    let total_chars = content.chars().count();

    if start >= total_chars {
        return ChunkResult { content: String::new(), total_chars, range: (start, start) };
    }

    let end = end.min(total_chars).max(start);
    let slice: String = content.chars().skip(start).take(end - start).collect();

    ChunkResult { content: slice, total_chars, range: (start, end) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheStore, MAX_CACHE_SIZE};
    use crate::provider::ContentFetcher;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// Serves canned pages and counts calls.
    #[derive(Default)]
    struct StubFetcher {
        pages: HashMap<String, String>,
        calls: AtomicUsize,
        requested: Mutex<Vec<String>>,
        delay: Option<Duration>,
    }

    impl StubFetcher {
        fn with_page(url: &str, content: &str) -> Self {
            let mut stub = Self::default();
            stub.pages.insert(url.to_string(), content.to_string());
            stub
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ContentFetcher for StubFetcher {
        fn name(&self) -> &str {
            "Stub"
        }

        async fn fetch(&self, url: &str, _timeout: Duration) -> Result<String, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requested.lock().unwrap().push(url.to_string());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.pages.get(url).cloned().ok_or_else(|| Error::status(404))
        }
    }

    const TIMEOUT: Duration = Duration::from_secs(15);

    fn retriever(dir: &TempDir, fetcher: Arc<StubFetcher>, capacity: usize, max_chunk: usize) -> ChunkRetriever {
        let store = Arc::new(CacheStore::new(dir.path().join("cache.json"), capacity));
        ChunkRetriever::new(store, fetcher, max_chunk)
    }

    #[test]
    fn test_slice_chunk_clamps_end() {
        let chunk = slice_chunk("hello", 1, 100);
        assert_eq!(chunk.content, "ello");
        assert_eq!(chunk.range, (1, 5));
        assert_eq!(chunk.total_chars, 5);
        assert!(chunk.is_exhausted());
    }

    #[test]
    fn test_slice_chunk_empty_tail() {
        let chunk = slice_chunk("hello", 5, 10);
        assert_eq!(chunk.content, "");
        assert_eq!(chunk.range, (5, 5));
        assert!(chunk.next_start().is_none());

        let past = slice_chunk("hello", 9, 12);
        assert_eq!(past.content, "");
        assert_eq!(past.range, (9, 9));
    }

    #[test]
    fn test_slice_chunk_counts_characters() {
        let chunk = slice_chunk("héllo wörld", 1, 8);
        assert_eq!(chunk.content, "éllo wö");
        assert_eq!(chunk.total_chars, 11);
        assert_eq!(chunk.next_start(), Some(8));
    }

    #[tokio::test]
    async fn test_capacity_two_chunk_ten_scenario() {
        let dir = TempDir::new().unwrap();
        let mut stub = StubFetcher::with_page("https://one.test/", "abcdefghijklmno");
        stub.pages.insert("https://two.test/".into(), "two".into());
        stub.pages.insert("https://three.test/".into(), "three".into());
        let fetcher = Arc::new(stub);
        let retriever = retriever(&dir, Arc::clone(&fetcher), 2, 10);

        let first = retriever.get_chunk("https://one.test/", 0, 10, TIMEOUT).await.unwrap();
        assert_eq!(first.content, "abcdefghij");
        assert_eq!(first.total_chars, 15);
        assert_eq!(first.range, (0, 10));

        let second = retriever.get_chunk("https://one.test/", 10, 20, TIMEOUT).await.unwrap();
        assert_eq!(second.content, "klmno");
        assert_eq!(second.range, (10, 15));
        assert_eq!(fetcher.calls(), 1);

        retriever.get_chunk("https://two.test/", 0, 10, TIMEOUT).await.unwrap();
        retriever.get_chunk("https://three.test/", 0, 10, TIMEOUT).await.unwrap();

        let cache = retriever.store().try_load().unwrap().unwrap();
        assert_eq!(cache.len(), 2);
        assert!(!cache.contains("https://one.test/"));
        assert!(cache.contains("https://two.test/"));
        assert!(cache.contains("https://three.test/"));
    }

    #[tokio::test]
    async fn test_reconstruction_identity() {
        let dir = TempDir::new().unwrap();
        let document: String = (0..2_347).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
        let fetcher = Arc::new(StubFetcher::with_page("https://long.test/", &document));
        let retriever = retriever(&dir, Arc::clone(&fetcher), MAX_CACHE_SIZE, 500);

        let mut rebuilt = String::new();
        let mut start = 0;
        loop {
            let chunk = retriever.get_chunk("https://long.test/", start, start + 500, TIMEOUT).await.unwrap();
            if start >= chunk.total_chars {
                break;
            }
            rebuilt.push_str(&chunk.content);
            start = chunk.range.1;
        }

        assert_eq!(rebuilt, document);
        assert_eq!(fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_request_capped_at_max_chunk() {
        let dir = TempDir::new().unwrap();
        let fetcher = Arc::new(StubFetcher::with_page("https://a.test/", &"z".repeat(100)));
        let retriever = retriever(&dir, fetcher, MAX_CACHE_SIZE, 30);

        let chunk = retriever.get_chunk("https://a.test/", 5, 1_000, TIMEOUT).await.unwrap();
        assert_eq!(chunk.range, (5, 35));
        assert_eq!(chunk.content.len(), 30);
    }

    #[tokio::test]
    async fn test_end_far_beyond_document_clamped() {
        let dir = TempDir::new().unwrap();
        let fetcher = Arc::new(StubFetcher::with_page("https://a.test/", "short page"));
        let retriever = retriever(&dir, fetcher, MAX_CACHE_SIZE, MAX_CHUNK_CHARS);

        let chunk = retriever.get_chunk("https://a.test/", 0, usize::MAX, TIMEOUT).await.unwrap();
        assert_eq!(chunk.range, (0, 10));
        assert_eq!(chunk.total_chars, 10);
    }

    #[tokio::test]
    async fn test_start_at_end_is_success() {
        let dir = TempDir::new().unwrap();
        let fetcher = Arc::new(StubFetcher::with_page("https://a.test/", "0123456789"));
        let retriever = retriever(&dir, fetcher, MAX_CACHE_SIZE, MAX_CHUNK_CHARS);

        let chunk = retriever.get_chunk("https://a.test/", 10, 20, TIMEOUT).await.unwrap();
        assert_eq!(chunk.content, "");
        assert_eq!(chunk.total_chars, 10);
        assert!(chunk.is_exhausted());
    }

    #[tokio::test]
    async fn test_cache_hit_avoids_fetch() {
        let dir = TempDir::new().unwrap();
        let fetcher = Arc::new(StubFetcher::default());
        let retriever = retriever(&dir, Arc::clone(&fetcher), MAX_CACHE_SIZE, MAX_CHUNK_CHARS);
        retriever.store().store("https://cached.test/", "already here".into()).unwrap();

        let chunk = retriever.get_chunk("https://cached.test/", 8, 12, TIMEOUT).await.unwrap();
        assert_eq!(chunk.content, "here");
        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_fetch_receives_url_without_fragment() {
        let dir = TempDir::new().unwrap();
        let fetcher = Arc::new(StubFetcher::with_page("https://a.test/page", "text"));
        let retriever = retriever(&dir, Arc::clone(&fetcher), MAX_CACHE_SIZE, MAX_CHUNK_CHARS);

        let chunk = retriever.get_chunk("https://a.test/page#section-2", 0, 10, TIMEOUT).await.unwrap();
        assert_eq!(chunk.content, "text");
        assert_eq!(fetcher.requested.lock().unwrap().as_slice(), ["https://a.test/page"]);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_composite_and_leaves_cache_alone() {
        let dir = TempDir::new().unwrap();
        let fetcher = Arc::new(StubFetcher::default());
        let retriever = retriever(&dir, fetcher, MAX_CACHE_SIZE, MAX_CHUNK_CHARS);

        let err = retriever.get_chunk("https://missing.test/", 0, 10, TIMEOUT).await.unwrap_err();
        assert!(matches!(err, Error::CacheMissThenFetchFailure { .. }));
        assert_eq!(err.to_string(), "The content was not found in cache and using Stub resulted in: 404 status code");
        assert!(retriever.store().try_load().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_slow_fetch_times_out() {
        let dir = TempDir::new().unwrap();
        let mut stub = StubFetcher::with_page("https://slow.test/", "eventually");
        stub.delay = Some(Duration::from_secs(5));
        let retriever = retriever(&dir, Arc::new(stub), MAX_CACHE_SIZE, MAX_CHUNK_CHARS);

        let err = retriever
            .get_chunk("https://slow.test/", 0, 10, Duration::from_millis(50))
            .await
            .unwrap_err();
        assert!(err.is_timeout());
        assert!(err.to_string().contains("timeout=0.05 seconds"));
    }

    #[tokio::test]
    async fn test_empty_fetch_is_failure() {
        let dir = TempDir::new().unwrap();
        let fetcher = Arc::new(StubFetcher::with_page("https://empty.test/", ""));
        let retriever = retriever(&dir, fetcher, MAX_CACHE_SIZE, MAX_CHUNK_CHARS);

        let err = retriever.get_chunk("https://empty.test/", 0, 10, TIMEOUT).await.unwrap_err();
        assert!(matches!(err, Error::CacheMissThenFetchFailure { .. }));
    }

    #[tokio::test]
    async fn test_persist_failure_still_serves_content() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "x").unwrap();

        let fetcher = Arc::new(StubFetcher::with_page("https://a.test/", "fresh content"));
        let store = Arc::new(CacheStore::new(blocker.join("cache.json"), MAX_CACHE_SIZE));
        let retriever = ChunkRetriever::new(store, fetcher.clone(), MAX_CHUNK_CHARS);

        let chunk = retriever.get_chunk("https://a.test/", 0, 5, TIMEOUT).await.unwrap();
        assert_eq!(chunk.content, "fresh");

        retriever.get_chunk("https://a.test/", 5, 10, TIMEOUT).await.unwrap();
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_corrupt_cache_degrades_to_fetch() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("cache.json"), "[1, 2").unwrap();
        let fetcher = Arc::new(StubFetcher::with_page("https://a.test/", "recovered"));
        let retriever = retriever(&dir, Arc::clone(&fetcher), MAX_CACHE_SIZE, MAX_CHUNK_CHARS);

        let chunk = retriever.get_chunk("https://a.test/", 0, 100, TIMEOUT).await.unwrap();
        assert_eq!(chunk.content, "recovered");
        assert_eq!(fetcher.calls(), 1);
        assert!(retriever.store().try_load().unwrap().unwrap().contains("https://a.test/"));
    }

    #[tokio::test]
    async fn test_invalid_requests() {
        let dir = TempDir::new().unwrap();
        let fetcher = Arc::new(StubFetcher::default());
        let retriever = retriever(&dir, Arc::clone(&fetcher), MAX_CACHE_SIZE, MAX_CHUNK_CHARS);

        let err = retriever.get_chunk("https://a.test/", 10, 5, TIMEOUT).await.unwrap_err();
        assert!(matches!(err, Error::InvalidRange { start: 10, end: 5 }));

        let err = retriever.get_chunk("  ", 0, 5, TIMEOUT).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(fetcher.calls(), 0);
    }
}
