//! File-backed cache store.
//!
//! The JSON document on disk is the only state. Every read-modify-write of it
//! goes through the store's lock, and writes replace the file atomically via
//! a temporary file in the same directory.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tempfile::NamedTempFile;

use super::entry::{Cache, CacheEntry};
use crate::Error;

/// Default number of pages kept in the cache.
pub const MAX_CACHE_SIZE: usize = 5;

/// Bounded, file-backed mapping from URL to page content.
#[derive(Debug)]
pub struct CacheStore {
    path: PathBuf,
    capacity: usize,
    lock: Mutex<()>,
}

impl CacheStore {
    /// Create a store for the document at `path`. Nothing is read or
    /// written until the first operation.
    pub fn new(path: impl Into<PathBuf>, capacity: usize) -> Self {
        Self { path: path.into(), capacity, lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Read the persisted cache.
    ///
    /// Returns `None` when there is no document yet. A document that cannot
    /// be read or decoded is logged and treated the same way.
    pub fn load(&self) -> Option<Cache> {
        let _guard = self.guard();
        self.read_lenient()
    }

    /// Read the persisted cache, surfacing corruption as an error.
    pub fn try_load(&self) -> Result<Option<Cache>, Error> {
        let _guard = self.guard();
        self.read()
    }

    /// Insert or replace `url` in `cache` and evict down to capacity.
    pub fn put(&self, mut cache: Cache, url: &str, content: String) -> Cache {
        cache.put(url, content, self.capacity);
        cache
    }

    /// Overwrite the persisted document with `cache`.
    pub fn persist(&self, cache: &Cache) -> Result<(), Error> {
        let _guard = self.guard();
        self.write(cache)
    }

    /// Cached content for `url`, if any.
    pub fn lookup(&self, url: &str) -> Option<String> {
        let _guard = self.guard();
        self.read_lenient()?.content(url).map(str::to_string)
    }

    /// Load, insert `url`, evict and persist as a single critical section.
    pub fn store(&self, url: &str, content: String) -> Result<(), Error> {
        let _guard = self.guard();
        let cache = self.read_lenient().unwrap_or_default();
        let cache = self.put(cache, url, content);
        self.write(&cache)?;

        tracing::debug!(url, entries = cache.len(), path = %self.path.display(), "cache stored");
        Ok(())
    }

    /// Persisted entries, newest first.
    pub fn entries(&self) -> Vec<CacheEntry> {
        self.load()
            .map(|cache| cache.newest_first().into_iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Remove the persisted document. Returns whether one existed.
    pub fn clear(&self) -> Result<bool, Error> {
        let _guard = self.guard();
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::CachePersist(format!("{}: {e}", self.path.display()))),
        }
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn read_lenient(&self) -> Option<Cache> {
        match self.read() {
            Ok(cache) => cache,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "ignoring unreadable cache: {}", e);
                None
            }
        }
    }

    fn read(&self) -> Result<Option<Cache>, Error> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::CacheCorrupt(format!("{}: {e}", self.path.display()))),
        };

        let mut cache: Cache = serde_json::from_str(&raw)
            .map_err(|e| Error::CacheCorrupt(format!("{}: {e}", self.path.display())))?;
        cache.restore_urls();
        Ok(Some(cache))
    }

    fn write(&self, cache: &Cache) -> Result<(), Error> {
        let persist_err = |e: &dyn std::fmt::Display| Error::CachePersist(format!("{}: {e}", self.path.display()));

        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| persist_err(&e))?;

        let json = serde_json::to_vec_pretty(cache).map_err(|e| persist_err(&e))?;

        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| persist_err(&e))?;
        tmp.write_all(&json).map_err(|e| persist_err(&e))?;
        tmp.flush().map_err(|e| persist_err(&e))?;
        tmp.as_file().sync_all().map_err(|e| persist_err(&e))?;
        tmp.persist(&self.path).map_err(|e| persist_err(&e.error))?;

        Ok(())
    }
}
