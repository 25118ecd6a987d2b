//! Bounded, file-backed page cache.
//!
//! The cache is a single JSON document mapping URL to the page's full text
//! and the time it was written. It holds at most a fixed number of pages;
//! each write evicts the oldest entries beyond that. There is no expiry.

pub mod entry;
pub mod store;

pub use crate::Error;

pub use entry::{Cache, CacheEntry};
pub use store::{CacheStore, MAX_CACHE_SIZE};
