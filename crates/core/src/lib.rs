//! Core types and shared functionality for browsekit.
//!
//! This crate provides:
//! - Bounded, file-backed page cache
//! - Chunked page retrieval with cache-before-fetch arbitration
//! - The browse facade (search, open, read on)
//! - Provider traits, unified error types and configuration

pub mod browse;
pub mod cache;
pub mod chunk;
pub mod config;
pub mod error;
pub mod provider;
pub mod url;

pub use browse::{BrowseDefaults, Browser};
pub use cache::{Cache, CacheEntry, CacheStore};
pub use chunk::{ChunkResult, ChunkRetriever};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use provider::{ContentFetcher, SearchHit, SearchProvider};
