//! Client code for browsekit.
//!
//! This crate provides the network-facing collaborators of the core: the
//! Jina reader as a [`ContentFetcher`](browsekit_core::ContentFetcher) and
//! Jina search as a [`SearchProvider`](browsekit_core::SearchProvider).

pub mod fetch;
pub mod search;

pub use fetch::{FetchConfig, JinaReader};
pub use search::{JinaSearch, SearchConfig, parse_search_results};
