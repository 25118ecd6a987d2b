//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

fn check_timeout(field: &str, ms: u64) -> Result<(), ConfigError> {
    if ms < 100 {
        return Err(invalid(field, "must be at least 100ms"));
    }
    if ms > 300_000 {
        return Err(invalid(field, "must not exceed 5 minutes (300000ms)"));
    }
    Ok(())
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `max_cache_size`, `max_chunk_chars` or `max_search_results` is 0
    /// - `max_bytes` is 0 or exceeds 50MB
    /// - a timeout is less than 100ms or exceeds 5 minutes
    /// - `user_agent` or a base URL is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_cache_size == 0 {
            return Err(invalid("max_cache_size", "must be greater than 0"));
        }
        if self.max_chunk_chars == 0 {
            return Err(invalid("max_chunk_chars", "must be greater than 0"));
        }
        if self.max_search_results == 0 {
            return Err(invalid("max_search_results", "must be greater than 0"));
        }

        if self.max_bytes == 0 {
            return Err(invalid("max_bytes", "must be greater than 0"));
        }
        if self.max_bytes > 50 * 1024 * 1024 {
            return Err(invalid("max_bytes", "must not exceed 50MB"));
        }

        check_timeout("fetch_timeout_ms", self.fetch_timeout_ms)?;
        check_timeout("search_timeout_ms", self.search_timeout_ms)?;

        if self.user_agent.is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }
        if self.reader_base_url.trim().is_empty() {
            return Err(invalid("reader_base_url", "must not be empty"));
        }
        if self.search_base_url.trim().is_empty() {
            return Err(invalid("search_base_url", "must not be empty"));
        }

        if self.jina_api_key.is_none() {
            tracing::warn!("jina_api_key is not set; search requests will likely be rejected");
        }

        Ok(())
    }
}
