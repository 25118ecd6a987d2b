//! In-memory form of the persisted cache document.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A cached page's full extracted text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The URL this content was fetched for. Stored as the document key.
    #[serde(skip)]
    pub url: String,
    pub content: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
}

/// Accepts RFC 3339 as well as offset-less ISO 8601 stamps, which are read
/// as UTC.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

/// Mapping from URL to cached content.
///
/// Serializes as a flat JSON object keyed by URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cache {
    entries: HashMap<String, CacheEntry>,
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    pub fn get(&self, url: &str) -> Option<&CacheEntry> {
        self.entries.get(url)
    }

    /// Content for `url`, ignoring entries whose content is empty.
    pub fn content(&self, url: &str) -> Option<&str> {
        self.get(url)
            .map(|e| e.content.as_str())
            .filter(|c| !c.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = &CacheEntry> {
        self.entries.values()
    }

    /// Entries ordered newest first.
    pub fn newest_first(&self) -> Vec<&CacheEntry> {
        let mut entries: Vec<&CacheEntry> = self.entries.values().collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries
    }

    /// Insert or replace the entry for `url`, stamped now, then evict down
    /// to `capacity`.
    ///
    /// The stamp is bumped past the newest existing timestamp if the clock
    /// has not advanced, so the latest write always sorts first.
    pub fn put(&mut self, url: &str, content: String, capacity: usize) {
        let mut now = Utc::now();
        if let Some(newest) = self.entries.values().map(|e| e.timestamp).max()
            && now <= newest
        {
            now = newest.checked_add_signed(Duration::nanoseconds(1)).unwrap_or(newest);
        }
        self.put_at(url, content, now, capacity);
    }

    /// Insert or replace the entry for `url` with an explicit timestamp,
    /// then evict down to `capacity`.
    pub fn put_at(&mut self, url: &str, content: String, timestamp: DateTime<Utc>, capacity: usize) {
        self.entries
            .insert(url.to_string(), CacheEntry { url: url.to_string(), content, timestamp });
        self.evict(capacity);
    }

    /// Keep the `capacity` newest entries. Order among equal timestamps is
    /// unspecified.
    pub fn evict(&mut self, capacity: usize) {
        if self.entries.len() <= capacity {
            return;
        }

        let mut by_age: Vec<(String, DateTime<Utc>)> = self
            .entries
            .iter()
            .map(|(url, e)| (url.clone(), e.timestamp))
            .collect();
        by_age.sort_by(|a, b| b.1.cmp(&a.1));

        for (url, _) in by_age.into_iter().skip(capacity) {
            tracing::debug!(url = %url, "evicting cache entry");
            self.entries.remove(&url);
        }
    }

    /// Restore the `url` field of every entry from its document key.
    pub(crate) fn restore_urls(&mut self) {
        for (url, entry) in self.entries.iter_mut() {
            entry.url.clone_from(url);
        }
    }
}
