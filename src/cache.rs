//! Fixed-TTL cache with tag-based invalidation.
//!
//! Backs the Instagram feed proxy: reads go through the cache, entries
//! expire after a fixed TTL, and the webhook invalidates everything
//! carrying a tag. Eventually consistent; a stale-read window up to the
//! TTL is accepted.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

struct Entry {
    value: serde_json::Value,
    inserted: Instant,
    tags: Vec<String>,
}

/// Shared read-through cache keyed by string, invalidated by tag.
pub struct TagCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, Entry>>,
}

impl TagCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Get an unexpired entry. Expired entries are treated as absent and
    /// left for the next insert to overwrite.
    pub async fn get(&self, key: &str) -> Option<serde_json::Value> {
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;
        if entry.inserted.elapsed() >= self.ttl {
            return None;
        }
        Some(entry.value.clone())
    }

    /// Insert a value under the given tags, resetting its TTL.
    pub async fn insert(&self, key: &str, value: serde_json::Value, tags: &[&str]) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            Entry {
                value,
                inserted: Instant::now(),
                tags: tags.iter().map(|t| t.to_string()).collect(),
            },
        );
    }

    /// Remove every entry carrying the given tag.
    ///
    /// Returns the number of entries removed.
    pub async fn invalidate_tag(&self, tag: &str) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.tags.iter().any(|t| t == tag));
        before - entries.len()
    }
}
