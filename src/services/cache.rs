//! Short-TTL memoization for expensive fetches.
//!
//! One shared instance fronts the live scraper; a single key covers
//! the whole scraped table so the TTL amortizes one fetch across many
//! queries. Expiry is checked on read, never swept proactively.
//! Concurrent misses may both run the fetch; the scrape is idempotent
//! so the last write simply replaces the entry whole.

use crate::error::Result;
use std::collections::HashMap;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

struct CacheEntry<V> {
    value: V,
    created_at: Instant,
}

pub struct TtlCache<V> {
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Return the fresh cached value for `key`, or run `fetch` and
    /// cache its result.
    ///
    /// A failed fetch caches nothing and propagates the error; an
    /// expired entry is never served in its place.
    pub async fn get_or_fetch<F, Fut>(&self, key: &str, fetch: F) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(key) {
                if entry.created_at.elapsed() < self.ttl {
                    return Ok(entry.value.clone());
                }
            }
        }

        let value = fetch().await?;

        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            CacheEntry {
                value: value.clone(),
                created_at: Instant::now(),
            },
        );
        Ok(value)
    }
}
