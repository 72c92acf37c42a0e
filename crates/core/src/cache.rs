//! In-memory LRU+TTL cache for search replies.
//!
//! Keys are normalized query strings, so queries differing only by case or
//! whitespace share one entry. Values are fully formatted tool replies;
//! error-tagged replies are never stored. Expired entries are purged on
//! every `get`/`set`/`size`, not merely skipped, so the store never holds
//! an entry older than the TTL after any successful call.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// A finished tool reply, as returned to the MCP caller.
///
/// `is_error` is the tag callers use to distinguish failures; it is also
/// what keeps error replies out of the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolReply {
    pub text: String,
    pub is_error: bool,
}

impl ToolReply {
    pub fn success(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_error: false }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_error: true }
    }
}

/// A single cached reply.
#[derive(Debug, Clone)]
struct CacheEntry {
    reply: ToolReply,
    inserted_at: Instant,
    /// Recency marker; higher means more recently used.
    seq: u64,
}

/// Bounded, TTL-aware memoization of search replies.
///
/// Recency is tracked with a monotonic sequence counter over a `HashMap`;
/// the LRU victim is the entry with the smallest sequence number. The purge
/// sweep is O(current size), which is fine at this cache's bounded scale.
#[derive(Debug)]
pub struct SearchCache {
    store: HashMap<String, CacheEntry>,
    enabled: bool,
    max_entries: usize,
    ttl: Duration,
    seq_counter: u64,
}

impl SearchCache {
    pub fn new(enabled: bool, max_entries: usize, ttl: Duration) -> Self {
        Self { store: HashMap::new(), enabled, max_entries, ttl, seq_counter: 0 }
    }

    /// Normalize a raw query into its cache key: lowercased, trimmed,
    /// internal whitespace runs collapsed to single spaces.
    pub fn normalize_key(query: &str) -> String {
        query.to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Look up a reply for `query`, refreshing its recency position on a hit.
    ///
    /// Expired entries (including the requested one) are purged first.
    /// Always misses when the cache is disabled.
    pub fn get(&mut self, query: &str) -> Option<ToolReply> {
        if !self.enabled {
            return None;
        }
        self.purge_expired();

        let key = Self::normalize_key(query);
        let seq = self.next_seq();
        let entry = self.store.get_mut(&key)?;
        entry.seq = seq;
        Some(entry.reply.clone())
    }

    /// Store a reply under the normalized key, timestamped now.
    ///
    /// No-op for error-tagged replies and when the cache is disabled.
    /// Re-inserting an existing key resets its recency and age. Evicts the
    /// least-recently-used entry when over capacity.
    pub fn set(&mut self, query: &str, reply: &ToolReply) {
        if !self.enabled || reply.is_error {
            return;
        }
        self.purge_expired();

        let key = Self::normalize_key(query);
        self.store.remove(&key);
        let seq = self.next_seq();
        self.store
            .insert(key, CacheEntry { reply: reply.clone(), inserted_at: Instant::now(), seq });

        if self.store.len() > self.max_entries
            && let Some(oldest) = self
                .store
                .iter()
                .min_by_key(|(_, e)| e.seq)
                .map(|(k, _)| k.clone())
        {
            tracing::debug!(key = %oldest, "evicting least-recently-used cache entry");
            self.store.remove(&oldest);
        }
    }

    /// Number of live entries, after purging expired ones.
    pub fn size(&mut self) -> usize {
        self.purge_expired();
        self.store.len()
    }

    /// Drop all entries unconditionally.
    pub fn clear(&mut self) {
        self.store.clear();
    }

    fn purge_expired(&mut self) {
        let now = Instant::now();
        self.store
            .retain(|_, entry| now.duration_since(entry.inserted_at) < self.ttl);
    }

    fn next_seq(&mut self) -> u64 {
        self.seq_counter += 1;
        self.seq_counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(60);

    fn cache(max_entries: usize) -> SearchCache {
        SearchCache::new(true, max_entries, TTL)
    }

    #[test]
    fn test_key_normalization() {
        assert_eq!(SearchCache::normalize_key("  Latest   AI   News  "), "latest ai news");
        assert_eq!(SearchCache::normalize_key("latest ai news"), "latest ai news");
        assert_eq!(SearchCache::normalize_key("LATEST\tAI\nNEWS"), "latest ai news");
    }

    #[test]
    fn test_case_and_whitespace_variants_share_an_entry() {
        let mut cache = cache(10);
        cache.set("Latest AI News", &ToolReply::success("cached"));

        assert!(cache.get("latest ai news").is_some());
        assert!(cache.get("  LATEST   AI   NEWS  ").is_some());
        assert_eq!(cache.size(), 1);
    }

    #[test]
    fn test_miss_on_unknown_key() {
        let mut cache = cache(10);
        assert!(cache.get("nothing here").is_none());
    }

    #[test]
    fn test_ttl_expiry() {
        let mut cache = SearchCache::new(true, 10, Duration::from_millis(40));
        cache.set("query", &ToolReply::success("cached"));
        assert!(cache.get("query").is_some());

        std::thread::sleep(Duration::from_millis(60));
        assert!(cache.get("query").is_none());
        // Expired entries are purged, not just skipped.
        assert_eq!(cache.size(), 0);
    }

    #[test]
    fn test_ttl_expiry_survives_reads_of_other_keys() {
        let mut cache = SearchCache::new(true, 10, Duration::from_millis(40));
        cache.set("short lived", &ToolReply::success("a"));

        std::thread::sleep(Duration::from_millis(60));
        cache.set("fresh", &ToolReply::success("b"));
        assert!(cache.get("fresh").is_some());
        assert!(cache.get("short lived").is_none());
    }

    #[test]
    fn test_lru_eviction_order() {
        let mut cache = cache(3);
        cache.set("first", &ToolReply::success("1"));
        cache.set("second", &ToolReply::success("2"));
        cache.set("third", &ToolReply::success("3"));
        cache.set("fourth", &ToolReply::success("4"));

        assert!(cache.get("first").is_none());
        assert!(cache.get("second").is_some());
        assert!(cache.get("third").is_some());
        assert!(cache.get("fourth").is_some());
        assert_eq!(cache.size(), 3);
    }

    #[test]
    fn test_get_refreshes_recency() {
        let mut cache = cache(2);
        cache.set("a", &ToolReply::success("1"));
        cache.set("b", &ToolReply::success("2"));

        // Touch "a" so "b" becomes the LRU victim.
        assert!(cache.get("a").is_some());
        cache.set("c", &ToolReply::success("3"));

        assert!(cache.get("a").is_some());
        assert!(cache.get("b").is_none());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn test_reinsert_resets_recency() {
        let mut cache = cache(2);
        cache.set("a", &ToolReply::success("1"));
        cache.set("b", &ToolReply::success("2"));
        cache.set("a", &ToolReply::success("1 again"));
        cache.set("c", &ToolReply::success("3"));

        assert!(cache.get("b").is_none());
        assert_eq!(cache.get("a").unwrap().text, "1 again");
    }

    #[test]
    fn test_error_replies_are_never_cached() {
        let mut cache = cache(10);
        cache.set("failed query", &ToolReply::error("[web_search error: request timed out]"));
        assert_eq!(cache.size(), 0);
        assert!(cache.get("failed query").is_none());
    }

    #[test]
    fn test_disabled_cache_is_a_pass_through() {
        let mut cache = SearchCache::new(false, 10, TTL);
        cache.set("query", &ToolReply::success("cached"));
        assert!(cache.get("query").is_none());
    }

    #[test]
    fn test_clear() {
        let mut cache = cache(10);
        cache.set("a", &ToolReply::success("1"));
        cache.set("b", &ToolReply::success("2"));
        cache.clear();
        assert_eq!(cache.size(), 0);
    }
}
