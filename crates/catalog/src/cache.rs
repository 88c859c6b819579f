//! Time-bounded memoization of metadata lookups.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::metadata::{BookMetadata, BookMetadataLookup};

#[derive(Debug, Clone)]
struct CacheEntry {
    stored_at: Instant,
    value: Option<BookMetadata>,
}

/// Caches another lookup by trimmed keyword.
///
/// "No match" is cached like a hit, so a keyword the catalog does not know is
/// not asked again until the entry expires. Expired entries are evicted
/// whenever a new result is stored.
pub struct CachedMetadataLookup {
    inner: Arc<dyn BookMetadataLookup>,
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl CachedMetadataLookup {
    pub fn new(inner: Arc<dyn BookMetadataLookup>, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    async fn fresh(&self, key: &str) -> Option<Option<BookMetadata>> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| entry.value.clone())
    }
}

#[async_trait]
impl BookMetadataLookup for CachedMetadataLookup {
    async fn lookup(&self, keyword: &str) -> Option<BookMetadata> {
        let key = keyword.trim();
        if key.is_empty() {
            return None;
        }

        if let Some(value) = self.fresh(key).await {
            debug!("Metadata cache hit for '{}'", key);
            return value;
        }

        let value = self.inner.lookup(key).await;
        let mut entries = self.entries.write().await;
        let ttl = self.ttl;
        entries.retain(|_, entry| entry.stored_at.elapsed() < ttl);
        entries.insert(
            key.to_string(),
            CacheEntry {
                stored_at: Instant::now(),
                value: value.clone(),
            },
        );
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts calls; knows only one title.
    #[derive(Default)]
    struct CountingLookup {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl BookMetadataLookup for CountingLookup {
        async fn lookup(&self, keyword: &str) -> Option<BookMetadata> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (keyword == "こころ").then(|| BookMetadata {
                title: Some("こころ".to_string()),
                ..Default::default()
            })
        }
    }

    fn cached(ttl: Duration) -> (Arc<CountingLookup>, CachedMetadataLookup) {
        let inner = Arc::new(CountingLookup::default());
        let cache = CachedMetadataLookup::new(inner.clone(), ttl);
        (inner, cache)
    }

    #[tokio::test]
    async fn test_hits_are_cached() {
        let (inner, cache) = cached(Duration::from_secs(60));

        let first = cache.lookup("こころ").await;
        let second = cache.lookup(" こころ ").await;

        assert_eq!(first, second);
        assert_eq!(first.and_then(|b| b.title).as_deref(), Some("こころ"));
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_misses_are_cached() {
        let (inner, cache) = cached(Duration::from_secs(60));

        assert_eq!(cache.lookup("unknown").await, None);
        assert_eq!(cache.lookup("unknown").await, None);
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expired_entries_are_refreshed() {
        let (inner, cache) = cached(Duration::ZERO);

        cache.lookup("こころ").await;
        cache.lookup("こころ").await;

        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_expired_entries_are_evicted_on_store() {
        let (inner, cache) = cached(Duration::ZERO);

        for i in 0..100 {
            cache.lookup(&format!("keyword {}", i)).await;
        }

        assert_eq!(inner.calls.load(Ordering::SeqCst), 100);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_fresh_entries_survive_eviction() {
        let (_inner, cache) = cached(Duration::from_secs(60));

        cache.lookup("a").await;
        cache.lookup("b").await;

        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test]
    async fn test_empty_keyword_is_not_looked_up() {
        let (inner, cache) = cached(Duration::from_secs(60));

        assert_eq!(cache.lookup("  ").await, None);
        assert_eq!(inner.calls.load(Ordering::SeqCst), 0);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_clear() {
        let (inner, cache) = cached(Duration::from_secs(60));

        cache.lookup("こころ").await;
        cache.clear().await;
        cache.lookup("こころ").await;

        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }
}
