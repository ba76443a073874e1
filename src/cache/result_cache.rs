//! Result Cache
//!
//! TTL-bound cache of computed envelopes over a [`DocumentStore`]
//! collection. Hits are served verbatim except for the cache-hit flag.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::cache::{CacheEntry, CacheStats};
use crate::models::{ChartEnvelope, ExtrasEnvelope};
use crate::store::{current_timestamp_ms, DocumentStore, StoreError, StoredDocument};

/// Lifetime of a cached result
pub const RESULT_TTL: Duration = Duration::from_secs(2 * 24 * 60 * 60);

// == Cached Envelope ==
/// A response envelope that carries a cache-hit flag.
pub trait CachedEnvelope: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    fn set_cached(&mut self, cached: bool);
}

impl CachedEnvelope for ChartEnvelope {
    fn set_cached(&mut self, cached: bool) {
        self.meta.cached = cached;
    }
}

impl CachedEnvelope for ExtrasEnvelope {
    fn set_cached(&mut self, cached: bool) {
        self.meta.cached = cached;
    }
}

// == Result Cache ==
pub struct ResultCache<E> {
    store: Arc<dyn DocumentStore>,
    collection: &'static str,
    ttl: Duration,
    stats: Arc<Mutex<CacheStats>>,
    _envelope: PhantomData<fn() -> E>,
}

impl<E> Clone for ResultCache<E> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            collection: self.collection,
            ttl: self.ttl,
            stats: Arc::clone(&self.stats),
            _envelope: PhantomData,
        }
    }
}

impl<E: CachedEnvelope> ResultCache<E> {
    pub fn new(store: Arc<dyn DocumentStore>, collection: &'static str) -> Self {
        Self::with_ttl(store, collection, RESULT_TTL)
    }

    pub fn with_ttl(
        store: Arc<dyn DocumentStore>,
        collection: &'static str,
        ttl: Duration,
    ) -> Self {
        Self {
            store,
            collection,
            ttl,
            stats: Arc::new(Mutex::new(CacheStats::new())),
            _envelope: PhantomData,
        }
    }

    pub fn collection(&self) -> &'static str {
        self.collection
    }

    // == Lookup ==
    /// Returns the cached envelope with `cached = true`, if present and fresh.
    ///
    /// Expired entries are deleted on a best-effort basis. Only a failing
    /// read of the store is returned as an error.
    pub async fn lookup(&self, key: &str) -> Result<Option<E>, StoreError> {
        self.lookup_at(key, current_timestamp_ms()).await
    }

    pub async fn lookup_at(&self, key: &str, now_ms: u64) -> Result<Option<E>, StoreError> {
        let Some(doc) = self.store.get(self.collection, key).await? else {
            self.stats.lock().await.record_miss();
            return Ok(None);
        };

        let entry: CacheEntry<E> = match doc.decode() {
            Ok(entry) => entry,
            Err(err) => {
                warn!(collection = self.collection, key, error = %err, "Unreadable cache entry");
                self.stats.lock().await.record_miss();
                return Ok(None);
            }
        };

        if entry.is_expired_at(now_ms) {
            debug!(collection = self.collection, key, "Cache entry expired");
            self.stats.lock().await.record_expired();
            if let Err(err) = self.store.delete(self.collection, key).await {
                warn!(
                    collection = self.collection,
                    key,
                    error = %err,
                    "Failed to delete expired entry"
                );
            }
            return Ok(None);
        }

        self.stats.lock().await.record_hit();
        let mut envelope = entry.response;
        envelope.set_cached(true);
        Ok(Some(envelope))
    }

    // == Store ==
    /// Persists a copy of `envelope` with `cached = true`, replacing any
    /// previous entry under `key`.
    pub async fn store(&self, key: &str, envelope: &E) -> Result<(), StoreError> {
        self.store_at(key, envelope, current_timestamp_ms()).await
    }

    pub async fn store_at(&self, key: &str, envelope: &E, now_ms: u64) -> Result<(), StoreError> {
        let mut copy = envelope.clone();
        copy.set_cached(true);

        let ttl_ms = self.ttl.as_millis() as u64;
        let entry = CacheEntry::new(copy, now_ms, ttl_ms);
        let doc = StoredDocument::from_value(&entry, now_ms, Some(self.ttl))?;

        match self.store.set(self.collection, key, doc).await {
            Ok(()) => {
                self.stats.lock().await.record_write();
                Ok(())
            }
            Err(err) => {
                self.stats.lock().await.record_write_failure();
                Err(err)
            }
        }
    }

    /// Stores in a detached task. Failures are logged, never returned.
    pub fn store_detached(&self, key: String, envelope: E) {
        let cache = self.clone();
        tokio::spawn(async move {
            if let Err(err) = cache.store(&key, &envelope).await {
                warn!(collection = cache.collection, key = %key, error = %err, "Cache write failed");
            }
        });
    }

    // == Stats ==
    pub async fn stats(&self) -> CacheStats {
        self.stats.lock().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, TxnFn, TxnOutcome};
    use async_trait::async_trait;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Envelope {
        value: u32,
        cached: bool,
    }

    impl CachedEnvelope for Envelope {
        fn set_cached(&mut self, cached: bool) {
            self.cached = cached;
        }
    }

    /// Store whose reads work but whose writes and deletes fail.
    struct ReadOnlyStore(MemoryStore);

    #[async_trait]
    impl DocumentStore for ReadOnlyStore {
        async fn get(
            &self,
            collection: &str,
            id: &str,
        ) -> Result<Option<StoredDocument>, StoreError> {
            self.0.get(collection, id).await
        }

        async fn set(
            &self,
            _collection: &str,
            _id: &str,
            _doc: StoredDocument,
        ) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("read only".into()))
        }

        async fn delete(&self, _collection: &str, _id: &str) -> Result<bool, StoreError> {
            Err(StoreError::Unavailable("read only".into()))
        }

        async fn transact(
            &self,
            _collection: &str,
            _id: &str,
            _txn: TxnFn,
        ) -> Result<TxnOutcome, StoreError> {
            Err(StoreError::Unavailable("read only".into()))
        }

        async fn purge_expired(&self, _now_ms: u64) -> Result<usize, StoreError> {
            Ok(0)
        }

        async fn len(&self) -> usize {
            self.0.len().await
        }
    }

    fn fresh() -> Envelope {
        Envelope {
            value: 7,
            cached: false,
        }
    }

    #[tokio::test]
    async fn test_lookup_after_store_is_cached() {
        let cache = ResultCache::new(Arc::new(MemoryStore::new()), "charts");
        let original = fresh();

        cache.store("k", &original).await.unwrap();
        let hit = cache.lookup("k").await.unwrap().unwrap();

        assert!(hit.cached);
        assert_eq!(hit.value, 7);
        assert!(!original.cached);
    }

    #[tokio::test]
    async fn test_miss_on_absent_key() {
        let cache: ResultCache<Envelope> =
            ResultCache::new(Arc::new(MemoryStore::new()), "charts");
        assert!(cache.lookup("missing").await.unwrap().is_none());
        assert_eq!(cache.stats().await.misses, 1);
    }

    #[tokio::test]
    async fn test_expired_entry_is_absent_and_deleted() {
        let store = Arc::new(MemoryStore::new());
        let cache = ResultCache::with_ttl(store.clone(), "charts", Duration::from_secs(60));

        cache.store_at("k", &fresh(), 1_000).await.unwrap();
        assert!(cache.lookup_at("k", 60_999).await.unwrap().is_some());
        assert!(cache.lookup_at("k", 61_000).await.unwrap().is_none());
        assert!(store.get("charts", "k").await.unwrap().is_none());

        let stats = cache.stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.expired, 1);
    }

    #[tokio::test]
    async fn test_default_ttl_is_two_days() {
        let cache = ResultCache::new(Arc::new(MemoryStore::new()), "charts");
        cache.store_at("k", &fresh(), 0).await.unwrap();

        let two_days_ms = 2 * 24 * 60 * 60 * 1000;
        assert!(cache.lookup_at("k", two_days_ms - 1).await.unwrap().is_some());
        assert!(cache.lookup_at("k", two_days_ms).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_store_overwrites() {
        let cache = ResultCache::new(Arc::new(MemoryStore::new()), "charts");
        cache.store("k", &fresh()).await.unwrap();
        cache
            .store("k", &Envelope { value: 9, cached: false })
            .await
            .unwrap();

        assert_eq!(cache.lookup("k").await.unwrap().unwrap().value, 9);
        assert_eq!(cache.stats().await.writes, 2);
    }

    #[tokio::test]
    async fn test_failed_delete_does_not_fail_lookup() {
        let inner = MemoryStore::new();
        let entry = CacheEntry::new(fresh(), 0, 10);
        inner
            .set("charts", "k", StoredDocument::from_value(&entry, 0, None).unwrap())
            .await
            .unwrap();
        let cache: ResultCache<Envelope> =
            ResultCache::new(Arc::new(ReadOnlyStore(inner)), "charts");

        assert!(cache.lookup_at("k", 100).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_write_failure_is_counted() {
        let cache = ResultCache::new(Arc::new(ReadOnlyStore(MemoryStore::new())), "charts");
        assert!(cache.store("k", &fresh()).await.is_err());
        assert_eq!(cache.stats().await.write_failures, 1);
    }

    #[tokio::test]
    async fn test_unreadable_entry_is_a_miss() {
        let store = Arc::new(MemoryStore::new());
        store
            .set("charts", "k", StoredDocument::new(serde_json::json!("garbage"), None))
            .await
            .unwrap();
        let cache: ResultCache<Envelope> = ResultCache::new(store, "charts");

        assert!(cache.lookup("k").await.unwrap().is_none());
    }
}
