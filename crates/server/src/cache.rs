use log::debug;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// In-memory key/value cache whose entries expire after a per-insert TTL.
///
/// There is no capacity bound: entries leave only by expiry or overwrite.
/// Concurrent misses for the same key are not coalesced, each caller fetches.
pub struct TtlCache<K, V> {
    name: &'static str,
    entries: Mutex<HashMap<K, CacheEntry<V>>>,
}

impl<K: Eq + Hash + Debug, V: Clone> TtlCache<K, V> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<K, CacheEntry<V>>> {
        // entries are inserted whole, so a poisoned map is still consistent
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns the live value for `key`. Expired entries are dropped and reported as a miss.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let now = Instant::now();
        let mut entries = self.entries();
        let live = entries.get(key).map(|entry| entry.expires_at > now)?;
        if live {
            entries.get(key).map(|entry| entry.value.clone())
        } else {
            entries.remove(key);
            None
        }
    }

    pub fn insert(&self, key: K, value: V, ttl: Duration) {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.entries().insert(key, entry);
    }

    /// Read-through lookup: serves a live entry, otherwise awaits `fetch` and
    /// stores its value. Errors are handed back without touching the cache.
    pub async fn get_or_fetch<E, F, Fut>(&self, key: K, ttl: Duration, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key) {
            debug!("{} cache hit for {:?}", self.name, key);
            return Ok(value);
        }

        debug!("{} cache miss for {:?}", self.name, key);
        let value = fetch().await?;
        self.insert(key, value.clone(), ttl);
        Ok(value)
    }

    /// Drops every expired entry and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries().len()
    }
}
