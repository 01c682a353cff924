//! Keyed stores backing sessions and the dropped-column cache

use crate::error::{PrepError, Result};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// String-keyed storage with explicit removal and expiry.
///
/// Object safe, so the registry and cache hold an `Arc<dyn KeyedStore<V>>`
/// and an external cache can stand in for [`MemoryStore`].
pub trait KeyedStore<V>: Send + Sync {
    /// Value under `key`, refreshing its last access.
    fn get(&self, key: &str) -> Result<Option<V>>;

    /// Value under `key`, inserting `init()` first when absent.
    fn get_or_insert_with(&self, key: &str, init: &dyn Fn() -> V) -> Result<V>;

    fn insert(&self, key: String, value: V) -> Result<()>;

    fn remove(&self, key: &str) -> Result<Option<V>>;

    fn len(&self) -> Result<usize>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Drop entries idle for longer than the store's TTL; returns how many.
    fn purge_expired(&self) -> Result<usize>;
}

struct Entry<V> {
    value: V,
    last_access: Instant,
}

/// In-process store with optional capacity and idle TTL.
///
/// Inserting a new key into a full store evicts the least recently
/// accessed entry. `None` for either limit disables it.
pub struct MemoryStore<V> {
    entries: Mutex<LruCache<String, Entry<V>>>,
    ttl: Option<Duration>,
}

impl<V> MemoryStore<V> {
    /// A capacity of `Some(0)` is treated as unbounded.
    pub fn new(capacity: Option<usize>, ttl: Option<Duration>) -> Self {
        let entries = match capacity.and_then(NonZeroUsize::new) {
            Some(capacity) => LruCache::new(capacity),
            None => LruCache::unbounded(),
        };
        Self {
            entries: Mutex::new(entries),
            ttl,
        }
    }

    /// No capacity limit and no expiry.
    pub fn unbounded() -> Self {
        Self::new(None, None)
    }

    fn lock(&self) -> Result<MutexGuard<'_, LruCache<String, Entry<V>>>> {
        self.entries.lock().map_err(PrepError::lock_poisoned)
    }

    fn is_expired(&self, entry: &Entry<V>, now: Instant) -> bool {
        self.ttl
            .is_some_and(|ttl| now.duration_since(entry.last_access) > ttl)
    }

    fn push(entries: &mut LruCache<String, Entry<V>>, key: String, entry: Entry<V>) {
        let replaced = entries.push(key.clone(), entry);
        if let Some((evicted, _)) = replaced.filter(|(evicted, _)| *evicted != key) {
            tracing::debug!("Evicted least recently used entry: {}", evicted);
        }
    }
}

impl<V: Clone + Send> KeyedStore<V> for MemoryStore<V> {
    fn get(&self, key: &str) -> Result<Option<V>> {
        let mut entries = self.lock()?;
        let now = Instant::now();

        let expired = match entries.peek(key) {
            Some(entry) => self.is_expired(entry, now),
            None => return Ok(None),
        };
        if expired {
            entries.pop(key);
            tracing::debug!("Dropped expired entry on access: {}", key);
            return Ok(None);
        }

        Ok(entries.get_mut(key).map(|entry| {
            entry.last_access = now;
            entry.value.clone()
        }))
    }

    fn get_or_insert_with(&self, key: &str, init: &dyn Fn() -> V) -> Result<V> {
        let mut entries = self.lock()?;
        let now = Instant::now();

        let live = entries
            .peek(key)
            .is_some_and(|entry| !self.is_expired(entry, now));
        if live {
            if let Some(entry) = entries.get_mut(key) {
                entry.last_access = now;
                return Ok(entry.value.clone());
            }
        }

        let value = init();
        Self::push(
            &mut entries,
            key.to_owned(),
            Entry {
                value: value.clone(),
                last_access: now,
            },
        );
        Ok(value)
    }

    fn insert(&self, key: String, value: V) -> Result<()> {
        let mut entries = self.lock()?;
        Self::push(
            &mut entries,
            key,
            Entry {
                value,
                last_access: Instant::now(),
            },
        );
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<Option<V>> {
        Ok(self.lock()?.pop(key).map(|entry| entry.value))
    }

    fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    fn purge_expired(&self) -> Result<usize> {
        if self.ttl.is_none() {
            return Ok(0);
        }
        let mut entries = self.lock()?;
        let now = Instant::now();
        let expired: Vec<String> = entries
            .iter()
            .filter(|(_, entry)| self.is_expired(entry, now))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &expired {
            entries.pop(key);
        }
        Ok(expired.len())
    }
}
