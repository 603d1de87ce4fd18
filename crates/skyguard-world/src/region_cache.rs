use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::region::RegionKey;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegionCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub entries: usize,
}

struct Slot<T> {
    value: Arc<T>,
    last_used: AtomicU64,
}

/// Shared LRU of per-region plans. Values are pure functions of their key,
/// so a racing double computation only costs time.
///
/// Hits only stamp the entry with a tick under the read lock. The least
/// recently stamped entry is found by a scan when an insert overflows.
pub struct RegionCache<T> {
    entries: RwLock<HashMap<RegionKey, Slot<T>>>,
    clock: AtomicU64,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl<T> RegionCache<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock: AtomicU64::new(0),
            capacity,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, key: &RegionKey) -> Option<Arc<T>> {
        if let Some(value) = self.lookup(key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Some(value);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Cached value for `key`, computing and inserting it on a miss.
    pub fn get_or_insert_with(&self, key: RegionKey, make: impl FnOnce() -> T) -> Arc<T> {
        if let Some(value) = self.get(&key) {
            return value;
        }
        let value = Arc::new(make());
        self.insert(key, Arc::clone(&value));
        value
    }

    pub fn insert(&self, key: RegionKey, value: Arc<T>) {
        if self.capacity == 0 {
            return;
        }
        let slot = Slot {
            value,
            last_used: AtomicU64::new(self.tick()),
        };
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key, slot);
        while entries.len() > self.capacity {
            let oldest = entries
                .iter()
                .min_by_key(|(_, slot)| slot.last_used.load(Ordering::Relaxed))
                .map(|(k, _)| *k);
            let Some(oldest) = oldest else { break };
            entries.remove(&oldest);
            self.evictions.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> RegionCacheStats {
        RegionCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            entries: self.entries.read().map(|m| m.len()).unwrap_or(0),
        }
    }

    pub fn invalidate_all(&self) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let evicted = entries.len() as u64;
        entries.clear();
        if evicted > 0 {
            self.evictions.fetch_add(evicted, Ordering::Relaxed);
        }
    }

    #[inline]
    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }

    fn lookup(&self, key: &RegionKey) -> Option<Arc<T>> {
        let entries = self.entries.read().ok()?;
        let slot = entries.get(key)?;
        slot.last_used.store(self.tick(), Ordering::Relaxed);
        Some(Arc::clone(&slot.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn hit_after_insert() {
        let cache = RegionCache::new(4);
        let calls = Cell::new(0);
        let k = RegionKey::new(0, 32);
        let a = cache.get_or_insert_with(k, || {
            calls.set(calls.get() + 1);
            7
        });
        let b = cache.get_or_insert_with(k, || {
            calls.set(calls.get() + 1);
            8
        });
        assert_eq!((*a, *b, calls.get()), (7, 7, 1));
        let s = cache.snapshot();
        assert_eq!((s.hits, s.misses, s.entries), (1, 1, 1));
    }

    #[test]
    fn evicts_least_recently_used() {
        let cache = RegionCache::new(2);
        let (a, b, c) = (RegionKey::new(0, 0), RegionKey::new(1, 0), RegionKey::new(2, 0));
        cache.insert(a, Arc::new('a'));
        cache.insert(b, Arc::new('b'));
        assert!(cache.get(&a).is_some());
        cache.insert(c, Arc::new('c'));
        assert!(cache.get(&b).is_none());
        assert!(cache.get(&a).is_some());
        assert!(cache.get(&c).is_some());
        assert_eq!(cache.snapshot().evictions, 1);
    }

    #[test]
    fn zero_capacity_always_recomputes() {
        let cache = RegionCache::new(0);
        let calls = Cell::new(0);
        for _ in 0..3 {
            cache.get_or_insert_with(RegionKey::new(5, 5), || calls.set(calls.get() + 1));
        }
        assert_eq!(calls.get(), 3);
        assert_eq!(cache.snapshot().entries, 0);
    }

    #[test]
    fn concurrent_hits_keep_recency() {
        let cache = RegionCache::new(3);
        let hot = RegionKey::new(0, 0);
        cache.insert(hot, Arc::new(0));
        cache.insert(RegionKey::new(1, 0), Arc::new(1));
        cache.insert(RegionKey::new(2, 0), Arc::new(2));

        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..250 {
                        assert!(cache.get(&hot).is_some());
                    }
                });
            }
        });
        assert_eq!(cache.snapshot().hits, 1000);

        // The hot key was touched last, so the next two inserts evict the others.
        cache.insert(RegionKey::new(3, 0), Arc::new(3));
        cache.insert(RegionKey::new(4, 0), Arc::new(4));
        assert!(cache.get(&hot).is_some());
        assert!(cache.get(&RegionKey::new(1, 0)).is_none());
        assert!(cache.get(&RegionKey::new(2, 0)).is_none());
        assert_eq!(cache.snapshot().evictions, 2);
    }

    #[test]
    fn invalidate_counts_evictions() {
        let cache = RegionCache::new(8);
        for i in 0..3 {
            cache.insert(RegionKey::new(i, i), Arc::new(i));
        }
        cache.invalidate_all();
        let s = cache.snapshot();
        assert_eq!((s.entries, s.evictions), (0, 3));
    }
}
