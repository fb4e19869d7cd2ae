//! LRU Store Module
//!
//! Implements a byte-capacity-bounded store with Least Recently Used eviction.

use std::collections::{BTreeMap, HashMap};

use crate::cache::{CacheValue, EvictionCallback};

/// A stored value plus the recency tick of its last access.
#[derive(Debug, Clone)]
struct LruEntry {
    value: CacheValue,
    tick: u64,
}

// == LRU Store ==
/// Capacity-bounded key-value store with LRU eviction.
///
/// Recency is a monotonic tick: every access stamps the entry with the next
/// tick, and a sorted tick-to-key index keeps the oldest entry at the front.
/// Touch and evict are both index operations, not list scans.
///
/// Total stored bytes never exceed `capacity` after any operation. A single
/// value larger than the whole capacity is silently dropped on `add`.
pub struct LruStore {
    /// Key-value storage with per-entry recency ticks
    entries: HashMap<String, LruEntry>,
    /// Recency index: lowest tick = least recently used
    order: BTreeMap<u64, String>,
    /// Monotonic access counter
    tick: u64,
    /// Maximum total bytes allowed
    capacity: usize,
    /// Current total bytes stored
    used: usize,
    /// Callback fired for every capacity eviction
    on_evicted: Option<EvictionCallback>,
}

impl std::fmt::Debug for LruStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LruStore")
            .field("len", &self.entries.len())
            .field("capacity", &self.capacity)
            .field("used", &self.used)
            .finish()
    }
}

impl LruStore {
    // == Constructor ==
    /// Creates a new empty LRU store with the given byte capacity.
    pub fn new(capacity: usize, on_evicted: Option<EvictionCallback>) -> Self {
        Self {
            entries: HashMap::new(),
            order: BTreeMap::new(),
            tick: 0,
            capacity,
            used: 0,
            on_evicted,
        }
    }

    // == Get ==
    /// Retrieves a value by key, marking it most recently used on a hit.
    pub fn get(&mut self, key: &str) -> Option<CacheValue> {
        if !self.entries.contains_key(key) {
            return None;
        }
        self.touch(key);
        self.entries.get(key).map(|e| e.value.clone())
    }

    // == Add ==
    /// Inserts or replaces a value, evicting from the LRU end as needed.
    ///
    /// A value whose size alone exceeds the capacity is never stored; the
    /// call is a no-op rather than an error.
    pub fn add(&mut self, key: &str, value: CacheValue) {
        if value.len() > self.capacity {
            return;
        }

        if self.entries.contains_key(key) {
            // Replacement: refresh recency first so eviction cannot pick it
            self.touch(key);
            let old_len = self.entries[key].value.len();
            self.used -= old_len;
            self.evict_to_fit(value.len());
            self.used += value.len();
            if let Some(entry) = self.entries.get_mut(key) {
                entry.value = value;
            }
        } else {
            self.evict_to_fit(value.len());
            self.tick += 1;
            self.order.insert(self.tick, key.to_string());
            self.used += value.len();
            self.entries.insert(
                key.to_string(),
                LruEntry {
                    value,
                    tick: self.tick,
                },
            );
        }
    }

    // == Touch ==
    /// Marks a key as recently used (stamps it with the next tick).
    fn touch(&mut self, key: &str) {
        if let Some(entry) = self.entries.get_mut(key) {
            self.order.remove(&entry.tick);
            self.tick += 1;
            entry.tick = self.tick;
            self.order.insert(self.tick, key.to_string());
        }
    }

    // == Evict To Fit ==
    /// Removes least recently used entries until `incoming` bytes fit.
    fn evict_to_fit(&mut self, incoming: usize) {
        while self.used + incoming > self.capacity {
            let Some((_, victim)) = self.order.pop_first() else {
                break;
            };
            if let Some(entry) = self.entries.remove(&victim) {
                self.used -= entry.value.len();
                if let Some(cb) = self.on_evicted.as_mut() {
                    cb(&victim, &entry.value);
                }
            }
        }
    }

    // == Length ==
    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Used Bytes ==
    /// Returns the current total stored bytes.
    pub fn used_bytes(&self) -> usize {
        self.used
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_lru_new() {
        let store = LruStore::new(100, None);
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert_eq!(store.used_bytes(), 0);
    }

    #[test]
    fn test_lru_add_and_get() {
        let mut store = LruStore::new(100, None);

        store.add("key1", CacheValue::from("value1"));
        let value = store.get("key1").unwrap();

        assert_eq!(value.as_bytes(), b"value1");
        assert_eq!(store.used_bytes(), 6);
    }

    #[test]
    fn test_lru_get_miss() {
        let mut store = LruStore::new(100, None);
        assert!(store.get("nonexistent").is_none());
    }

    #[test]
    fn test_lru_capacity_scenario() {
        // Capacity 10 bytes: inserting three 4-byte values evicts the first
        let mut store = LruStore::new(10, None);

        store.add("a", CacheValue::from("aaaa"));
        store.add("b", CacheValue::from("bbbb"));
        store.add("c", CacheValue::from("cccc"));

        assert!(store.get("a").is_none());
        assert!(store.get("b").is_some());
        assert!(store.get("c").is_some());
        assert_eq!(store.len(), 2);
        assert_eq!(store.used_bytes(), 8);
    }

    #[test]
    fn test_lru_get_refreshes_recency() {
        let mut store = LruStore::new(12, None);

        store.add("a", CacheValue::from("aaaa"));
        store.add("b", CacheValue::from("bbbb"));
        store.add("c", CacheValue::from("cccc"));

        // Touch "a" so "b" becomes the eviction victim
        store.get("a").unwrap();
        store.add("d", CacheValue::from("dddd"));

        assert!(store.get("a").is_some());
        assert!(store.get("b").is_none());
        assert!(store.get("c").is_some());
        assert!(store.get("d").is_some());
    }

    #[test]
    fn test_lru_oversized_value_is_dropped() {
        let mut store = LruStore::new(4, None);

        store.add("big", CacheValue::from("too large"));

        assert!(store.get("big").is_none());
        assert_eq!(store.used_bytes(), 0);
    }

    #[test]
    fn test_lru_replace_same_key() {
        let mut store = LruStore::new(100, None);

        store.add("key1", CacheValue::from("old"));
        store.add("key1", CacheValue::from("newer"));

        assert_eq!(store.get("key1").unwrap().as_bytes(), b"newer");
        assert_eq!(store.len(), 1);
        assert_eq!(store.used_bytes(), 5);
    }

    #[test]
    fn test_lru_replace_grows_past_capacity() {
        let mut store = LruStore::new(10, None);

        store.add("a", CacheValue::from("aaaa"));
        store.add("b", CacheValue::from("bbbb"));

        // Growing "b" to 8 bytes forces "a" out
        store.add("b", CacheValue::from("bbbbbbbb"));

        assert!(store.get("a").is_none());
        assert_eq!(store.get("b").unwrap().len(), 8);
        assert_eq!(store.used_bytes(), 8);
    }

    #[test]
    fn test_lru_replace_only_entry_never_self_evicts() {
        let mut store = LruStore::new(10, None);

        store.add("a", CacheValue::from("aa"));
        store.add("a", CacheValue::from("aaaaaaaaaa"));

        assert_eq!(store.get("a").unwrap().len(), 10);
        assert_eq!(store.used_bytes(), 10);
    }

    #[test]
    fn test_lru_eviction_callback_fires() {
        let evicted = Arc::new(AtomicUsize::new(0));
        let counter = evicted.clone();
        let mut store = LruStore::new(
            8,
            Some(Box::new(move |_key, _value| {
                counter.fetch_add(1, Ordering::SeqCst);
            })),
        );

        store.add("a", CacheValue::from("aaaa"));
        store.add("b", CacheValue::from("bbbb"));
        store.add("c", CacheValue::from("cccc"));

        assert_eq!(evicted.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_lru_callback_not_fired_on_replacement() {
        let evicted = Arc::new(AtomicUsize::new(0));
        let counter = evicted.clone();
        let mut store = LruStore::new(
            100,
            Some(Box::new(move |_key, _value| {
                counter.fetch_add(1, Ordering::SeqCst);
            })),
        );

        store.add("a", CacheValue::from("one"));
        store.add("a", CacheValue::from("two"));

        assert_eq!(evicted.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_lru_order_index_stays_in_lockstep() {
        let mut store = LruStore::new(12, None);

        // Interleave adds, re-adds and gets, then verify eviction still
        // picks the least recently touched key
        store.add("a", CacheValue::from("aaaa"));
        store.add("b", CacheValue::from("bbbb"));
        store.get("a");
        store.add("b", CacheValue::from("bb"));
        store.add("c", CacheValue::from("cccc"));

        // Recency now oldest-first: a, b, c
        store.add("d", CacheValue::from("dddd"));

        assert!(store.get("a").is_none());
        assert!(store.get("b").is_some());
        assert!(store.get("c").is_some());
        assert!(store.get("d").is_some());
    }
}
