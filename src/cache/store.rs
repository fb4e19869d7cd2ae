//! Store Module
//!
//! Policy selection and dispatch over the interchangeable eviction stores.

use crate::cache::{CacheValue, EvictionCallback, LfuStore, LruStore};

// == Eviction Policy ==
/// The closed set of eviction policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionPolicy {
    Lru,
    Lfu,
}

impl EvictionPolicy {
    /// Parses a policy name.
    ///
    /// Unrecognized names fall back to LRU rather than failing.
    pub fn from_name(name: &str) -> Self {
        match name {
            "LFU" => EvictionPolicy::Lfu,
            _ => EvictionPolicy::Lru,
        }
    }
}

// == Store ==
/// A capacity-bounded store behind one `add`/`get` contract, with the
/// eviction policy chosen at construction.
#[derive(Debug)]
pub enum Store {
    Lru(LruStore),
    Lfu(LfuStore),
}

impl Store {
    // == Constructor ==
    /// Creates a store for the given policy and byte capacity.
    pub fn new(policy: EvictionPolicy, capacity: usize, on_evicted: Option<EvictionCallback>) -> Self {
        match policy {
            EvictionPolicy::Lru => Store::Lru(LruStore::new(capacity, on_evicted)),
            EvictionPolicy::Lfu => Store::Lfu(LfuStore::new(capacity, on_evicted)),
        }
    }

    // == Add ==
    /// Inserts or replaces a value.
    pub fn add(&mut self, key: &str, value: CacheValue) {
        match self {
            Store::Lru(store) => store.add(key, value),
            Store::Lfu(store) => store.add(key, value),
        }
    }

    // == Get ==
    /// Retrieves a value by key, updating the policy's bookkeeping on a hit.
    pub fn get(&mut self, key: &str) -> Option<CacheValue> {
        match self {
            Store::Lru(store) => store.get(key),
            Store::Lfu(store) => store.get(key),
        }
    }

    // == Length ==
    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        match self {
            Store::Lru(store) => store.len(),
            Store::Lfu(store) => store.len(),
        }
    }

    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // == Used Bytes ==
    /// Returns the current total stored bytes.
    pub fn used_bytes(&self) -> usize {
        match self {
            Store::Lru(store) => store.used_bytes(),
            Store::Lfu(store) => store.used_bytes(),
        }
    }
}
