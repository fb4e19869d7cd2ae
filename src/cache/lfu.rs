//! LFU Store Module
//!
//! Implements a byte-capacity-bounded store with Least Frequently Used
//! eviction. Ties within a frequency are broken by recency, oldest first.

use std::collections::{BTreeMap, HashMap};

use crate::cache::{CacheValue, EvictionCallback};

/// A stored value plus its access-frequency counter and recency tick.
#[derive(Debug, Clone)]
struct LfuEntry {
    value: CacheValue,
    freq: u64,
    tick: u64,
}

// == LFU Store ==
/// Capacity-bounded key-value store with LFU eviction.
///
/// Entries are grouped by frequency; each bucket is a tick-to-key index
/// where the lowest tick is the least recently touched member, so the
/// eviction victim (least-recent member of the lowest non-empty bucket)
/// is an index lookup, not a scan. `min_freq` tracks the lowest non-empty
/// bucket. An entry's frequency only increases, by exactly 1 per `get` or
/// re-`add`.
pub struct LfuStore {
    /// Key to value-plus-frequency storage
    entries: HashMap<String, LfuEntry>,
    /// Frequency buckets, each a recency index (lowest tick = oldest)
    buckets: HashMap<u64, BTreeMap<u64, String>>,
    /// Lowest frequency with a non-empty bucket
    min_freq: u64,
    /// Monotonic access counter
    tick: u64,
    /// Maximum total bytes allowed
    capacity: usize,
    /// Current total bytes stored
    used: usize,
    /// Callback fired for every capacity eviction
    on_evicted: Option<EvictionCallback>,
}

impl std::fmt::Debug for LfuStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LfuStore")
            .field("len", &self.entries.len())
            .field("capacity", &self.capacity)
            .field("used", &self.used)
            .field("min_freq", &self.min_freq)
            .finish()
    }
}

impl LfuStore {
    // == Constructor ==
    /// Creates a new empty LFU store with the given byte capacity.
    pub fn new(capacity: usize, on_evicted: Option<EvictionCallback>) -> Self {
        Self {
            entries: HashMap::new(),
            buckets: HashMap::new(),
            min_freq: 1,
            tick: 0,
            capacity,
            used: 0,
            on_evicted,
        }
    }

    // == Get ==
    /// Retrieves a value by key, incrementing its frequency on a hit.
    pub fn get(&mut self, key: &str) -> Option<CacheValue> {
        if !self.entries.contains_key(key) {
            return None;
        }
        self.bump(key);
        self.entries.get(key).map(|e| e.value.clone())
    }

    // == Add ==
    /// Inserts or replaces a value.
    ///
    /// Replacing an existing key bumps its frequency exactly like `get`.
    /// A new key enters at frequency 1, which unconditionally becomes the
    /// new minimum. A value whose size alone exceeds the capacity is never
    /// stored; the call is a no-op rather than an error.
    pub fn add(&mut self, key: &str, value: CacheValue) {
        if value.len() > self.capacity {
            return;
        }

        if self.entries.contains_key(key) {
            let old_len = self.entries[key].value.len();
            self.bump(key);
            self.used -= old_len;
            self.evict_to_fit(value.len(), Some(key));
            self.used += value.len();
            if let Some(entry) = self.entries.get_mut(key) {
                entry.value = value;
            }
        } else {
            self.evict_to_fit(value.len(), None);
            self.tick += 1;
            self.buckets
                .entry(1)
                .or_default()
                .insert(self.tick, key.to_string());
            self.used += value.len();
            self.entries.insert(
                key.to_string(),
                LfuEntry {
                    value,
                    freq: 1,
                    tick: self.tick,
                },
            );
            self.min_freq = 1;
        }
    }

    // == Bump ==
    /// Moves a key from its frequency bucket to the next one up, stamping
    /// it with a fresh recency tick.
    fn bump(&mut self, key: &str) {
        let Some(entry) = self.entries.get_mut(key) else {
            return;
        };
        let old_freq = entry.freq;

        if let Some(bucket) = self.buckets.get_mut(&old_freq) {
            bucket.remove(&entry.tick);
            if bucket.is_empty() {
                self.buckets.remove(&old_freq);
                if self.min_freq == old_freq {
                    self.min_freq = old_freq + 1;
                }
            }
        }

        entry.freq = old_freq + 1;
        self.tick += 1;
        entry.tick = self.tick;
        self.buckets
            .entry(entry.freq)
            .or_default()
            .insert(self.tick, key.to_string());
    }

    // == Evict To Fit ==
    /// Removes lowest-frequency entries until `incoming` bytes fit.
    ///
    /// `protect` shields the key currently being replaced from becoming its
    /// own eviction victim.
    fn evict_to_fit(&mut self, incoming: usize, protect: Option<&str>) {
        while self.used + incoming > self.capacity {
            if !self.evict_one(protect) {
                break;
            }
        }
    }

    /// Evicts the least-recent member of the lowest non-empty bucket.
    ///
    /// Returns false when no evictable entry remains.
    fn evict_one(&mut self, protect: Option<&str>) -> bool {
        let mut freqs: Vec<u64> = self.buckets.keys().copied().collect();
        freqs.sort_unstable();

        for freq in freqs {
            let Some(bucket) = self.buckets.get_mut(&freq) else {
                continue;
            };
            let Some(tick) = bucket
                .iter()
                .find(|(_, k)| Some(k.as_str()) != protect)
                .map(|(t, _)| *t)
            else {
                continue;
            };
            let Some(victim) = bucket.remove(&tick) else {
                continue;
            };
            if bucket.is_empty() {
                self.buckets.remove(&freq);
                self.min_freq = self.buckets.keys().copied().min().unwrap_or(1);
            }
            if let Some(entry) = self.entries.remove(&victim) {
                self.used -= entry.value.len();
                if let Some(cb) = self.on_evicted.as_mut() {
                    cb(&victim, &entry.value);
                }
            }
            return true;
        }
        false
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

    #[cfg(test)]
    fn freq_of(&self, key: &str) -> Option<u64> {
        self.entries.get(key).map(|e| e.freq)
    }
}
