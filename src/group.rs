//! Group Module
//!
//! The coordinator that ties the pieces together: check the local store,
//! collapse concurrent misses, route to the owning peer or fall back to the
//! caller-supplied loader, and populate the local store with the result.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::cache::{CacheValue, EvictionPolicy, Store};
use crate::error::{CacheError, Result};
use crate::peers::PeerPicker;
use crate::singleflight::FlightGroup;

// == Loader ==
/// The original backing data source behind a cache miss.
///
/// Invoked synchronously by the coordinator; errors stay opaque and are
/// surfaced to the caller as [`CacheError::Loader`].
pub trait Loader: Send + Sync {
    fn load(&self, key: &str) -> anyhow::Result<Vec<u8>>;
}

/// Plain closures double as loaders, so a data source can be supplied
/// without a dedicated type.
impl<F> Loader for F
where
    F: Fn(&str) -> anyhow::Result<Vec<u8>> + Send + Sync,
{
    fn load(&self, key: &str) -> anyhow::Result<Vec<u8>> {
        self(key)
    }
}

// == Group Stats ==
/// Per-group performance counters.
#[derive(Debug, Default)]
struct GroupStats {
    gets: AtomicU64,
    hits: AtomicU64,
    local_loads: AtomicU64,
    peer_loads: AtomicU64,
    peer_errors: AtomicU64,
}

/// Point-in-time view of a group's counters and store occupancy.
#[derive(Debug, Clone, Copy)]
pub struct GroupStatsSnapshot {
    pub gets: u64,
    pub hits: u64,
    pub local_loads: u64,
    pub peer_loads: u64,
    pub peer_errors: u64,
    pub evictions: u64,
    pub entries: usize,
    pub used_bytes: usize,
}

// == Group ==
/// One named cache namespace: a bounded local store, a deduplication table
/// and a loader, with an optional peer-routing capability registered later.
pub struct Group {
    /// Group name, also the namespace on the peer wire
    name: String,
    /// Backing data source for keys this process must load itself
    loader: Arc<dyn Loader>,
    /// Local store; one coarse lock covers add and get
    store: Mutex<Store>,
    /// Peer routing, registered once; repeats are ignored
    peers: OnceLock<Arc<dyn PeerPicker>>,
    /// In-flight load table
    flights: FlightGroup<CacheValue>,
    /// Performance counters
    stats: GroupStats,
    /// Eviction count, shared with the store's eviction callback
    evictions: Arc<AtomicU64>,
}

impl std::fmt::Debug for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Group").field("name", &self.name).finish()
    }
}

impl Group {
    fn new(name: &str, policy: EvictionPolicy, capacity: usize, loader: Arc<dyn Loader>) -> Self {
        let evictions = Arc::new(AtomicU64::new(0));
        let counter = evictions.clone();
        let store = Store::new(
            policy,
            capacity,
            Some(Box::new(move |_key, _value| {
                counter.fetch_add(1, Ordering::Relaxed);
            })),
        );
        Self {
            name: name.to_string(),
            loader,
            store: Mutex::new(store),
            peers: OnceLock::new(),
            flights: FlightGroup::new(),
            stats: GroupStats::default(),
            evictions,
        }
    }

    /// Returns the group name.
    pub fn name(&self) -> &str {
        &self.name
    }

    // == Register Peers ==
    /// Registers the peer-routing capability.
    ///
    /// Only the first registration takes effect.
    pub fn register_peers(&self, picker: Arc<dyn PeerPicker>) {
        if self.peers.set(picker).is_err() {
            warn!(group = %self.name, "peer picker already registered, ignoring");
        }
    }

    // == Get ==
    /// Retrieves the value for `key`, loading it on a local miss.
    ///
    /// Empty keys are rejected before the store or the dedup table is
    /// touched. A hit returns immediately; a miss enters the deduplicated
    /// load path.
    pub async fn get(&self, key: &str) -> Result<CacheValue> {
        if key.is_empty() {
            return Err(CacheError::EmptyKey);
        }
        self.stats.gets.fetch_add(1, Ordering::Relaxed);

        if let Some(value) = self.store.lock().await.get(key) {
            self.stats.hits.fetch_add(1, Ordering::Relaxed);
            debug!(group = %self.name, key, "cache hit");
            return Ok(value);
        }

        self.load(key).await
    }

    // == Load ==
    /// Deduplicated miss path: route to the owning peer when one exists,
    /// fall back to the local loader on peer failure or local ownership.
    async fn load(&self, key: &str) -> Result<CacheValue> {
        self.flights
            .run(key, || async {
                if let Some(picker) = self.peers.get() {
                    if let Some(peer) = picker.pick_peer(key) {
                        match peer.fetch(&self.name, key).await {
                            Ok(bytes) => {
                                self.stats.peer_loads.fetch_add(1, Ordering::Relaxed);
                                // The owning peer already caches this value;
                                // duplicating it locally would defeat routing
                                // by key ownership.
                                return Ok(CacheValue::from(bytes));
                            }
                            Err(err) => {
                                self.stats.peer_errors.fetch_add(1, Ordering::Relaxed);
                                warn!(
                                    group = %self.name, key, %err,
                                    "peer fetch failed, falling back to local loader"
                                );
                            }
                        }
                    }
                }
                self.load_locally(key).await
            })
            .await
    }

    // == Load Locally ==
    /// Invokes the loader and populates the local store with a copy of the
    /// result. Loader errors are not cached; a later call retries.
    async fn load_locally(&self, key: &str) -> Result<CacheValue> {
        let bytes = self
            .loader
            .load(key)
            .map_err(|err| CacheError::Loader(err.to_string()))?;
        // Copy: the loader may still own the buffer it handed back
        let value = CacheValue::new(&bytes);
        self.stats.local_loads.fetch_add(1, Ordering::Relaxed);
        self.store.lock().await.add(key, value.clone());
        Ok(value)
    }

    // == Stats ==
    /// Returns a snapshot of the group's counters and store occupancy.
    pub async fn stats(&self) -> GroupStatsSnapshot {
        let store = self.store.lock().await;
        GroupStatsSnapshot {
            gets: self.stats.gets.load(Ordering::Relaxed),
            hits: self.stats.hits.load(Ordering::Relaxed),
            local_loads: self.stats.local_loads.load(Ordering::Relaxed),
            peer_loads: self.stats.peer_loads.load(Ordering::Relaxed),
            peer_errors: self.stats.peer_errors.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            entries: store.len(),
            used_bytes: store.used_bytes(),
        }
    }
}

// == Group Registry ==
/// Name-to-group mapping, write-once per name.
///
/// Constructed once at process start and passed by reference instead of
/// living in ambient global state.
#[derive(Debug, Default)]
pub struct GroupRegistry {
    groups: RwLock<HashMap<String, Arc<Group>>>,
}

impl GroupRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    // == Create Group ==
    /// Creates and registers a group.
    ///
    /// Fails on an empty name, a zero capacity, or a name that is already
    /// registered.
    pub fn create_group(
        &self,
        name: &str,
        policy: EvictionPolicy,
        capacity: usize,
        loader: Arc<dyn Loader>,
    ) -> Result<Arc<Group>> {
        if name.is_empty() {
            return Err(CacheError::InvalidConfig(
                "group name is required".to_string(),
            ));
        }
        if capacity == 0 {
            return Err(CacheError::InvalidConfig(
                "cache capacity must be non-zero".to_string(),
            ));
        }

        let mut groups = self
            .groups
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if groups.contains_key(name) {
            return Err(CacheError::GroupExists(name.to_string()));
        }

        let group = Arc::new(Group::new(name, policy, capacity, loader));
        groups.insert(name.to_string(), group.clone());
        info!(group = name, ?policy, capacity, "group registered");
        Ok(group)
    }

    // == Get Group ==
    /// Looks up a group by name.
    pub fn get_group(&self, name: &str) -> Option<Arc<Group>> {
        self.groups
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }
}
