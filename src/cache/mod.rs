//! Cache Module
//!
//! Capacity-bounded in-memory stores with pluggable eviction (LRU or LFU).

mod lfu;
mod lru;
mod store;
mod value;


// Re-export public types
pub use lfu::LfuStore;
pub use lru::LruStore;
pub use store::{EvictionPolicy, Store};
pub use value::CacheValue;

// == Eviction Callback ==
/// Fired synchronously for every entry removed under capacity pressure.
///
/// Not fired when a key is explicitly replaced in place.
pub type EvictionCallback = Box<dyn FnMut(&str, &CacheValue) + Send>;
