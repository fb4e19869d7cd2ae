//! Mesh Cache - A distributed, look-aside, in-process cache
//!
//! Each process holds a bounded local cache behind a pluggable eviction
//! policy (LRU or LFU); peers cooperate via consistent hashing so every key
//! is owned by exactly one process, and concurrent identical loads collapse
//! into a single execution.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod group;
pub mod models;
pub mod peers;
pub mod ring;
pub mod singleflight;
pub mod transport;

pub use api::AppState;
pub use cache::{CacheValue, EvictionPolicy};
pub use config::Config;
pub use error::CacheError;
pub use group::{Group, GroupRegistry, Loader};
pub use transport::HttpPool;
