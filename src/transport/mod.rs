//! Transport Module
//!
//! The default HTTP implementation of the peer capabilities: a ring-backed
//! picker and a per-peer HTTP client. Any RPC mechanism preserving the
//! group+key-to-bytes contract could replace this module.

pub mod client;
pub mod pool;

pub use client::HttpFetcher;
pub use pool::{HttpPool, PEER_BASE_PATH};
