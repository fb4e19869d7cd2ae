//! Peer Capability Module
//!
//! The two seams the group coordinator consults for remote ownership:
//! picking the peer that owns a key, and fetching a value from it. Any
//! transport that preserves the group+key-to-bytes contract can stand in.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::Result;

/// Boxed future returned by [`PeerFetcher::fetch`], keeping the trait
/// object-safe.
pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>>;

// == Peer Picker ==
/// Resolves which peer owns a key.
pub trait PeerPicker: Send + Sync {
    /// Returns the fetcher for the owning peer, or None when the key is
    /// owned by the local process or no peers are registered.
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerFetcher>>;
}

// == Peer Fetcher ==
/// Retrieves a value from one remote peer.
pub trait PeerFetcher: Send + Sync {
    /// Fetches the value for `key` from the remote peer's `group`.
    fn fetch<'a>(&'a self, group: &'a str, key: &'a str) -> FetchFuture<'a>;
}
