//! Peer Pool Module
//!
//! Owns the hash ring plus one HTTP client per registered peer, and decides
//! for every key whether it belongs to this process or a remote one.

use std::collections::HashMap;
use std::sync::Arc;

use reqwest::Url;
use tracing::debug;

use crate::error::{CacheError, Result};
use crate::peers::{PeerFetcher, PeerPicker};
use crate::ring::HashRing;
use crate::transport::HttpFetcher;

/// Path prefix shared by every peer endpoint in the cluster.
pub const PEER_BASE_PATH: &str = "/_cache";

// == HTTP Pool ==
/// The ring-backed [`PeerPicker`] for a static peer set.
///
/// Peers are registered once at startup; the ring is only read afterwards.
/// The coordinator consults the pool but never mutates ring membership.
#[derive(Debug)]
pub struct HttpPool {
    /// Address this process advertises, used for self-resolution
    self_addr: String,
    /// Key-to-peer ownership
    ring: HashRing,
    /// One fetcher per registered peer address
    fetchers: HashMap<String, Arc<HttpFetcher>>,
}

impl HttpPool {
    // == Constructor ==
    /// Creates a pool for this process's advertised address.
    pub fn new(self_addr: impl Into<String>, replicas: usize) -> Self {
        Self {
            self_addr: self_addr.into(),
            ring: HashRing::new(replicas),
            fetchers: HashMap::new(),
        }
    }

    // == Register Peers ==
    /// Registers the cluster's peer addresses (this process included) on
    /// the ring and builds a fetcher for each.
    pub fn register_peers(&mut self, peers: &[String]) -> Result<()> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|err| CacheError::Internal(err.to_string()))?;

        self.ring.add_peers(peers.iter().cloned());
        for peer in peers {
            let base = Url::parse(&format!("{peer}{PEER_BASE_PATH}"))
                .map_err(|err| CacheError::InvalidConfig(format!("bad peer address {peer}: {err}")))?;
            self.fetchers
                .insert(peer.clone(), Arc::new(HttpFetcher::new(client.clone(), base)));
        }
        Ok(())
    }
}

impl PeerPicker for HttpPool {
    /// Resolves the key's owner, returning None when this process owns it
    /// or no peers are registered.
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerFetcher>> {
        let owner = self.ring.get(key)?;
        if owner == self.self_addr {
            return None;
        }
        debug!(peer = owner, key, "picked peer");
        self.fetchers
            .get(owner)
            .map(|fetcher| fetcher.clone() as Arc<dyn PeerFetcher>)
    }
}
