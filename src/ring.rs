//! Hash Ring Module
//!
//! Consistent hashing that maps any key to one owning peer, with virtual
//! nodes smoothing the load across a small peer set.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::Hasher;

// == Hash Function ==
/// Injectable 32-bit hash over raw bytes.
pub type RingHashFn = fn(&[u8]) -> u32;

/// Default hash: 32-bit truncation of the standard library hasher.
///
/// Deterministic for a given binary, which is all ring placement needs:
/// every peer in a cluster runs the same build.
fn default_hash(bytes: &[u8]) -> u32 {
    let mut hasher = DefaultHasher::new();
    hasher.write(bytes);
    hasher.finish() as u32
}

// == Hash Ring ==
/// Maps keys to peer identifiers via consistent hashing.
///
/// Each registered peer contributes `replicas` virtual nodes, hashed from
/// the virtual-node index concatenated with the peer identifier. The
/// virtual-node list is kept sorted; lookup is a binary search for the
/// first node at or past the key's hash, wrapping to the smallest node.
pub struct HashRing {
    /// Hash function for keys and virtual nodes
    hash: RingHashFn,
    /// Virtual nodes per real peer
    replicas: usize,
    /// Sorted virtual-node hashes
    keys: Vec<u32>,
    /// Virtual-node hash to real peer identifier
    vnodes: HashMap<u32, String>,
}

impl std::fmt::Debug for HashRing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashRing")
            .field("replicas", &self.replicas)
            .field("virtual_nodes", &self.keys.len())
            .finish()
    }
}

impl HashRing {
    // == Constructors ==
    /// Creates an empty ring with the default hash function.
    pub fn new(replicas: usize) -> Self {
        Self::with_hash(replicas, default_hash)
    }

    /// Creates an empty ring with a caller-supplied hash function.
    pub fn with_hash(replicas: usize, hash: RingHashFn) -> Self {
        Self {
            hash,
            replicas,
            keys: Vec::new(),
            vnodes: HashMap::new(),
        }
    }

    // == Add Peers ==
    /// Registers real peers, each under `replicas` virtual nodes.
    ///
    /// The virtual-node list is re-sorted after every bulk registration.
    pub fn add_peers<I, S>(&mut self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for peer in peers {
            let peer = peer.into();
            for index in 0..self.replicas {
                let vnode = (self.hash)(format!("{index}{peer}").as_bytes());
                self.keys.push(vnode);
                self.vnodes.insert(vnode, peer.clone());
            }
        }
        self.keys.sort_unstable();
    }

    // == Get ==
    /// Resolves the peer owning `key`.
    ///
    /// Returns the peer of the first virtual node whose hash is at or past
    /// the key's hash, wrapping to the smallest virtual node when the key
    /// hashes beyond every registered node. Returns None on an empty ring.
    pub fn get(&self, key: &str) -> Option<&str> {
        if self.keys.is_empty() {
            return None;
        }
        let target = (self.hash)(key.as_bytes());
        let idx = self.keys.partition_point(|&vnode| vnode < target);
        let vnode = if idx == self.keys.len() {
            self.keys[0]
        } else {
            self.keys[idx]
        };
        self.vnodes.get(&vnode).map(String::as_str)
    }

    /// Returns true if no peers are registered.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    /// Hash that reads the bytes as a decimal number, making ring positions
    /// easy to reason about in tests.
    fn numeric_hash(bytes: &[u8]) -> u32 {
        std::str::from_utf8(bytes).unwrap().parse().unwrap()
    }

    #[test]
    fn test_ring_empty() {
        let ring = HashRing::new(3);
        assert!(ring.is_empty());
        assert_eq!(ring.get("anything"), None);
    }

    #[test]
    fn test_ring_placement_with_numeric_hash() {
        let mut ring = HashRing::with_hash(3, numeric_hash);

        // Peers 6, 4 and 2 yield virtual nodes 2,4,6,12,14,16,22,24,26
        ring.add_peers(["6", "4", "2"]);

        assert_eq!(ring.get("2"), Some("2"));
        assert_eq!(ring.get("11"), Some("2"));
        assert_eq!(ring.get("23"), Some("4"));
        assert_eq!(ring.get("25"), Some("6"));
    }

    #[test]
    fn test_ring_wraps_past_largest_node() {
        let mut ring = HashRing::with_hash(3, numeric_hash);
        ring.add_peers(["6", "4", "2"]);

        // 27 is beyond the largest virtual node (26): wrap to the smallest
        // node (2), which belongs to peer "2"
        assert_eq!(ring.get("27"), Some("2"));
    }

    #[test]
    fn test_ring_later_registration_shifts_ownership() {
        let mut ring = HashRing::with_hash(3, numeric_hash);
        ring.add_peers(["6", "4", "2"]);
        assert_eq!(ring.get("27"), Some("2"));

        // Adding peer 8 introduces virtual node 28, which captures key 27
        ring.add_peers(["8"]);
        assert_eq!(ring.get("27"), Some("8"));
    }

    #[test]
    fn test_ring_deterministic_over_repeated_gets() {
        let mut ring = HashRing::new(50);
        ring.add_peers([
            "http://127.0.0.1:8001",
            "http://127.0.0.1:8002",
            "http://127.0.0.1:8003",
        ]);

        let first = ring.get("x").unwrap().to_string();
        for _ in 0..100 {
            assert_eq!(ring.get("x"), Some(first.as_str()));
        }
    }

    #[test]
    fn test_ring_replica_count() {
        let mut ring = HashRing::new(50);
        ring.add_peers(["p1", "p2", "p3"]);
        assert_eq!(ring.keys.len(), 150);
    }
}
