//! Configuration Module
//!
//! Handles loading and managing peer-process configuration from environment
//! variables.

use std::env;

/// Cache peer configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Address this peer advertises to the ring (e.g. "http://127.0.0.1:8001")
    pub self_addr: String,
    /// All peer addresses in the cluster, including this process
    pub peer_addrs: Vec<String>,
    /// Local cache capacity in bytes
    pub cache_capacity: usize,
    /// Eviction policy name ("LRU" or "LFU", unrecognized falls back to LRU)
    pub eviction_policy: String,
    /// Virtual nodes per real peer on the hash ring
    pub virtual_nodes: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 8001)
    /// - `SELF_ADDR` - Advertised peer address (default: "http://127.0.0.1:<port>")
    /// - `PEER_ADDRS` - Comma-separated peer addresses (default: empty)
    /// - `CACHE_CAPACITY` - Cache capacity in bytes (default: 1048576)
    /// - `EVICTION_POLICY` - "LRU" or "LFU" (default: "LRU")
    /// - `VIRTUAL_NODES` - Virtual nodes per peer (default: 50)
    pub fn from_env() -> Self {
        let server_port = env::var("SERVER_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8001);
        Self {
            server_port,
            self_addr: env::var("SELF_ADDR")
                .unwrap_or_else(|_| format!("http://127.0.0.1:{}", server_port)),
            peer_addrs: env::var("PEER_ADDRS")
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            cache_capacity: env::var("CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1024 * 1024),
            eviction_policy: env::var("EVICTION_POLICY").unwrap_or_else(|_| "LRU".to_string()),
            virtual_nodes: env::var("VIRTUAL_NODES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(50),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 8001,
            self_addr: "http://127.0.0.1:8001".to_string(),
            peer_addrs: Vec::new(),
            cache_capacity: 1024 * 1024,
            eviction_policy: "LRU".to_string(),
            virtual_nodes: 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 8001);
        assert_eq!(config.self_addr, "http://127.0.0.1:8001");
        assert!(config.peer_addrs.is_empty());
        assert_eq!(config.cache_capacity, 1024 * 1024);
        assert_eq!(config.eviction_policy, "LRU");
        assert_eq!(config.virtual_nodes, 50);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("SERVER_PORT");
        env::remove_var("SELF_ADDR");
        env::remove_var("PEER_ADDRS");
        env::remove_var("CACHE_CAPACITY");
        env::remove_var("EVICTION_POLICY");
        env::remove_var("VIRTUAL_NODES");

        let config = Config::from_env();
        assert_eq!(config.server_port, 8001);
        assert_eq!(config.self_addr, "http://127.0.0.1:8001");
        assert_eq!(config.cache_capacity, 1024 * 1024);
        assert_eq!(config.eviction_policy, "LRU");
        assert_eq!(config.virtual_nodes, 50);
    }
}
