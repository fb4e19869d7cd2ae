//! Response DTOs for the cache peer API
//!
//! Defines the structure of outgoing JSON response bodies. Cache values
//! themselves travel as raw octet-stream bodies, not JSON.

use serde::Serialize;

use crate::group::GroupStatsSnapshot;

/// Response body for the stats endpoint (GET /stats/:group)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Group name
    pub group: String,
    /// Total lookups
    pub gets: u64,
    /// Local store hits
    pub hits: u64,
    /// Hit rate (hits / gets)
    pub hit_rate: f64,
    /// Values loaded from the local data source
    pub local_loads: u64,
    /// Values fetched from remote peers
    pub peer_loads: u64,
    /// Failed peer fetches that fell back to the local loader
    pub peer_errors: u64,
    /// Entries evicted under capacity pressure
    pub evictions: u64,
    /// Current number of entries in the local store
    pub entries: usize,
    /// Current total bytes in the local store
    pub used_bytes: usize,
}

impl StatsResponse {
    /// Creates a StatsResponse from a group's stats snapshot
    pub fn new(group: impl Into<String>, stats: GroupStatsSnapshot) -> Self {
        let hit_rate = if stats.gets > 0 {
            stats.hits as f64 / stats.gets as f64
        } else {
            0.0
        };
        Self {
            group: group.into(),
            gets: stats.gets,
            hits: stats.hits,
            hit_rate,
            local_loads: stats.local_loads,
            peer_loads: stats.peer_loads,
            peer_errors: stats.peer_errors,
            evictions: stats.evictions,
            entries: stats.entries,
            used_bytes: stats.used_bytes,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
