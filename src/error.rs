//! Error types for the cache mesh
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache mesh.
///
/// Clone is required because a single load result is shared with every
/// caller waiting on the same deduplication slot.
#[derive(Error, Debug, Clone)]
pub enum CacheError {
    /// Empty key passed to a group lookup
    #[error("key is required")]
    EmptyKey,

    /// Named group is not registered
    #[error("no such group: {0}")]
    GroupNotFound(String),

    /// Group name already registered
    #[error("group already exists: {0}")]
    GroupExists(String),

    /// Invalid construction arguments (zero capacity, bad peer address)
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The caller-supplied data source failed
    #[error("loader failed: {0}")]
    Loader(String),

    /// Transport-level failure talking to a peer
    #[error("peer fetch failed: {0}")]
    PeerFetch(String),

    /// Internal server error
    #[error("internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::EmptyKey => StatusCode::BAD_REQUEST,
            CacheError::GroupNotFound(_) => StatusCode::NOT_FOUND,
            CacheError::GroupExists(_) => StatusCode::BAD_REQUEST,
            CacheError::InvalidConfig(_) => StatusCode::BAD_REQUEST,
            CacheError::Loader(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CacheError::PeerFetch(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache mesh.
pub type Result<T> = std::result::Result<T, CacheError>;
