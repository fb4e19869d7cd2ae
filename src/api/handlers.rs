//! API Handlers
//!
//! HTTP request handlers for the peer wire contract and the client-facing
//! endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};

use crate::error::{CacheError, Result};
use crate::group::GroupRegistry;
use crate::models::{HealthResponse, StatsResponse};

/// Application state shared across all handlers.
///
/// The group registry is created once at process start and injected here
/// rather than living in global state.
#[derive(Clone)]
pub struct AppState {
    /// Process-wide group registry
    pub registry: Arc<GroupRegistry>,
}

impl AppState {
    /// Creates a new AppState over the given registry.
    pub fn new(registry: Arc<GroupRegistry>) -> Self {
        Self { registry }
    }
}

/// Handler for GET /_cache/:group/:key and GET /get/:group/:key
///
/// Both the peer wire contract and the client read path resolve the group,
/// run the coordinator and answer with the raw value bytes. Axum decodes
/// percent-escaped path segments before they reach the coordinator.
pub async fn value_handler(
    State(state): State<AppState>,
    Path((group_name, key)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    let group = state
        .registry
        .get_group(&group_name)
        .ok_or_else(|| CacheError::GroupNotFound(group_name.clone()))?;

    let value = group.get(&key).await?;

    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        value.to_vec(),
    ))
}

/// Handler for GET /stats/:group
///
/// Returns current statistics for one group.
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(group_name): Path<String>,
) -> Result<Json<StatsResponse>> {
    let group = state
        .registry
        .get_group(&group_name)
        .ok_or_else(|| CacheError::GroupNotFound(group_name.clone()))?;

    let stats = group.stats().await;
    Ok(Json(StatsResponse::new(group_name, stats)))
}

/// Handler for GET /health
///
/// Returns health status of this peer.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
