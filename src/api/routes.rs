//! API Routes
//!
//! Configures the Axum router with the peer wire endpoint and the
//! client-facing endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{health_handler, stats_handler, value_handler, AppState};
use crate::transport::PEER_BASE_PATH;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /_cache/:group/:key` - Peer wire contract (raw bytes)
/// - `GET /get/:group/:key` - Client-facing read (raw bytes)
/// - `GET /stats/:group` - Group statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints
    Router::new()
        .route(&format!("{PEER_BASE_PATH}/:group/:key"), get(value_handler))
        .route("/get/:group/:key", get(value_handler))
        .route("/stats/:group", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::EvictionPolicy;
    use crate::group::GroupRegistry;
    use anyhow::anyhow;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let registry = Arc::new(GroupRegistry::new());
        registry
            .create_group(
                "scores",
                EvictionPolicy::Lru,
                1024,
                Arc::new(|key: &str| match key {
                    "Tom" => Ok(b"630".to_vec()),
                    _ => Err(anyhow!("{key} not exist")),
                }),
            )
            .unwrap();
        create_router(AppState::new(registry))
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_peer_endpoint_returns_bytes() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/_cache/scores/Tom")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"],
            "application/octet-stream"
        );
    }

    #[tokio::test]
    async fn test_unknown_group_is_not_found() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/_cache/nope/Tom")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/stats/scores")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
