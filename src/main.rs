//! Mesh Cache - A distributed, look-aside, in-process cache peer
//!
//! One peer process: a bounded local cache, a consistent-hash view of the
//! cluster, and an HTTP surface for peers and clients.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mesh_cache::group::Loader;
use mesh_cache::{
    api::create_router, AppState, Config, EvictionPolicy, GroupRegistry, HttpPool,
};

/// Main entry point for a Mesh Cache peer.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the group registry and the demo "scores" group
/// 4. Register the peer set on the hash ring
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mesh_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Mesh Cache peer");

    // Load configuration from environment variables
    let config = Config::from_env();
    info!(
        "Configuration loaded: self_addr={}, peers={:?}, capacity={}B, policy={}, vnodes={}",
        config.self_addr,
        config.peer_addrs,
        config.cache_capacity,
        config.eviction_policy,
        config.virtual_nodes
    );

    // Create the registry and the demo group backed by the slow DB
    let registry = Arc::new(GroupRegistry::new());
    let group = registry
        .create_group(
            "scores",
            EvictionPolicy::from_name(&config.eviction_policy),
            config.cache_capacity,
            slow_db_loader(),
        )
        .expect("failed to create group");
    info!("Group 'scores' initialized");

    // Register the peer set (this process included) on the hash ring
    let mut peer_addrs = config.peer_addrs.clone();
    if !peer_addrs.contains(&config.self_addr) {
        peer_addrs.push(config.self_addr.clone());
    }
    let mut pool = HttpPool::new(config.self_addr.clone(), config.virtual_nodes);
    pool.register_peers(&peer_addrs)
        .expect("failed to register peers");
    group.register_peers(Arc::new(pool));
    info!("Registered {} peer(s)", peer_addrs.len());

    // Create router with all endpoints
    let state = AppState::new(registry);
    let app = create_router(state);

    // Bind to configured port
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    info!("Peer listening on http://{}", addr);

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    info!("Peer shutdown complete");
}

/// The demo backing data source: a fixed table with a logged lookup,
/// standing in for a slow database behind the cache.
fn slow_db_loader() -> Arc<dyn Loader> {
    Arc::new(|key: &str| {
        info!("[SlowDB] search key {key}");
        match key {
            "Tom" => Ok(b"630".to_vec()),
            "Jack" => Ok(b"589".to_vec()),
            "Sam" => Ok(b"567".to_vec()),
            _ => Err(anyhow::anyhow!("{key} not exist")),
        }
    })
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
