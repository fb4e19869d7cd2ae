//! API Module
//!
//! HTTP handlers and routing for the cache peer.
//!
//! # Endpoints
//! - `GET /_cache/:group/:key` - Peer wire contract (raw bytes)
//! - `GET /get/:group/:key` - Client-facing read (raw bytes)
//! - `GET /stats/:group` - Group statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
