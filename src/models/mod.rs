//! Models Module
//!
//! JSON DTOs exchanged over the HTTP surface.

pub mod responses;

pub use responses::{ErrorResponse, HealthResponse, StatsResponse};
