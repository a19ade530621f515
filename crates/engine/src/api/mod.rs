//! HTTP API layer.

pub mod admin_routes;
pub mod ai_routes;
pub mod entity_routes;
pub mod http;
pub mod session;
pub mod world_routes;
