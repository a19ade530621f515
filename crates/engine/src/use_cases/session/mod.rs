//! Anonymous session lifecycle: identity resolution, first-visit demo
//! seeding, and inactivity reaping.

pub mod demo_content;
mod reap_inactive;
mod resolve_identity;
mod seed_demo;

pub use reap_inactive::ReapInactive;
pub use resolve_identity::{Resolution, ResolveIdentity, SessionError};
pub use seed_demo::SeedDemoWorld;
