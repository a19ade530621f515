//! LoreForge Engine library.
//!
//! All server-side code for the LoreForge worldbuilding service.
//!
//! ## Structure
//!
//! - `use_cases/` - Session lifecycle, access control, and AI drafting
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `api/` - HTTP entry points
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod use_cases;

pub use app::{App, AppConfig};
