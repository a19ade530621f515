//! Access control: ownership verification and per-identity resource quotas.

mod guard;
mod quota;

pub use guard::{AccessError, OwnershipGuard};
pub use quota::{QuotaEnforcer, QuotaError};
