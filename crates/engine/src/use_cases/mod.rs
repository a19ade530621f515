//! Use cases: session lifecycle, access control, and AI drafting.

pub mod access;
pub mod ai;
pub mod session;
