//! Resource ceilings for anonymous tenants.
//!
//! Ceilings are fixed product decisions, not tunables: they bound the damage
//! an anonymous visitor can do to shared storage before the reaper catches up.

/// Maximum worlds a single identity may own concurrently.
pub const MAX_WORLDS_PER_USER: u32 = 4;

/// Maximum entities of each child type a world may hold concurrently.
/// Applies independently per type (characters, locations, magics, factions,
/// story events).
pub const MAX_ENTITIES_PER_TYPE: u32 = 10;

/// Days of inactivity after which an identity and its data are reclaimed.
pub const DEFAULT_RETENTION_DAYS: i64 = 7;
