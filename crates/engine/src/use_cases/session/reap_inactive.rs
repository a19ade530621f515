//! Inactivity reaping: delete identities untouched for the retention window.

use std::sync::Arc;

use chrono::Duration;

use crate::infrastructure::ports::{ClockPort, RepoError, UserRepo};

/// Deletes every user whose `last_visited` is older than the retention
/// window, cascading to their worlds and child entities. Triggered on demand
/// (admin endpoint); there is no internal timer.
pub struct ReapInactive {
    users: Arc<dyn UserRepo>,
    clock: Arc<dyn ClockPort>,
    retention_days: i64,
}

impl ReapInactive {
    pub fn new(users: Arc<dyn UserRepo>, clock: Arc<dyn ClockPort>, retention_days: i64) -> Self {
        Self {
            users,
            clock,
            retention_days,
        }
    }

    pub fn retention_days(&self) -> i64 {
        self.retention_days
    }

    /// Returns the number of users deleted.
    pub async fn execute(&self) -> Result<u64, RepoError> {
        let cutoff = self.clock.now() - Duration::days(self.retention_days);
        let deleted = self.users.reap_inactive(cutoff).await?;
        if deleted > 0 {
            tracing::info!(deleted, retention_days = self.retention_days, "Reaped inactive users");
        }
        Ok(deleted)
    }
}
