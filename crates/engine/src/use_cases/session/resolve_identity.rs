//! Identity resolution: map an inbound cookie token to a user record,
//! creating (and demo-seeding) one when needed.

use std::sync::Arc;

use loreforge_domain::{User, UserId};

use crate::infrastructure::ports::{ClockPort, RepoError, UserRepo};

use super::SeedDemoWorld;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Outcome of resolving a request's identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub user_id: UserId,
    /// True on the two creation paths; tells the HTTP layer to set the
    /// identity cookie on the response.
    pub issued_cookie: bool,
}

/// Resolves an inbound request to a stable anonymous identity.
///
/// Exactly one identity-store write happens per call: either the
/// `last_visited` refresh or the user insert.
pub struct ResolveIdentity {
    users: Arc<dyn UserRepo>,
    seeder: Arc<SeedDemoWorld>,
    clock: Arc<dyn ClockPort>,
}

impl ResolveIdentity {
    pub fn new(
        users: Arc<dyn UserRepo>,
        seeder: Arc<SeedDemoWorld>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            users,
            seeder,
            clock,
        }
    }

    pub async fn execute(&self, presented: Option<UserId>) -> Result<Resolution, SessionError> {
        let now = self.clock.now();

        if let Some(user_id) = presented {
            if self.users.touch(user_id, now).await? {
                return Ok(Resolution {
                    user_id,
                    issued_cookie: false,
                });
            }

            // Cookie exists but the record is gone (reaped or DB reset):
            // recreate the user under the same token.
            self.users.insert(&User::new(user_id, now)).await?;
            self.seeder.execute(user_id).await?;
            tracing::info!(%user_id, "Recreated user for stale cookie");
            return Ok(Resolution {
                user_id,
                issued_cookie: true,
            });
        }

        let user_id = UserId::new();
        self.users.insert(&User::new(user_id, now)).await?;
        self.seeder.execute(user_id).await?;
        tracing::info!(%user_id, "Created anonymous user");
        Ok(Resolution {
            user_id,
            issued_cookie: true,
        })
    }
}
