//! Per-identity resource quotas.
//!
//! Check-then-act over live counts: two concurrent creations can both pass
//! the check and overshoot a ceiling by a small margin. That race is accepted
//! for this workload and documented rather than papered over with atomicity
//! the store does not provide.

use std::sync::Arc;

use loreforge_domain::{
    ChildEntity, EntityKind, UserId, WorldId, MAX_ENTITIES_PER_TYPE, MAX_WORLDS_PER_USER,
};

use crate::infrastructure::ports::{ChildRepo, RepoError, WorldRepo};

#[derive(Debug, thiserror::Error)]
pub enum QuotaError {
    #[error("Maximum 4 worlds allowed. Delete a world to create a new one.")]
    Worlds,
    #[error("{}", .0.quota_message())]
    Entities(EntityKind),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

pub struct QuotaEnforcer {
    worlds: Arc<dyn WorldRepo>,
}

impl QuotaEnforcer {
    pub fn new(worlds: Arc<dyn WorldRepo>) -> Self {
        Self { worlds }
    }

    /// Allow world creation only while the user owns strictly fewer than the
    /// ceiling.
    pub async fn check_world(&self, user_id: UserId) -> Result<(), QuotaError> {
        let count = self.worlds.count_for_user(user_id).await?;
        if count >= MAX_WORLDS_PER_USER {
            return Err(QuotaError::Worlds);
        }
        Ok(())
    }

    /// Allow child creation only while the world holds strictly fewer than
    /// the per-type ceiling.
    pub async fn check_children<T: ChildEntity>(
        &self,
        repo: &dyn ChildRepo<T>,
        world_id: WorldId,
    ) -> Result<(), QuotaError> {
        let count = repo.count_in_world(world_id).await?;
        if count >= MAX_ENTITIES_PER_TYPE {
            return Err(QuotaError::Entities(T::KIND));
        }
        Ok(())
    }
}
