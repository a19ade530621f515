//! Ownership verification.
//!
//! Every read, update, and delete of a world or child entity re-verifies
//! ownership against the store. Nothing is cached across requests, so the
//! check always reflects concurrent modifications.

use std::sync::Arc;

use uuid::Uuid;

use loreforge_domain::{ChildEntity, UserId, World, WorldId};

use crate::infrastructure::ports::{ChildRepo, RepoError, WorldRepo};

#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    /// The id does not resolve to any resource.
    #[error("{0} not found")]
    NotFound(&'static str),
    /// The resource exists but belongs to someone else.
    #[error("Access denied")]
    Denied,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

pub struct OwnershipGuard {
    worlds: Arc<dyn WorldRepo>,
}

impl OwnershipGuard {
    pub fn new(worlds: Arc<dyn WorldRepo>) -> Self {
        Self { worlds }
    }

    /// Verify the user owns the addressed world. Returns the world so the
    /// caller need not re-fetch it.
    pub async fn world(&self, user_id: UserId, world_id: WorldId) -> Result<World, AccessError> {
        let world = self
            .worlds
            .get(world_id)
            .await?
            .ok_or(AccessError::NotFound("World"))?;
        if world.user_id != user_id {
            return Err(AccessError::Denied);
        }
        Ok(world)
    }

    /// Verify the user owns the world a creation/list request targets.
    ///
    /// Unlike [`Self::world`], a missing world is reported as denied: the id
    /// came from a request payload, and whether it is absent or foreign is
    /// not the requester's business.
    pub async fn target_world(
        &self,
        user_id: UserId,
        world_id: WorldId,
    ) -> Result<World, AccessError> {
        match self.world(user_id, world_id).await {
            Err(AccessError::NotFound(_)) => Err(AccessError::Denied),
            other => other,
        }
    }

    /// Verify the user owns the world the addressed child entity belongs to.
    /// A missing entity is "not found" (distinct from "denied").
    pub async fn child<T: ChildEntity>(
        &self,
        repo: &dyn ChildRepo<T>,
        user_id: UserId,
        id: Uuid,
    ) -> Result<T, AccessError> {
        let entity = repo
            .get(id)
            .await?
            .ok_or(AccessError::NotFound(T::KIND.label()))?;

        let world = self
            .worlds
            .get(entity.world_id())
            .await?
            .ok_or(AccessError::NotFound("World"))?;
        if world.user_id != user_id {
            return Err(AccessError::Denied);
        }
        Ok(entity)
    }
}
