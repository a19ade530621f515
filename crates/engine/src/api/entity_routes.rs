//! Child entity routes, generic over the five entity types.
//!
//! One handler set serves characters, locations, magics, factions, and
//! events; the router instantiates it per type.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use loreforge_domain::{ChildEntity, WorldId};

use crate::api::http::ApiError;
use crate::api::session::CurrentUser;
use crate::app::{App, ChildRepos};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldScope {
    pub world_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest<D> {
    pub world_id: Option<Uuid>,
    #[serde(flatten)]
    pub draft: D,
}

fn required_world_id(world_id: Option<Uuid>) -> Result<WorldId, ApiError> {
    world_id
        .map(WorldId::from_uuid)
        .ok_or_else(|| ApiError::BadRequest("worldId is required".to_string()))
}

pub async fn list<T: ChildEntity>(
    State(app): State<Arc<App>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Query(scope): Query<WorldScope>,
) -> Result<Json<Vec<T>>, ApiError>
where
    App: ChildRepos<T>,
{
    let world_id = required_world_id(scope.world_id)?;
    app.guard.target_world(user_id, world_id).await?;

    let entities = ChildRepos::<T>::repo(app.as_ref()).list_in_world(world_id).await?;
    Ok(Json(entities))
}

pub async fn create<T: ChildEntity>(
    State(app): State<Arc<App>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Json(request): Json<CreateRequest<T::Draft>>,
) -> Result<(StatusCode, Json<T>), ApiError>
where
    App: ChildRepos<T>,
{
    let world_id = required_world_id(request.world_id)?;
    app.guard.target_world(user_id, world_id).await?;

    let repo = ChildRepos::<T>::repo(app.as_ref());
    app.quota.check_children(repo.as_ref(), world_id).await?;

    let entity = T::try_new(world_id, request.draft, app.clock.now())?;
    repo.insert(&entity).await?;
    tracing::debug!(
        kind = %T::KIND,
        name = entity.display_name(),
        %world_id,
        "Created entity"
    );
    Ok((StatusCode::CREATED, Json(entity)))
}

pub async fn get_one<T: ChildEntity>(
    State(app): State<Arc<App>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<T>, ApiError>
where
    App: ChildRepos<T>,
{
    let repo = ChildRepos::<T>::repo(app.as_ref());
    let entity = app.guard.child(repo.as_ref(), user_id, id).await?;
    Ok(Json(entity))
}

pub async fn update<T: ChildEntity>(
    State(app): State<Arc<App>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(draft): Json<T::Draft>,
) -> Result<Json<T>, ApiError>
where
    App: ChildRepos<T>,
{
    let repo = ChildRepos::<T>::repo(app.as_ref());
    let mut entity = app.guard.child(repo.as_ref(), user_id, id).await?;
    entity.apply(draft);
    repo.update(&entity).await?;
    Ok(Json(entity))
}

pub async fn remove<T: ChildEntity>(
    State(app): State<Arc<App>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
    App: ChildRepos<T>,
{
    let repo = ChildRepos::<T>::repo(app.as_ref());
    let entity = app.guard.child(repo.as_ref(), user_id, id).await?;
    repo.delete(entity.id()).await?;
    Ok(StatusCode::NO_CONTENT)
}
