//! World CRUD routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use loreforge_domain::{Character, Location, World, WorldId};

use crate::api::http::ApiError;
use crate::api::session::CurrentUser;
use crate::app::App;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorldRequest {
    pub name: String,
    #[serde(default)]
    pub summary: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorldRequest {
    pub name: Option<String>,
    pub summary: Option<String>,
}

/// The original detail shape: the world with its characters and locations
/// inlined.
#[derive(Debug, serde::Serialize)]
pub struct WorldDetail {
    #[serde(flatten)]
    pub world: World,
    pub characters: Vec<Character>,
    pub locations: Vec<Location>,
}

pub async fn list(
    State(app): State<Arc<App>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
) -> Result<Json<Vec<World>>, ApiError> {
    let worlds = app.worlds.list_for_user(user_id).await?;
    Ok(Json(worlds))
}

pub async fn create(
    State(app): State<Arc<App>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Json(request): Json<CreateWorldRequest>,
) -> Result<(StatusCode, Json<World>), ApiError> {
    app.quota.check_world(user_id).await?;

    let world = World::create(user_id, request.name, request.summary, app.clock.now())?;
    app.worlds.insert(&world).await?;
    tracing::debug!(world_id = %world.id, %user_id, "Created world");
    Ok((StatusCode::CREATED, Json(world)))
}

pub async fn get_one(
    State(app): State<Arc<App>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<WorldDetail>, ApiError> {
    let world_id = WorldId::from_uuid(id);
    let world = app.guard.world(user_id, world_id).await?;

    let characters = app.characters.list_in_world(world_id).await?;
    let locations = app.locations.list_in_world(world_id).await?;
    Ok(Json(WorldDetail {
        world,
        characters,
        locations,
    }))
}

pub async fn update(
    State(app): State<Arc<App>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateWorldRequest>,
) -> Result<Json<World>, ApiError> {
    let mut world = app.guard.world(user_id, WorldId::from_uuid(id)).await?;

    if let Some(name) = request.name {
        world.name = name;
    }
    if let Some(summary) = request.summary {
        world.summary = summary;
    }
    app.worlds.update(&world).await?;
    Ok(Json(world))
}

pub async fn remove(
    State(app): State<Arc<App>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let world = app.guard.world(user_id, WorldId::from_uuid(id)).await?;
    app.worlds.delete(world.id).await?;
    tracing::debug!(world_id = %world.id, %user_id, "Deleted world");
    Ok(StatusCode::NO_CONTENT)
}
