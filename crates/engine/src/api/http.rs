//! HTTP routes and the API error type.

use axum::{
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

use loreforge_domain::{Character, ChildEntity, EntityKind, Faction, Location, Magic, StoryEvent};

use crate::api::{admin_routes, ai_routes, entity_routes, session, world_routes};
use crate::app::{App, ChildRepos};
use crate::infrastructure::ports::RepoError;
use crate::use_cases::access::{AccessError, QuotaError};
use crate::use_cases::session::SessionError;

/// Assemble the full router. Worlds and child-entity routes sit behind the
/// identity middleware; health, AI, and admin do not.
pub fn routes(app: Arc<App>) -> Router {
    let guarded = Router::new()
        .route(
            "/api/worlds",
            get(world_routes::list).post(world_routes::create),
        )
        .route(
            "/api/worlds/{id}",
            get(world_routes::get_one)
                .put(world_routes::update)
                .delete(world_routes::remove),
        )
        .merge(child_routes::<Character>())
        .merge(child_routes::<Location>())
        .merge(child_routes::<Magic>())
        .merge(child_routes::<Faction>())
        .merge(child_routes::<StoryEvent>())
        .layer(middleware::from_fn_with_state(
            app.clone(),
            session::identity,
        ));

    let open = Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .route("/api/ai/generate", post(ai_routes::generate))
        .route("/api/admin/cleanup", post(admin_routes::cleanup));

    guarded.merge(open).with_state(app)
}

fn child_routes<T: ChildEntity>() -> Router<Arc<App>>
where
    App: ChildRepos<T>,
{
    let base = match T::KIND {
        EntityKind::Character => "/api/characters",
        EntityKind::Location => "/api/locations",
        EntityKind::Magic => "/api/magics",
        EntityKind::Faction => "/api/factions",
        EntityKind::StoryEvent => "/api/events",
    };
    Router::new()
        .route(
            base,
            get(entity_routes::list::<T>).post(entity_routes::create::<T>),
        )
        .route(
            &format!("{base}/{{id}}"),
            get(entity_routes::get_one::<T>)
                .put(entity_routes::update::<T>)
                .delete(entity_routes::remove::<T>),
        )
}

async fn health() -> &'static str {
    "OK"
}

#[derive(Debug)]
pub enum ApiError {
    /// The id does not resolve; carries the resource label for the body.
    NotFound(&'static str),
    AccessDenied,
    QuotaExceeded(String),
    BadRequest(String),
    /// Upstream collaborator failure; the message is safe to return.
    Upstream(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(label) => (StatusCode::NOT_FOUND, format!("{label} not found")),
            ApiError::AccessDenied => (StatusCode::FORBIDDEN, "Access denied".to_string()),
            ApiError::QuotaExceeded(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Upstream(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::Internal(detail) => {
                tracing::error!(%detail, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error".to_string(),
                )
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<loreforge_domain::DomainError> for ApiError {
    fn from(e: loreforge_domain::DomainError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<AccessError> for ApiError {
    fn from(e: AccessError) -> Self {
        match e {
            AccessError::NotFound(label) => ApiError::NotFound(label),
            AccessError::Denied => ApiError::AccessDenied,
            AccessError::Repo(e) => e.into(),
        }
    }
}

impl From<QuotaError> for ApiError {
    fn from(e: QuotaError) -> Self {
        match e {
            QuotaError::Worlds | QuotaError::Entities(_) => {
                ApiError::QuotaExceeded(e.to_string())
            }
            QuotaError::Repo(e) => e.into(),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(e: SessionError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<RepoError> for ApiError {
    fn from(e: RepoError) -> Self {
        match e {
            // Only reachable when the resource vanished between the guard
            // check and the write.
            RepoError::NotFound => ApiError::NotFound("Resource"),
            other => ApiError::Internal(other.to_string()),
        }
    }
}
