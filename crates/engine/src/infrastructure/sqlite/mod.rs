//! SQLite-backed persistence.
//!
//! All repositories share one pool. Timestamps are stored as RFC 3339 text in
//! UTC, so lexicographic comparison in SQL matches chronological order.
//! Scoping columns (`id`, `world_id`, `user_id`, `created_at`) are first-class
//! columns; the free-form descriptive fields of child entities travel in a
//! JSON column.

mod child_repo;
mod schema;
mod user_repo;
mod world_repo;

pub use child_repo::SqliteChildRepo;
pub use schema::ensure_schema;
pub use user_repo::SqliteUserRepo;
pub use world_repo::SqliteWorldRepo;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::infrastructure::ports::RepoError;

/// Open (creating if needed) the database at `db_path`.
pub async fn connect(db_path: &str) -> Result<SqlitePool, RepoError> {
    let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path))
        .await
        .map_err(|e| RepoError::database("connect", e))?;
    ensure_schema(&pool).await?;
    Ok(pool)
}

pub(crate) fn parse_uuid(value: &str) -> Result<Uuid, RepoError> {
    Uuid::parse_str(value).map_err(|e| RepoError::Serialization(format!("uuid: {e}")))
}

pub(crate) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, RepoError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepoError::Serialization(format!("timestamp: {e}")))
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    use sqlx::sqlite::SqlitePoolOptions;

    // A single connection keeps the in-memory database alive and shared.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    ensure_schema(&pool).await.expect("schema");
    pool
}
