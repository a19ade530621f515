//! Table and index creation.

use sqlx::SqlitePool;

use crate::infrastructure::ports::RepoError;
use loreforge_domain::EntityKind;

/// Ensure all tables and indexes exist. Safe to call on every startup.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), RepoError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            created_at TEXT NOT NULL,
            last_visited TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| RepoError::database("schema", e))?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_last_visited ON users (last_visited)")
        .execute(pool)
        .await
        .map_err(|e| RepoError::database("schema", e))?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS worlds (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            name TEXT NOT NULL,
            summary TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| RepoError::database("schema", e))?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_worlds_user ON worlds (user_id)")
        .execute(pool)
        .await
        .map_err(|e| RepoError::database("schema", e))?;

    for kind in EntityKind::ALL {
        let table = kind.table();
        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table} (
                id TEXT PRIMARY KEY,
                world_id TEXT NOT NULL,
                data_json TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        ))
        .execute(pool)
        .await
        .map_err(|e| RepoError::database("schema", e))?;

        sqlx::query(&format!(
            "CREATE INDEX IF NOT EXISTS idx_{table}_world ON {table} (world_id)",
        ))
        .execute(pool)
        .await
        .map_err(|e| RepoError::database("schema", e))?;
    }

    Ok(())
}
