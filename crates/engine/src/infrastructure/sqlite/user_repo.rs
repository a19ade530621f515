//! SQLite storage for anonymous user identities.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use crate::infrastructure::ports::{RepoError, UserRepo};
use loreforge_domain::{EntityKind, User, UserId};

use super::{parse_timestamp, parse_uuid};

pub struct SqliteUserRepo {
    pool: SqlitePool,
}

impl SqliteUserRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Cascade-delete one reap candidate. The staleness predicate is
    /// re-checked inside the transaction: a user who revisited after the
    /// candidate scan keeps their data.
    async fn reap_one(&self, user_id: &str, cutoff: DateTime<Utc>) -> Result<bool, RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("users", e))?;

        let result = sqlx::query("DELETE FROM users WHERE id = ? AND last_visited < ?")
            .bind(user_id)
            .bind(cutoff.to_rfc3339())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::database("users", e))?;

        if result.rows_affected() == 0 {
            tx.rollback()
                .await
                .map_err(|e| RepoError::database("users", e))?;
            return Ok(false);
        }

        let world_ids: Vec<String> = sqlx::query("SELECT id FROM worlds WHERE user_id = ?")
            .bind(user_id)
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| RepoError::database("worlds", e))?
            .into_iter()
            .map(|row| row.get("id"))
            .collect();

        for world_id in &world_ids {
            for kind in EntityKind::ALL {
                sqlx::query(&format!(
                    "DELETE FROM {} WHERE world_id = ?",
                    kind.table()
                ))
                .bind(world_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| RepoError::database(kind.table(), e))?;
            }
        }

        sqlx::query("DELETE FROM worlds WHERE user_id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::database("worlds", e))?;

        tx.commit()
            .await
            .map_err(|e| RepoError::database("users", e))?;
        Ok(true)
    }
}

#[async_trait]
impl UserRepo for SqliteUserRepo {
    async fn get(&self, id: UserId) -> Result<Option<User>, RepoError> {
        let row = sqlx::query("SELECT id, created_at, last_visited FROM users WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("users", e))?;

        match row {
            Some(row) => {
                let id: String = row.get("id");
                let created_at: String = row.get("created_at");
                let last_visited: String = row.get("last_visited");
                Ok(Some(User {
                    id: UserId::from_uuid(parse_uuid(&id)?),
                    created_at: parse_timestamp(&created_at)?,
                    last_visited: parse_timestamp(&last_visited)?,
                }))
            }
            None => Ok(None),
        }
    }

    async fn insert(&self, user: &User) -> Result<(), RepoError> {
        sqlx::query("INSERT INTO users (id, created_at, last_visited) VALUES (?, ?, ?)")
            .bind(user.id.to_string())
            .bind(user.created_at.to_rfc3339())
            .bind(user.last_visited.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("users", e))?;
        Ok(())
    }

    async fn touch(&self, id: UserId, at: DateTime<Utc>) -> Result<bool, RepoError> {
        let result = sqlx::query("UPDATE users SET last_visited = ? WHERE id = ?")
            .bind(at.to_rfc3339())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("users", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn reap_inactive(&self, cutoff: DateTime<Utc>) -> Result<u64, RepoError> {
        let stale: Vec<String> = sqlx::query("SELECT id FROM users WHERE last_visited < ?")
            .bind(cutoff.to_rfc3339())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("users", e))?
            .into_iter()
            .map(|row| row.get("id"))
            .collect();

        let mut deleted = 0u64;
        // One transaction per user: an identity and its worlds/entities are
        // removed together or not at all.
        for user_id in stale {
            if self.reap_one(&user_id, cutoff).await? {
                deleted += 1;
            }
        }

        Ok(deleted)
    }
}
