//! Generic SQLite storage for the five child entity tables.
//!
//! One implementation serves all child types: the table name comes from
//! `T::KIND` and the entity body is stored as JSON next to the scoping
//! columns.

use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::infrastructure::ports::{ChildRepo, RepoError};
use loreforge_domain::{ChildEntity, WorldId};

pub struct SqliteChildRepo<T: ChildEntity> {
    pool: SqlitePool,
    _marker: PhantomData<fn() -> T>,
}

impl<T: ChildEntity> SqliteChildRepo<T> {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }

    fn decode(json: &str) -> Result<T, RepoError> {
        serde_json::from_str(json).map_err(|e| RepoError::Serialization(e.to_string()))
    }

    fn encode(entity: &T) -> Result<String, RepoError> {
        serde_json::to_string(entity).map_err(|e| RepoError::Serialization(e.to_string()))
    }
}

#[async_trait]
impl<T: ChildEntity> ChildRepo<T> for SqliteChildRepo<T> {
    async fn get(&self, id: Uuid) -> Result<Option<T>, RepoError> {
        let row = sqlx::query(&format!(
            "SELECT data_json FROM {} WHERE id = ?",
            T::KIND.table()
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database(T::KIND.table(), e))?;

        match row {
            Some(row) => {
                let json: String = row.get("data_json");
                Ok(Some(Self::decode(&json)?))
            }
            None => Ok(None),
        }
    }

    async fn insert(&self, entity: &T) -> Result<(), RepoError> {
        sqlx::query(&format!(
            "INSERT INTO {} (id, world_id, data_json, created_at) VALUES (?, ?, ?, ?)",
            T::KIND.table()
        ))
        .bind(entity.id().to_string())
        .bind(entity.world_id().to_string())
        .bind(Self::encode(entity)?)
        .bind(entity.created_at().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database(T::KIND.table(), e))?;
        Ok(())
    }

    async fn update(&self, entity: &T) -> Result<(), RepoError> {
        let result = sqlx::query(&format!(
            "UPDATE {} SET data_json = ? WHERE id = ?",
            T::KIND.table()
        ))
        .bind(Self::encode(entity)?)
        .bind(entity.id().to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database(T::KIND.table(), e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        sqlx::query(&format!("DELETE FROM {} WHERE id = ?", T::KIND.table()))
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database(T::KIND.table(), e))?;
        Ok(())
    }

    async fn list_in_world(&self, world_id: WorldId) -> Result<Vec<T>, RepoError> {
        let rows = sqlx::query(&format!(
            "SELECT data_json FROM {} WHERE world_id = ? ORDER BY created_at",
            T::KIND.table()
        ))
        .bind(world_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database(T::KIND.table(), e))?;

        rows.iter()
            .map(|row| {
                let json: String = row.get("data_json");
                Self::decode(&json)
            })
            .collect()
    }

    async fn count_in_world(&self, world_id: WorldId) -> Result<u32, RepoError> {
        let row = sqlx::query(&format!(
            "SELECT COUNT(*) AS n FROM {} WHERE world_id = ?",
            T::KIND.table()
        ))
        .bind(world_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepoError::database(T::KIND.table(), e))?;
        let n: i64 = row.get("n");
        Ok(n as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::sqlite::test_pool;
    use chrono::Utc;
    use loreforge_domain::{Magic, MagicDraft, StoryEvent, StoryEventDraft};

    #[tokio::test]
    async fn crud_round_trip() {
        let repo: SqliteChildRepo<Magic> = SqliteChildRepo::new(test_pool().await);
        let world_id = WorldId::new();
        let mut magic = Magic::new(
            world_id,
            MagicDraft {
                name: "Leybinding".into(),
                category: "Elemental Magic".into(),
                ..Default::default()
            },
            Utc::now(),
        );

        repo.insert(&magic).await.expect("insert");
        let loaded = repo.get(magic.id()).await.expect("get").expect("present");
        assert_eq!(loaded.name, "Leybinding");
        assert_eq!(loaded.world_id, world_id);

        magic.apply(MagicDraft {
            name: "Soulforging".into(),
            category: "Soul Magic (Forbidden)".into(),
            ..Default::default()
        });
        repo.update(&magic).await.expect("update");
        let loaded = repo.get(magic.id()).await.expect("get").expect("present");
        assert_eq!(loaded.name, "Soulforging");

        repo.delete(magic.id()).await.expect("delete");
        assert!(repo.get(magic.id()).await.expect("get").is_none());
    }

    #[tokio::test]
    async fn update_of_missing_entity_is_not_found() {
        let repo: SqliteChildRepo<Magic> = SqliteChildRepo::new(test_pool().await);
        let magic = Magic::new(WorldId::new(), Default::default(), Utc::now());
        assert!(matches!(
            repo.update(&magic).await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn list_and_count_are_scoped_by_world() {
        let repo: SqliteChildRepo<StoryEvent> = SqliteChildRepo::new(test_pool().await);
        let ours = WorldId::new();
        let theirs = WorldId::new();

        for title in ["The Night of Falling Stars", "The Highmere Accord"] {
            repo.insert(&StoryEvent::new(
                ours,
                StoryEventDraft {
                    title: title.into(),
                    ..Default::default()
                },
                Utc::now(),
            ))
            .await
            .expect("insert");
        }
        repo.insert(&StoryEvent::new(
            theirs,
            StoryEventDraft {
                title: "The Ebonreach Breach".into(),
                ..Default::default()
            },
            Utc::now(),
        ))
        .await
        .expect("insert");

        assert_eq!(repo.count_in_world(ours).await.expect("count"), 2);
        assert_eq!(repo.count_in_world(theirs).await.expect("count"), 1);
        let listed = repo.list_in_world(ours).await.expect("list");
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|e| e.world_id == ours));
    }
}
