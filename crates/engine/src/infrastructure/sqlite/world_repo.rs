//! SQLite storage for worlds, including the cascaded delete and the atomic
//! demo seed.

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};

use crate::infrastructure::ports::{RepoError, WorldRepo};
use loreforge_domain::{ChildEntity, EntityKind, UserId, World, WorldId, WorldSeed};

pub struct SqliteWorldRepo {
    pool: SqlitePool,
}

impl SqliteWorldRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn map_world(row: &SqliteRow) -> Result<World, RepoError> {
    let id: String = row.get("id");
    let user_id: String = row.get("user_id");
    let created_at: String = row.get("created_at");
    Ok(World {
        id: WorldId::from_uuid(super::parse_uuid(&id)?),
        user_id: UserId::from_uuid(super::parse_uuid(&user_id)?),
        name: row.get("name"),
        summary: row.get("summary"),
        created_at: super::parse_timestamp(&created_at)?,
    })
}

async fn insert_child_tx<T: ChildEntity>(
    tx: &mut SqliteConnection,
    entity: &T,
) -> Result<(), RepoError> {
    let json =
        serde_json::to_string(entity).map_err(|e| RepoError::Serialization(e.to_string()))?;
    sqlx::query(&format!(
        "INSERT INTO {} (id, world_id, data_json, created_at) VALUES (?, ?, ?, ?)",
        T::KIND.table()
    ))
    .bind(entity.id().to_string())
    .bind(entity.world_id().to_string())
    .bind(json)
    .bind(entity.created_at().to_rfc3339())
    .execute(&mut *tx)
    .await
    .map_err(|e| RepoError::database(T::KIND.table(), e))?;
    Ok(())
}

#[async_trait]
impl WorldRepo for SqliteWorldRepo {
    async fn get(&self, id: WorldId) -> Result<Option<World>, RepoError> {
        let row = sqlx::query(
            "SELECT id, user_id, name, summary, created_at FROM worlds WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("worlds", e))?;

        row.as_ref().map(map_world).transpose()
    }

    async fn insert(&self, world: &World) -> Result<(), RepoError> {
        sqlx::query(
            "INSERT INTO worlds (id, user_id, name, summary, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(world.id.to_string())
        .bind(world.user_id.to_string())
        .bind(&world.name)
        .bind(&world.summary)
        .bind(world.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("worlds", e))?;
        Ok(())
    }

    async fn update(&self, world: &World) -> Result<(), RepoError> {
        let result = sqlx::query("UPDATE worlds SET name = ?, summary = ? WHERE id = ?")
            .bind(&world.name)
            .bind(&world.summary)
            .bind(world.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("worlds", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: WorldId) -> Result<(), RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("worlds", e))?;

        for kind in EntityKind::ALL {
            sqlx::query(&format!("DELETE FROM {} WHERE world_id = ?", kind.table()))
                .bind(id.to_string())
                .execute(&mut *tx)
                .await
                .map_err(|e| RepoError::database(kind.table(), e))?;
        }

        sqlx::query("DELETE FROM worlds WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::database("worlds", e))?;

        tx.commit()
            .await
            .map_err(|e| RepoError::database("worlds", e))?;
        Ok(())
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<World>, RepoError> {
        let rows = sqlx::query(
            "SELECT id, user_id, name, summary, created_at FROM worlds \
             WHERE user_id = ? ORDER BY created_at DESC",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("worlds", e))?;

        rows.iter().map(map_world).collect()
    }

    async fn count_for_user(&self, user_id: UserId) -> Result<u32, RepoError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM worlds WHERE user_id = ?")
            .bind(user_id.to_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepoError::database("worlds", e))?;
        let n: i64 = row.get("n");
        Ok(n as u32)
    }

    async fn insert_seed(&self, seed: &WorldSeed) -> Result<(), RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("worlds", e))?;

        let world = &seed.world;
        sqlx::query(
            "INSERT INTO worlds (id, user_id, name, summary, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(world.id.to_string())
        .bind(world.user_id.to_string())
        .bind(&world.name)
        .bind(&world.summary)
        .bind(world.created_at.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| RepoError::database("worlds", e))?;

        for character in &seed.characters {
            insert_child_tx(&mut tx, character).await?;
        }
        for location in &seed.locations {
            insert_child_tx(&mut tx, location).await?;
        }
        for magic in &seed.magics {
            insert_child_tx(&mut tx, magic).await?;
        }
        for faction in &seed.factions {
            insert_child_tx(&mut tx, faction).await?;
        }
        for event in &seed.events {
            insert_child_tx(&mut tx, event).await?;
        }

        tx.commit()
            .await
            .map_err(|e| RepoError::database("worlds", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::ChildRepo;
    use crate::infrastructure::sqlite::{test_pool, SqliteChildRepo};
    use chrono::Utc;
    use loreforge_domain::{
        Character, CharacterDraft, Faction, Location, LocationDraft, Magic, StoryEvent,
    };

    #[tokio::test]
    async fn insert_get_update_delete() {
        let repo = SqliteWorldRepo::new(test_pool().await);
        let user_id = UserId::new();
        let mut world = World::new(user_id, "Mythworld", "A realm of sky islands", Utc::now());

        repo.insert(&world).await.expect("insert");
        let loaded = repo.get(world.id).await.expect("get").expect("present");
        assert_eq!(loaded.name, "Mythworld");
        assert_eq!(loaded.user_id, user_id);

        world.name = "Mythworld II".into();
        repo.update(&world).await.expect("update");
        let loaded = repo.get(world.id).await.expect("get").expect("present");
        assert_eq!(loaded.name, "Mythworld II");

        repo.delete(world.id).await.expect("delete");
        assert!(repo.get(world.id).await.expect("get").is_none());
    }

    #[tokio::test]
    async fn update_of_missing_world_is_not_found() {
        let repo = SqliteWorldRepo::new(test_pool().await);
        let world = World::new(UserId::new(), "Ghost", "", Utc::now());
        assert!(matches!(
            repo.update(&world).await,
            Err(RepoError::NotFound)
        ));
    }

    #[tokio::test]
    async fn list_is_newest_first_and_scoped_to_owner() {
        let repo = SqliteWorldRepo::new(test_pool().await);
        let owner = UserId::new();
        let other = UserId::new();

        let older = World::new(owner, "Older", "", Utc::now() - chrono::Duration::hours(1));
        let newer = World::new(owner, "Newer", "", Utc::now());
        let foreign = World::new(other, "Foreign", "", Utc::now());
        repo.insert(&older).await.expect("insert");
        repo.insert(&newer).await.expect("insert");
        repo.insert(&foreign).await.expect("insert");

        let listed = repo.list_for_user(owner).await.expect("list");
        let names: Vec<&str> = listed.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["Newer", "Older"]);
        assert_eq!(repo.count_for_user(owner).await.expect("count"), 2);
        assert_eq!(repo.count_for_user(other).await.expect("count"), 1);
    }

    #[tokio::test]
    async fn delete_cascades_to_all_child_tables() {
        let pool = test_pool().await;
        let repo = SqliteWorldRepo::new(pool.clone());
        let characters: SqliteChildRepo<Character> = SqliteChildRepo::new(pool.clone());
        let locations: SqliteChildRepo<Location> = SqliteChildRepo::new(pool);

        let world = World::new(UserId::new(), "Doomed", "", Utc::now());
        repo.insert(&world).await.expect("insert");

        characters
            .insert(&Character::new(
                world.id,
                CharacterDraft {
                    name: "Zephyr".into(),
                    ..Default::default()
                },
                Utc::now(),
            ))
            .await
            .expect("insert child");
        locations
            .insert(&Location::new(
                world.id,
                LocationDraft {
                    name: "Highmere".into(),
                    ..Default::default()
                },
                Utc::now(),
            ))
            .await
            .expect("insert child");

        repo.delete(world.id).await.expect("delete");

        assert_eq!(characters.count_in_world(world.id).await.expect("count"), 0);
        assert_eq!(locations.count_in_world(world.id).await.expect("count"), 0);
    }

    #[tokio::test]
    async fn seed_persists_world_and_all_batches() {
        let pool = test_pool().await;
        let repo = SqliteWorldRepo::new(pool.clone());

        let user_id = UserId::new();
        let now = Utc::now();
        let world = World::new(user_id, "Mythworld (Demo)", "Demo summary", now);
        let world_id = world.id;
        let seed = WorldSeed {
            world,
            characters: vec![Character::new(
                world_id,
                CharacterDraft {
                    name: "Elara Vane".into(),
                    ..Default::default()
                },
                now,
            )],
            locations: vec![Location::new(
                world_id,
                LocationDraft {
                    name: "Highmere".into(),
                    ..Default::default()
                },
                now,
            )],
            magics: vec![Magic::new(world_id, Default::default(), now)],
            factions: vec![Faction::new(world_id, Default::default(), now)],
            events: vec![StoryEvent::new(world_id, Default::default(), now)],
        };

        repo.insert_seed(&seed).await.expect("seed");

        assert_eq!(repo.count_for_user(user_id).await.expect("count"), 1);
        let characters: SqliteChildRepo<Character> = SqliteChildRepo::new(pool);
        assert_eq!(characters.count_in_world(world_id).await.expect("count"), 1);
    }
}
