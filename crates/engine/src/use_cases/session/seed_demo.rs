//! First-visit demo world seeding.

use std::sync::Arc;

use loreforge_domain::UserId;

use crate::infrastructure::ports::{ClockPort, RepoError, WorldRepo};

use super::demo_content;

/// Seeds the starter world for a brand-new identity.
///
/// Idempotent: seeding is skipped when the user already owns any world, so
/// retries and races cannot double-seed. The whole seed is one transaction at
/// the repository level.
pub struct SeedDemoWorld {
    worlds: Arc<dyn WorldRepo>,
    clock: Arc<dyn ClockPort>,
}

impl SeedDemoWorld {
    pub fn new(worlds: Arc<dyn WorldRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self { worlds, clock }
    }

    /// Returns true when a demo world was actually created.
    pub async fn execute(&self, user_id: UserId) -> Result<bool, RepoError> {
        if self.worlds.count_for_user(user_id).await? > 0 {
            return Ok(false);
        }

        let seed = demo_content::demo_seed(user_id, self.clock.now());
        self.worlds.insert_seed(&seed).await?;
        tracing::info!(%user_id, world = %seed.world.name, "Seeded demo world");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{MockClockPort, MockWorldRepo};
    use chrono::{TimeZone, Utc};

    fn fixed_clock() -> Arc<MockClockPort> {
        let mut clock = MockClockPort::new();
        clock
            .expect_now()
            .returning(|| Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap());
        Arc::new(clock)
    }

    #[tokio::test]
    async fn seeds_full_demo_world_for_empty_user() {
        let user_id = UserId::new();
        let mut worlds = MockWorldRepo::new();
        worlds.expect_count_for_user().returning(|_| Ok(0));
        worlds
            .expect_insert_seed()
            .withf(move |seed| {
                seed.world.user_id == user_id
                    && seed.world.name == demo_content::DEMO_WORLD_NAME
                    && !seed.characters.is_empty()
                    && !seed.locations.is_empty()
                    && !seed.magics.is_empty()
                    && !seed.factions.is_empty()
                    && !seed.events.is_empty()
            })
            .times(1)
            .returning(|_| Ok(()));

        let seeder = SeedDemoWorld::new(Arc::new(worlds), fixed_clock());
        assert!(seeder.execute(user_id).await.expect("seed"));
    }

    #[tokio::test]
    async fn skips_user_who_already_owns_worlds() {
        let mut worlds = MockWorldRepo::new();
        worlds.expect_count_for_user().returning(|_| Ok(1));
        worlds.expect_insert_seed().never();

        let seeder = SeedDemoWorld::new(Arc::new(worlds), fixed_clock());
        assert!(!seeder.execute(UserId::new()).await.expect("seed"));
    }
}
