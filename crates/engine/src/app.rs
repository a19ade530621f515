//! Application composition.

use std::sync::Arc;

use sqlx::SqlitePool;

use loreforge_domain::{Character, ChildEntity, Faction, Location, Magic, StoryEvent};

use crate::infrastructure::ports::{ChildRepo, ClockPort, LlmPort, UserRepo, WorldRepo};
use crate::infrastructure::sqlite::{SqliteChildRepo, SqliteUserRepo, SqliteWorldRepo};
use crate::use_cases::access::{OwnershipGuard, QuotaEnforcer};
use crate::use_cases::ai::GenerateContent;
use crate::use_cases::session::{ReapInactive, ResolveIdentity, SeedDemoWorld};

/// Runtime settings the HTTP layer needs.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Set the Secure attribute on the identity cookie (TLS deployments).
    pub cookie_secure: bool,
    /// Days of inactivity before an identity is reaped.
    pub retention_days: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cookie_secure: false,
            retention_days: loreforge_domain::DEFAULT_RETENTION_DAYS,
        }
    }
}

/// The composed application: repositories wired into use cases.
pub struct App {
    pub config: AppConfig,
    pub clock: Arc<dyn ClockPort>,

    pub users: Arc<dyn UserRepo>,
    pub worlds: Arc<dyn WorldRepo>,
    pub characters: Arc<dyn ChildRepo<Character>>,
    pub locations: Arc<dyn ChildRepo<Location>>,
    pub magics: Arc<dyn ChildRepo<Magic>>,
    pub factions: Arc<dyn ChildRepo<Faction>>,
    pub events: Arc<dyn ChildRepo<StoryEvent>>,

    pub identity: ResolveIdentity,
    pub guard: OwnershipGuard,
    pub quota: QuotaEnforcer,
    pub reaper: ReapInactive,
    pub generate: GenerateContent,
}

impl App {
    pub fn new(
        pool: SqlitePool,
        llm: Arc<dyn LlmPort>,
        clock: Arc<dyn ClockPort>,
        config: AppConfig,
    ) -> Self {
        let users: Arc<dyn UserRepo> = Arc::new(SqliteUserRepo::new(pool.clone()));
        let worlds: Arc<dyn WorldRepo> = Arc::new(SqliteWorldRepo::new(pool.clone()));
        let characters: Arc<dyn ChildRepo<Character>> =
            Arc::new(SqliteChildRepo::new(pool.clone()));
        let locations: Arc<dyn ChildRepo<Location>> = Arc::new(SqliteChildRepo::new(pool.clone()));
        let magics: Arc<dyn ChildRepo<Magic>> = Arc::new(SqliteChildRepo::new(pool.clone()));
        let factions: Arc<dyn ChildRepo<Faction>> = Arc::new(SqliteChildRepo::new(pool.clone()));
        let events: Arc<dyn ChildRepo<StoryEvent>> = Arc::new(SqliteChildRepo::new(pool));

        let seeder = Arc::new(SeedDemoWorld::new(worlds.clone(), clock.clone()));
        let identity = ResolveIdentity::new(users.clone(), seeder, clock.clone());
        let guard = OwnershipGuard::new(worlds.clone());
        let quota = QuotaEnforcer::new(worlds.clone());
        let reaper = ReapInactive::new(users.clone(), clock.clone(), config.retention_days);
        let generate = GenerateContent::new(llm);

        Self {
            config,
            clock,
            users,
            worlds,
            characters,
            locations,
            magics,
            factions,
            events,
            identity,
            guard,
            quota,
            reaper,
            generate,
        }
    }
}

/// Access to the per-kind child repository, so route handlers can be generic
/// over the five child entity types.
pub trait ChildRepos<T: ChildEntity> {
    fn repo(&self) -> &Arc<dyn ChildRepo<T>>;
}

macro_rules! impl_child_repos {
    ($entity:ty, $field:ident) => {
        impl ChildRepos<$entity> for App {
            fn repo(&self) -> &Arc<dyn ChildRepo<$entity>> {
                &self.$field
            }
        }
    };
}

impl_child_repos!(Character, characters);
impl_child_repos!(Location, locations);
impl_child_repos!(Magic, magics);
impl_child_repos!(Faction, factions);
impl_child_repos!(StoryEvent, events);
