extern crate self as loreforge_domain;

pub mod entities;
pub mod error;
pub mod ids;
pub mod limits;

pub use entities::{
    Character, CharacterDraft, ChildEntity, EntityKind, Faction, FactionDraft, Location,
    LocationDraft, Magic, MagicDraft, StoryEvent, StoryEventDraft, User, World, WorldSeed,
};
pub use error::DomainError;
pub use ids::{CharacterId, FactionId, LocationId, MagicId, StoryEventId, UserId, WorldId};
pub use limits::{DEFAULT_RETENTION_DAYS, MAX_ENTITIES_PER_TYPE, MAX_WORLDS_PER_USER};
