//! Entity types: the anonymous user principal, worlds, and the five child
//! entity types a world can hold.
//!
//! Child entities are structurally identical (a name field plus a handful of
//! free-form descriptive strings, exclusively owned by one world), so they are
//! generated by `define_child_entity!` and unified behind the [`ChildEntity`]
//! trait. Presentation-level notions like character "relationships" are plain
//! text fields here, not enforced references.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;
use crate::ids::{CharacterId, FactionId, LocationId, MagicId, StoryEventId, UserId, WorldId};

/// The anonymous per-browser principal, keyed by a persistent cookie token.
///
/// Lifecycle: created on first request (or re-created under the same token if
/// the record was reaped), `last_visited` refreshed on every authenticated
/// request, deleted by the inactivity reaper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub created_at: DateTime<Utc>,
    pub last_visited: DateTime<Utc>,
}

impl User {
    pub fn new(id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            created_at: now,
            last_visited: now,
        }
    }
}

/// A top-level worldbuilding project owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct World {
    pub id: WorldId,
    pub user_id: UserId,
    pub name: String,
    pub summary: String,
    pub created_at: DateTime<Utc>,
}

impl World {
    /// Validating constructor for user-supplied input.
    pub fn create(
        user_id: UserId,
        name: impl Into<String>,
        summary: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("name is required"));
        }
        Ok(Self::new(user_id, name, summary, now))
    }

    pub fn new(
        user_id: UserId,
        name: impl Into<String>,
        summary: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: WorldId::new(),
            user_id,
            name: name.into(),
            summary: summary.into(),
            created_at: now,
        }
    }
}

/// The five child entity types a world can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Character,
    Location,
    Magic,
    Faction,
    StoryEvent,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Character,
        EntityKind::Location,
        EntityKind::Magic,
        EntityKind::Faction,
        EntityKind::StoryEvent,
    ];

    /// Storage table name.
    pub fn table(self) -> &'static str {
        match self {
            EntityKind::Character => "characters",
            EntityKind::Location => "locations",
            EntityKind::Magic => "magics",
            EntityKind::Faction => "factions",
            EntityKind::StoryEvent => "story_events",
        }
    }

    /// Label used in "not found" responses.
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Character => "Character",
            EntityKind::Location => "Location",
            EntityKind::Magic => "Magic",
            EntityKind::Faction => "Faction",
            EntityKind::StoryEvent => "Event",
        }
    }

    /// Rejection text when a world is at this type's ceiling. The wording
    /// varies slightly per type; clients display it verbatim.
    pub fn quota_message(self) -> &'static str {
        match self {
            EntityKind::Character => {
                "Maximum 10 characters per world. Delete a character to create a new one."
            }
            EntityKind::Location => {
                "Maximum 10 locations per world. Delete a location to create a new one."
            }
            EntityKind::Magic => "Maximum 10 magics per world. Delete one to create a new one.",
            EntityKind::Faction => {
                "Maximum 10 factions per world. Delete a faction to create a new one."
            }
            EntityKind::StoryEvent => {
                "Maximum 10 events per world. Delete an event to create a new one."
            }
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Common shape of the five child entity types.
///
/// `Draft` is the user-editable field set (everything except id, owner and
/// timestamp); creates and full updates both speak in drafts.
pub trait ChildEntity: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    type Draft: Clone + Send + Sync + Serialize + DeserializeOwned + 'static;

    const KIND: EntityKind;

    fn new(world_id: WorldId, draft: Self::Draft, now: DateTime<Utc>) -> Self;
    /// Validating constructor for user-supplied drafts; trusted content (the
    /// demo seed) goes through [`Self::new`] directly.
    fn try_new(
        world_id: WorldId,
        draft: Self::Draft,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError>;
    fn id(&self) -> Uuid;
    fn world_id(&self) -> WorldId;
    fn created_at(&self) -> DateTime<Utc>;
    /// Replace all user-editable fields.
    fn apply(&mut self, draft: Self::Draft);
    fn display_name(&self) -> &str;
}

macro_rules! define_child_entity {
    (
        $entity:ident, $draft:ident, $id:ident, $kind:ident,
        name: $name_field:ident,
        fields: [$($field:ident),* $(,)?]
    ) => {
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $entity {
            pub id: $id,
            pub world_id: WorldId,
            pub $name_field: String,
            $(
                #[serde(default)]
                pub $field: String,
            )*
            pub created_at: DateTime<Utc>,
        }

        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $draft {
            #[serde(default)]
            pub $name_field: String,
            $(
                #[serde(default)]
                pub $field: String,
            )*
        }

        impl ChildEntity for $entity {
            type Draft = $draft;

            const KIND: EntityKind = EntityKind::$kind;

            fn new(world_id: WorldId, draft: $draft, now: DateTime<Utc>) -> Self {
                Self {
                    id: $id::new(),
                    world_id,
                    $name_field: draft.$name_field,
                    $( $field: draft.$field, )*
                    created_at: now,
                }
            }

            fn try_new(
                world_id: WorldId,
                draft: $draft,
                now: DateTime<Utc>,
            ) -> Result<Self, DomainError> {
                if draft.$name_field.trim().is_empty() {
                    return Err(DomainError::validation(concat!(
                        stringify!($name_field),
                        " is required"
                    )));
                }
                Ok(Self::new(world_id, draft, now))
            }

            fn id(&self) -> Uuid {
                self.id.to_uuid()
            }

            fn world_id(&self) -> WorldId {
                self.world_id
            }

            fn created_at(&self) -> DateTime<Utc> {
                self.created_at
            }

            fn apply(&mut self, draft: $draft) {
                self.$name_field = draft.$name_field;
                $( self.$field = draft.$field; )*
            }

            fn display_name(&self) -> &str {
                &self.$name_field
            }
        }
    };
}

define_child_entity!(
    Character, CharacterDraft, CharacterId, Character,
    name: name,
    fields: [role, age, description, personality, backstory, strengths, weaknesses]
);

define_child_entity!(
    Location, LocationDraft, LocationId, Location,
    name: name,
    fields: [r#type, population, climate, description, history]
);

define_child_entity!(
    Magic, MagicDraft, MagicId, Magic,
    name: name,
    fields: [category, description, rules, limitations, costs, examples]
);

define_child_entity!(
    Faction, FactionDraft, FactionId, Faction,
    name: name,
    fields: [r#type, leader, description, goals, conflicts]
);

define_child_entity!(
    StoryEvent, StoryEventDraft, StoryEventId, StoryEvent,
    name: title,
    fields: [date, description, location, characters_involved, outcome]
);

/// A world plus the full child batches it is born with.
///
/// Used by the demo seeder so the whole aggregate can be persisted in one
/// transaction.
#[derive(Debug, Clone)]
pub struct WorldSeed {
    pub world: World,
    pub characters: Vec<Character>,
    pub locations: Vec<Location>,
    pub magics: Vec<Magic>,
    pub factions: Vec<Faction>,
    pub events: Vec<StoryEvent>,
}
