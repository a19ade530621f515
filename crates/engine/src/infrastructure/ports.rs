//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete
//! types. Ports exist for:
//! - Database access (could swap SQLite -> Postgres)
//! - LLM calls (could swap Ollama -> Claude/OpenAI)
//! - Clock (for testing)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use loreforge_domain::{ChildEntity, User, UserId, World, WorldId, WorldSeed};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("Not found")]
    NotFound,
    #[error("Database error: {0}")]
    Database(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RepoError {
    pub fn database(context: &str, err: impl std::fmt::Display) -> Self {
        Self::Database(format!("{context}: {err}"))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("LLM request failed: {0}")]
    RequestFailed(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

// =============================================================================
// Database Ports
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn get(&self, id: UserId) -> Result<Option<User>, RepoError>;
    async fn insert(&self, user: &User) -> Result<(), RepoError>;

    /// Refresh `last_visited`. Returns `Ok(false)` when no such user exists,
    /// so the identity resolver can tell "stale cookie" apart without a
    /// second read.
    async fn touch(&self, id: UserId, at: DateTime<Utc>) -> Result<bool, RepoError>;

    /// Delete every user whose `last_visited` is strictly before `cutoff`,
    /// cascading to their worlds and child entities. Each user's cascade is
    /// atomic: a user is removed together with all owned data or not at all.
    /// Returns the number of users deleted.
    async fn reap_inactive(&self, cutoff: DateTime<Utc>) -> Result<u64, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorldRepo: Send + Sync {
    async fn get(&self, id: WorldId) -> Result<Option<World>, RepoError>;
    async fn insert(&self, world: &World) -> Result<(), RepoError>;
    async fn update(&self, world: &World) -> Result<(), RepoError>;

    /// Delete a world and all of its child entities in one transaction.
    async fn delete(&self, id: WorldId) -> Result<(), RepoError>;

    /// Worlds owned by a user, newest first.
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<World>, RepoError>;
    async fn count_for_user(&self, user_id: UserId) -> Result<u32, RepoError>;

    /// Persist a freshly seeded world with all of its child batches in one
    /// transaction, so a failure partway never leaves a half-seeded world.
    async fn insert_seed(&self, seed: &WorldSeed) -> Result<(), RepoError>;
}

/// CRUD over one of the five child entity tables.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChildRepo<T: ChildEntity>: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<T>, RepoError>;
    async fn insert(&self, entity: &T) -> Result<(), RepoError>;
    async fn update(&self, entity: &T) -> Result<(), RepoError>;
    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;
    async fn list_in_world(&self, world_id: WorldId) -> Result<Vec<T>, RepoError>;
    async fn count_in_world(&self, world_id: WorldId) -> Result<u32, RepoError>;
}

// =============================================================================
// External Service Ports
// =============================================================================

/// A fully assembled text-generation request. Prompt construction happens in
/// the use case layer; adapters only speak this normalized contract, never
/// provider-specific payloads.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub prompt: String,
    /// Temperature for response generation (0.0 - 2.0)
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
}

impl LlmRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }
}

/// Response from the LLM
#[derive(Debug, Clone)]
pub struct LlmReply {
    /// The generated text content
    pub text: String,
    /// Token usage, when the provider reports it
    pub usage: Option<TokenUsage>,
}

/// Token usage information
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmPort: Send + Sync {
    async fn generate(&self, request: LlmRequest) -> Result<LlmReply, LlmError>;
}

// =============================================================================
// Testability Ports
// =============================================================================

#[cfg_attr(test, mockall::automock)]
pub trait ClockPort: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
