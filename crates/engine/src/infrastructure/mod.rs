//! External dependency implementations: persistence, the LLM client, and the
//! port traits they plug into.

pub mod clock;
pub mod ollama;
pub mod ports;
pub mod sqlite;
