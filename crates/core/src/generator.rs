//! Generator trait — the abstraction over the text-generation capability.
//!
//! A Generator takes a fully-assembled [`InstructionPayload`] and
//! returns generated text. One best-effort attempt per request; retry
//! and backoff are deliberately not this layer's concern.
//!
//! Implementations: Anthropic Messages API, deterministic mock.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GeneratorError;

/// The exact, fully-interpolated text handed to the generation
/// capability. Immutable once built; nothing downstream rewrites it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionPayload {
    /// Persona, behavior rules, mode goal, and summarized context
    pub system_instructions: String,

    /// The traveler's raw message, untouched
    pub user_content: String,
}

impl InstructionPayload {
    pub fn new(system_instructions: impl Into<String>, user_content: impl Into<String>) -> Self {
        Self {
            system_instructions: system_instructions.into(),
            user_content: user_content.into(),
        }
    }
}

/// The core Generator trait.
///
/// The orchestrator calls `generate()` exactly once per request without
/// knowing which backend is configured.
#[async_trait]
pub trait Generator: Send + Sync {
    /// A human-readable name for this generator (e.g. "anthropic", "mock").
    fn name(&self) -> &str;

    /// The model identifier requests are sent to.
    fn model(&self) -> &str;

    /// Generate a response for the given payload.
    async fn generate(
        &self,
        payload: &InstructionPayload,
    ) -> std::result::Result<String, GeneratorError>;

    /// Health check — can we reach the backend?
    async fn health_check(&self) -> std::result::Result<bool, GeneratorError> {
        Ok(true)
    }
}
