//! Mock generator — deterministic canned responses for tests and
//! offline runs.
//!
//! The response varies with the payload so transcripts look plausible,
//! but identical payloads always produce identical text, which keeps
//! end-to-end tests stable without network access.

use async_trait::async_trait;
use calmwing_core::error::GeneratorError;
use calmwing_core::generator::{Generator, InstructionPayload};

pub struct MockGenerator {
    fail: bool,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self { fail: false }
    }

    /// A mock that always fails — for exercising the failure path.
    pub fn failing() -> Self {
        Self { fail: true }
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

const OPENINGS: [&str; 4] = [
    "I hear you — that feeling is real, and you're not alone in it.",
    "Thank you for telling me. What you're feeling makes complete sense.",
    "I'm right here with you. Lots of travelers feel exactly this.",
    "That sounds uncomfortable, and it's okay that it got your attention.",
];

#[async_trait]
impl Generator for MockGenerator {
    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-companion-1"
    }

    async fn generate(
        &self,
        payload: &InstructionPayload,
    ) -> std::result::Result<String, GeneratorError> {
        if self.fail {
            return Err(GeneratorError::ApiError {
                status_code: 503,
                message: "mock generator configured to fail".into(),
            });
        }

        // Simple hash for deterministic but varied openings.
        let hash: u32 = payload
            .user_content
            .bytes()
            .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32));
        let opening = OPENINGS[hash as usize % OPENINGS.len()];

        Ok(format!(
            "{} Let's take one slow breath together — in for four, out for six. \
             When you're ready, tell me how it feels now.",
            opening
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn responses_are_deterministic() {
        let generator = MockGenerator::new();
        let payload = InstructionPayload::new("system", "the wing is flexing");

        let first = generator.generate(&payload).await.unwrap();
        let second = generator.generate(&payload).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn different_messages_can_vary() {
        let generator = MockGenerator::new();
        let a = generator
            .generate(&InstructionPayload::new("s", "first message"))
            .await
            .unwrap();
        let b = generator
            .generate(&InstructionPayload::new("s", "a rather different message"))
            .await
            .unwrap();
        // Both are valid responses; both end with the same invitation.
        assert!(a.contains("breath"));
        assert!(b.contains("breath"));
    }

    #[tokio::test]
    async fn failing_mock_fails() {
        let generator = MockGenerator::failing();
        let result = generator
            .generate(&InstructionPayload::new("s", "hello"))
            .await;
        assert!(matches!(result, Err(GeneratorError::ApiError { .. })));
    }
}
