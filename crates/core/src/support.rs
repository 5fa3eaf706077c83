//! Support request and response envelope types.
//!
//! These are the value objects that cross the orchestrator boundary:
//! a caller hands in a [`SupportRequest`], the pipeline runs
//! state → mode → prompt → generation, and a [`SupportEnvelope`] comes
//! back with the outcome and the derived flags.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;
use crate::flight::{FlightContext, FlightPhase};
use crate::mode::SupportMode;
use crate::state::Trend;

/// An inbound support interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportRequest {
    /// Stable traveler identifier
    pub user_id: String,

    /// The traveler's message, verbatim
    pub user_message: String,

    /// Self-reported anxiety; must be within [0,10]
    pub anxiety_level: i32,

    /// Caller-supplied flight snapshot; resolved from the telemetry
    /// source or the static default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight: Option<FlightContext>,
}

impl SupportRequest {
    /// Validate client input. Runs before any state mutation or
    /// external call; failures are client errors, never side-effecting.
    pub fn validate(&self) -> Result<(), Error> {
        if self.user_id.trim().is_empty() {
            return Err(Error::input("user_id must not be empty"));
        }
        if self.user_message.trim().is_empty() {
            return Err(Error::input("user_message must not be empty"));
        }
        if !(0..=10).contains(&self.anxiety_level) {
            return Err(Error::input(format!(
                "anxiety_level must be between 0 and 10, got {}",
                self.anxiety_level
            )));
        }
        Ok(())
    }
}

/// Structured failure surfaced inside the envelope instead of an HTTP
/// error. The message is user-facing and never echoes upstream
/// internals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvelopeError {
    /// Stable machine-readable kind (e.g. "generation_unavailable")
    pub kind: String,

    /// Short user-facing message
    pub message: String,
}

impl EnvelopeError {
    /// The generic failure reported when the generation capability is
    /// down, timing out, or returning garbage.
    pub fn generation_unavailable() -> Self {
        Self {
            kind: "generation_unavailable".into(),
            message: "The companion is temporarily unavailable. Please try again in a moment."
                .into(),
        }
    }
}

/// The outcome of one support interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportEnvelope {
    /// Generated response text; absent when generation failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_text: Option<String>,

    /// The support mode the policy selected
    pub mode: SupportMode,

    /// Anxiety level after the state update committed
    pub anxiety_level: u8,

    /// Derived trend after the update
    pub trend: Trend,

    /// Consecutive high-anxiety streak after the update
    pub spikes_in_row: u32,

    /// Whether the resolved context carried alert-level turbulence
    pub turbulence_alert: bool,

    /// Phase of flight the response was built against
    pub phase: FlightPhase,

    /// Wall-clock time spent in the pipeline, including the generation call
    pub processing_time_ms: u64,

    /// Correlation id for this interaction
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<Uuid>,

    /// Structured failure, if the generation call did not succeed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<EnvelopeError>,
}
