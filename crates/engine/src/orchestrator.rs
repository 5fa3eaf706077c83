//! Orchestrator — sequences the pipeline and makes the one generation call.
//!
//! validate → update state → resolve flight → select mode → build
//! payload → generate → envelope. Validation failures are rejected
//! before any side effect; the state update commits before the
//! generation call and is never rolled back (an accepted at-most-once
//! side effect). Generation failures are recovered here and surfaced
//! as a structured error inside the envelope, never thrown to the
//! caller.

use std::sync::Arc;
use std::time::Instant;

use calmwing_core::error::Error;
use calmwing_core::flight::FlightContext;
use calmwing_core::generator::Generator;
use calmwing_core::mode::SupportMode;
use calmwing_core::support::{EnvelopeError, SupportEnvelope, SupportRequest};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::assembler::PromptAssembler;
use crate::selector::select_mode;
use crate::state::StateStore;

/// The request pipeline. One instance serves all travelers.
pub struct Orchestrator {
    store: Arc<StateStore>,
    generator: Arc<dyn Generator>,
    assembler: PromptAssembler,
    /// Substituted when the caller supplies no flight snapshot.
    fallback_flight: FlightContext,
}

impl Orchestrator {
    pub fn new(store: Arc<StateStore>, generator: Arc<dyn Generator>) -> Self {
        Self {
            store,
            generator,
            assembler: PromptAssembler::new(),
            fallback_flight: FlightContext::unknown(),
        }
    }

    /// Set the static default context used when a request carries none.
    pub fn with_fallback_flight(mut self, flight: FlightContext) -> Self {
        self.fallback_flight = flight;
        self
    }

    /// Run one interaction through the pipeline.
    ///
    /// Returns `Err` only for client input errors (nothing has happened
    /// yet) and internal defects; a failed generation call returns `Ok`
    /// with the failure recorded in the envelope.
    pub async fn process(&self, request: SupportRequest) -> Result<SupportEnvelope, Error> {
        request.validate()?;
        let started = Instant::now();
        let request_id = Uuid::new_v4();

        // From here on the state update is committed, success or not.
        let state = self
            .store
            .update(&request.user_id, &request.user_message, request.anxiety_level)
            .await;

        let flight = request
            .flight
            .clone()
            .unwrap_or_else(|| self.fallback_flight.clone());

        let mode = select_mode(state.anxiety_level, &state, &flight);
        debug!(request_id = %request_id, mode = %mode, "mode selected");

        // History excerpts are the messages before this one.
        let prior = &state.message_history[..state.message_history.len() - 1];
        let payload = self.assembler.build(
            mode,
            &request.user_message,
            &state,
            &flight,
            domain_note_for(mode),
            Some(prior),
        );

        let (response_text, error) = match self.generator.generate(&payload).await {
            Ok(text) => (Some(text), None),
            Err(e) => {
                warn!(request_id = %request_id, error = %e, "generation call failed");
                (None, Some(EnvelopeError::generation_unavailable()))
            }
        };

        let processing_time_ms = started.elapsed().as_millis() as u64;
        info!(
            request_id = %request_id,
            user_id = %request.user_id,
            mode = %mode,
            elapsed_ms = processing_time_ms,
            ok = response_text.is_some(),
            "support request processed"
        );

        Ok(SupportEnvelope {
            response_text,
            mode,
            anxiety_level: state.anxiety_level,
            trend: state.trend,
            spikes_in_row: state.spikes_in_row,
            turbulence_alert: flight.turbulence.is_alert(),
            phase: flight.phase,
            processing_time_ms,
            request_id: Some(request_id),
            error,
        })
    }
}

/// Pre-written aviation explainers attached to the modes where a
/// factual anchor helps. Everything here is generic knowledge, not
/// flight-specific data, so it cannot contradict the context summary.
fn domain_note_for(mode: SupportMode) -> Option<&'static str> {
    match mode {
        SupportMode::TurbulenceSupport => Some(
            "Turbulence is the aircraft crossing currents of moving air, like a boat \
             crossing waves. It is uncomfortable, not dangerous: airframes are \
             certified for stresses far beyond any turbulence encountered in service, \
             and crews route around the worst of it using forecasts and reports from \
             aircraft ahead.",
        ),
        SupportMode::TakeoffSpike => Some(
            "Takeoff follows a fixed script: engines reach full power, the nose \
             lifts, the landing gear thumps as it retracts, and the engines quiet \
             noticeably a minute or two later as the aircraft settles into its climb. \
             Each of those sounds is planned.",
        ),
        SupportMode::LandingAnticipation => Some(
            "Descent and landing are the most practiced part of every flight. The \
             engines quiet because less power is needed going downhill; rumbles are \
             flaps and landing gear extending, each on a checklist the crew flies \
             many times a week.",
        ),
        _ => None,
    }
}
