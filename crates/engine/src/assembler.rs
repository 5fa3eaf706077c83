//! Prompt assembly — deterministic instruction-payload construction.
//!
//! Builds the exact text handed to the generation capability from four
//! context sections:
//!
//! 1. **Persona** (tone rules, 5-step response shape) — identical across
//!    modes, never varies
//! 2. **Support Mode** (goal, mode-specific instructions) — the only
//!    part that varies by mode
//! 3. **Flight Situation** — bounded summary; missing fields render as
//!    the literal word "unknown", never silently omitted
//! 4. **Traveler State** — bounded summary with truncated excerpts
//!
//! Assembly is deterministic: identical inputs always produce identical
//! payloads. The traveler's own message is passed through untouched.

use calmwing_core::flight::FlightContext;
use calmwing_core::generator::InstructionPayload;
use calmwing_core::mode::SupportMode;
use calmwing_core::state::EmotionalState;

/// Character budget for each historical message excerpt.
const EXCERPT_LIMIT: usize = 120;
/// Marker appended to truncated excerpts.
const EXCERPT_MARKER: &str = "…[truncated]";
/// How many trailing history excerpts the state summary includes.
const MAX_HISTORY_EXCERPTS: usize = 3;

/// Persona and behavior rules shared by every mode. The closing line is
/// the content contract: the generation step is told, in text, that it
/// may not invent flight specifics — the assembler cannot enforce that
/// on the model, so it encodes it in the instructions.
const PERSONA: &str = "\
You are Calmwing, a calm, grounded in-flight companion for anxious travelers. \
You speak like a steady friend who knows aviation well: plain words, no jargon \
unless you explain it, no false cheer, no minimizing. Never scold, never rush.

Shape every response in five steps:
1. Acknowledge what the traveler is feeling, in their words.
2. Normalize it: many travelers feel this, and it makes sense.
3. Orient them with the flight context you were given.
4. Guide one calming action they can take right now.
5. Offer one small next step or invitation to keep talking.

Only state flight specifics that appear in the Flight Situation section below. \
If something is listed as unknown, say so honestly rather than guessing. Never \
invent altitudes, timings, weather, or crew actions you were not given.";

/// The prompt assembler. Stateless — create one and reuse it.
#[derive(Debug, Clone, Default)]
pub struct PromptAssembler;

impl PromptAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Build the instruction payload for one interaction.
    ///
    /// `domain_note` is an optional pre-written explanation of some
    /// aviation topic to weave in; `history` overrides the state's own
    /// message history as the source of excerpts (at most the last
    /// three are used either way).
    pub fn build(
        &self,
        mode: SupportMode,
        user_message: &str,
        state: &EmotionalState,
        flight: &FlightContext,
        domain_note: Option<&str>,
        history: Option<&[String]>,
    ) -> InstructionPayload {
        let config = mode.config();

        let mut system = String::with_capacity(2048);
        system.push_str(PERSONA);

        system.push_str("\n\n[Support Mode: ");
        system.push_str(config.name);
        system.push_str("]\nGoal: ");
        system.push_str(config.primary_goal);
        system.push('\n');
        system.push_str(config.extra_instructions);

        system.push_str("\n\n[Flight Situation]\n");
        system.push_str(&summarize_flight(flight));

        system.push_str("\n[Traveler State]\n");
        let excerpt_source = history.unwrap_or(&state.message_history);
        system.push_str(&summarize_state(state, excerpt_source));

        if let Some(note) = domain_note {
            system.push_str("\n[Background Explanation]\n");
            system.push_str(note);
            system.push('\n');
        }

        InstructionPayload::new(system, user_message)
    }
}

/// Bounded natural-language description of the flight snapshot.
/// Unknown phase and turbulence are spelled out, so the generation step
/// is never misled into inferring false precision.
fn summarize_flight(flight: &FlightContext) -> String {
    let mut out = String::new();
    out.push_str(&format!("Phase of flight: {}\n", flight.phase));
    out.push_str(&format!("Turbulence forecast: {}\n", flight.turbulence));

    if let Some(route) = &flight.route_summary {
        out.push_str(&format!("Route: {}\n", route));
    }
    if let Some(activities) = &flight.pilot_activities {
        out.push_str(&format!("Crew is currently: {}\n", activities));
    }
    if let Some(altitude) = flight.altitude_ft {
        out.push_str(&format!("Altitude: {} ft\n", altitude));
    }
    if let Some(speed) = flight.ground_speed_kts {
        out.push_str(&format!("Ground speed: {} kts\n", speed));
    }

    out
}

/// Bounded description of the traveler's aggregate state. History
/// length never grows the payload past the fixed excerpt budget.
fn summarize_state(state: &EmotionalState, history: &[String]) -> String {
    let mut out = String::new();
    out.push_str(&format!("Current anxiety: {}/10\n", state.anxiety_level));

    match state.average_anxiety() {
        Some(avg) => out.push_str(&format!("Session average: {:.1}/10\n", avg)),
        None => out.push_str("Session average: unknown\n"),
    }

    out.push_str(&format!("Trend: {}\n", state.trend));
    out.push_str(&format!(
        "Consecutive high-anxiety messages: {}\n",
        state.spikes_in_row
    ));

    let start = history.len().saturating_sub(MAX_HISTORY_EXCERPTS);
    let recent = &history[start..];
    if !recent.is_empty() {
        out.push_str("Recent messages:\n");
        for message in recent {
            out.push_str(&format!("- \"{}\"\n", truncate_excerpt(message)));
        }
    }

    out
}

/// Truncate an excerpt to [`EXCERPT_LIMIT`] characters including the
/// marker. Operates on character boundaries, so multi-byte text is
/// never split mid-codepoint.
fn truncate_excerpt(message: &str) -> String {
    if message.chars().count() <= EXCERPT_LIMIT {
        return message.to_string();
    }
    let keep = EXCERPT_LIMIT - EXCERPT_MARKER.chars().count();
    let mut out: String = message.chars().take(keep).collect();
    out.push_str(EXCERPT_MARKER);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use calmwing_core::flight::{FlightPhase, Turbulence};
    use calmwing_core::state::Trend;

    fn test_state() -> EmotionalState {
        let mut state = EmotionalState::new();
        state.anxiety_level = 6;
        state.anxiety_history = vec![4, 5, 6];
        state.message_history = vec![
            "boarding now".into(),
            "engines are loud".into(),
            "we're speeding up".into(),
        ];
        state.trend = Trend::Rising;
        state.spikes_in_row = 0;
        state.last_message = "we're speeding up".into();
        state
    }

    fn test_flight() -> FlightContext {
        FlightContext {
            phase: FlightPhase::Climb,
            turbulence: Turbulence::Light,
            route_summary: Some("SFO → JFK, 4h 50m remaining".into()),
            pilot_activities: Some("retracting flaps and following the departure route".into()),
            altitude_ft: Some(12_000),
            ground_speed_kts: Some(310),
        }
    }

    #[test]
    fn payload_contains_all_sections() {
        let assembler = PromptAssembler::new();
        let payload = assembler.build(
            SupportMode::CalmReframe,
            "is this normal?",
            &test_state(),
            &test_flight(),
            None,
            None,
        );

        assert!(payload.system_instructions.contains("[Support Mode: calm_reframe]"));
        assert!(payload.system_instructions.contains("[Flight Situation]"));
        assert!(payload.system_instructions.contains("[Traveler State]"));
        assert!(payload.system_instructions.contains("climbing"));
        assert!(payload.system_instructions.contains("SFO → JFK"));
        assert!(payload.system_instructions.contains("Current anxiety: 6/10"));
        assert!(payload.system_instructions.contains("Trend: rising"));
    }

    #[test]
    fn user_message_passes_through_untouched() {
        let assembler = PromptAssembler::new();
        let long_message = "a".repeat(5000);
        let payload = assembler.build(
            SupportMode::Baseline,
            &long_message,
            &test_state(),
            &test_flight(),
            None,
            None,
        );
        assert_eq!(payload.user_content, long_message);
    }

    #[test]
    fn unknown_fields_render_explicitly() {
        let assembler = PromptAssembler::new();
        let payload = assembler.build(
            SupportMode::Baseline,
            "hello",
            &EmotionalState::new(),
            &FlightContext::unknown(),
            None,
            None,
        );

        assert!(payload.system_instructions.contains("Phase of flight: unknown"));
        assert!(payload.system_instructions.contains("Turbulence forecast: unknown"));
        assert!(payload.system_instructions.contains("Session average: unknown"));
        // Absent optionals are not rendered at all.
        assert!(!payload.system_instructions.contains("Route:"));
        assert!(!payload.system_instructions.contains("Altitude:"));
    }

    #[test]
    fn only_last_three_excerpts_included() {
        let assembler = PromptAssembler::new();
        let mut state = test_state();
        state.message_history = (0..10).map(|i| format!("message number {}", i)).collect();

        let payload = assembler.build(
            SupportMode::Baseline,
            "hi",
            &state,
            &test_flight(),
            None,
            None,
        );

        assert!(payload.system_instructions.contains("message number 9"));
        assert!(payload.system_instructions.contains("message number 7"));
        assert!(!payload.system_instructions.contains("message number 6"));
    }

    #[test]
    fn long_excerpts_are_truncated_with_marker() {
        let long = "turbulence ".repeat(30);
        let truncated = truncate_excerpt(&long);
        assert!(truncated.contains(EXCERPT_MARKER));
        assert!(truncated.chars().count() <= EXCERPT_LIMIT);
    }

    #[test]
    fn short_excerpts_are_untouched() {
        let short = "a short message";
        assert_eq!(truncate_excerpt(short), short);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let multibyte = "тревога ".repeat(40);
        let truncated = truncate_excerpt(&multibyte);
        assert!(truncated.chars().count() <= EXCERPT_LIMIT);
        assert!(truncated.contains(EXCERPT_MARKER));
    }

    #[test]
    fn domain_note_is_included_when_present() {
        let assembler = PromptAssembler::new();
        let payload = assembler.build(
            SupportMode::TurbulenceSupport,
            "why are we bumping?",
            &test_state(),
            &test_flight(),
            Some("Turbulence is caused by air currents, like waves on water."),
            None,
        );
        assert!(payload.system_instructions.contains("[Background Explanation]"));
        assert!(payload.system_instructions.contains("waves on water"));
    }

    #[test]
    fn explicit_history_overrides_state_history() {
        let assembler = PromptAssembler::new();
        let history = vec!["from the caller".to_string()];
        let payload = assembler.build(
            SupportMode::Baseline,
            "hi",
            &test_state(),
            &test_flight(),
            None,
            Some(&history),
        );
        assert!(payload.system_instructions.contains("from the caller"));
        assert!(!payload.system_instructions.contains("boarding now"));
    }

    #[test]
    fn assembly_is_deterministic() {
        let assembler = PromptAssembler::new();
        let state = test_state();
        let flight = test_flight();

        let first = assembler.build(SupportMode::Grounding, "help", &state, &flight, None, None);
        let second = assembler.build(SupportMode::Grounding, "help", &state, &flight, None, None);
        assert_eq!(first, second);
    }

    #[test]
    fn persona_is_identical_across_modes() {
        let assembler = PromptAssembler::new();
        let state = test_state();
        let flight = test_flight();

        for mode in SupportMode::ALL {
            let payload = assembler.build(mode, "hi", &state, &flight, None, None);
            assert!(payload.system_instructions.starts_with(PERSONA));
            assert!(payload.system_instructions.contains("Acknowledge"));
        }
    }
}
