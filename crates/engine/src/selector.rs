//! Mode selection policy.
//!
//! A pure decision function: (anxiety level, aggregated state, flight
//! context) → one support mode. The rules are evaluated in strict
//! priority order and the first match wins; the ordering is itself part
//! of the contract, since the categories overlap (severe turbulence at
//! anxiety 9 is turbulence support, not a fear spike).
//!
//! The thresholds encode product behavior, not incidental detail — do
//! not tune them.

use calmwing_core::flight::{FlightContext, FlightPhase, Turbulence};
use calmwing_core::mode::SupportMode;
use calmwing_core::state::{EmotionalState, Trend};

/// Anxiety at or above this is an acute spike.
const FEAR_SPIKE_THRESHOLD: u8 = 8;
/// Anxiety at or above this is elevated enough for a reframe.
const REFRAME_THRESHOLD: u8 = 5;
/// Rising anxiety at or above this escalates to grounding.
const RISING_ESCALATION_THRESHOLD: u8 = 6;
/// This many consecutive spikes escalates to grounding.
const SPIKE_STREAK_THRESHOLD: u32 = 3;

/// Select the support mode for one interaction.
///
/// Deterministic and side-effect free: identical inputs always yield
/// the identical mode, and every reachable input combination yields
/// exactly one.
pub fn select_mode(
    anxiety_level: u8,
    state: &EmotionalState,
    flight: &FlightContext,
) -> SupportMode {
    // 1. Safety-relevant turbulence beats everything else.
    if flight.turbulence.is_alert() {
        return SupportMode::TurbulenceSupport;
    }

    // 2. Acute spike. During the takeoff window the spike gets the
    //    takeoff-specific script.
    if anxiety_level >= FEAR_SPIKE_THRESHOLD {
        return match flight.phase {
            FlightPhase::Takeoff | FlightPhase::Climb => SupportMode::TakeoffSpike,
            _ => SupportMode::FearSpike,
        };
    }

    // 3. Light turbulence only matters once anxiety is elevated.
    if flight.turbulence == Turbulence::Light && anxiety_level >= REFRAME_THRESHOLD {
        return SupportMode::TurbulenceSupport;
    }

    // 4. Sustained or escalating anxiety. An unknown trend never
    //    triggers the rising arm.
    if state.spikes_in_row >= SPIKE_STREAK_THRESHOLD
        || (state.trend == Trend::Rising && anxiety_level >= RISING_ESCALATION_THRESHOLD)
    {
        return SupportMode::Grounding;
    }

    // 5. Elevated but not acute. Heading down gets the landing script.
    if anxiety_level >= REFRAME_THRESHOLD {
        return match flight.phase {
            FlightPhase::Descent | FlightPhase::Approach | FlightPhase::Landing => {
                SupportMode::LandingAnticipation
            }
            _ => SupportMode::CalmReframe,
        };
    }

    // 6. Nothing elevated.
    SupportMode::Baseline
}
