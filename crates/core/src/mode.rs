//! Support modes and their fixed configurations.
//!
//! A [`SupportMode`] is the discrete support strategy chosen per
//! interaction. Every mode maps to exactly one static [`ModeConfig`];
//! the mapping is an exhaustive `match`, so a mode without a
//! configuration entry is unrepresentable — the compiler enforces the
//! configuration-integrity invariant.

use serde::{Deserialize, Serialize};

/// The closed set of support strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportMode {
    /// Calm companionship when nothing is elevated
    Baseline,
    /// Acute high anxiety outside the takeoff window
    FearSpike,
    /// Active or forecast turbulence, any anxiety level
    TurbulenceSupport,
    /// Acute high anxiety during takeoff or climb
    TakeoffSpike,
    /// Elevated anxiety as the aircraft heads down
    LandingAnticipation,
    /// Sustained or escalating anxiety — slow everything down
    Grounding,
    /// Moderate anxiety — reframe the situation gently
    CalmReframe,
}

impl SupportMode {
    /// Every mode, for totality tests and diagnostics.
    pub const ALL: [SupportMode; 7] = [
        SupportMode::Baseline,
        SupportMode::FearSpike,
        SupportMode::TurbulenceSupport,
        SupportMode::TakeoffSpike,
        SupportMode::LandingAnticipation,
        SupportMode::Grounding,
        SupportMode::CalmReframe,
    ];

    /// The fixed configuration for this mode.
    pub fn config(&self) -> &'static ModeConfig {
        match self {
            SupportMode::Baseline => &BASELINE,
            SupportMode::FearSpike => &FEAR_SPIKE,
            SupportMode::TurbulenceSupport => &TURBULENCE_SUPPORT,
            SupportMode::TakeoffSpike => &TAKEOFF_SPIKE,
            SupportMode::LandingAnticipation => &LANDING_ANTICIPATION,
            SupportMode::Grounding => &GROUNDING,
            SupportMode::CalmReframe => &CALM_REFRAME,
        }
    }
}

impl std::fmt::Display for SupportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.config().name)
    }
}

/// Fixed per-mode instruction record. Only the goal and extra
/// instructions vary between modes; the persona and response shape are
/// shared and live in the assembler.
#[derive(Debug, Clone, Serialize)]
pub struct ModeConfig {
    /// Stable machine-readable name (snake_case)
    pub name: &'static str,
    /// One-line description for diagnostics
    pub description: &'static str,
    /// What the generated response should achieve
    pub primary_goal: &'static str,
    /// Mode-specific behavioral instructions
    pub extra_instructions: &'static str,
}

static BASELINE: ModeConfig = ModeConfig {
    name: "baseline",
    description: "Calm companionship when no signal is elevated",
    primary_goal: "Keep the traveler comfortable and quietly reassured without drawing attention to anxiety they have not expressed.",
    extra_instructions: "Match the traveler's energy. Be warm and conversational. Do not bring up fear, danger, or coping techniques unprompted.",
};

static FEAR_SPIKE: ModeConfig = ModeConfig {
    name: "fear_spike",
    description: "Acute high anxiety outside the takeoff window",
    primary_goal: "De-escalate an acute fear spike right now, before explaining anything.",
    extra_instructions: "Short sentences. Slow the pace. Lead with one immediate physical grounding step (breath, feet on floor, hand on armrest) before any reassurance or facts.",
};

static TURBULENCE_SUPPORT: ModeConfig = ModeConfig {
    name: "turbulence_support",
    description: "Active or forecast turbulence at any anxiety level",
    primary_goal: "Make the turbulence feel expected, bounded, and survivable.",
    extra_instructions: "Name the turbulence directly instead of avoiding it. Explain that the aircraft is designed for far worse, that the crew has a forecast, and that bumps do not mean danger. Suggest tightening the seatbelt as an act of control.",
};

static TAKEOFF_SPIKE: ModeConfig = ModeConfig {
    name: "takeoff_spike",
    description: "Acute high anxiety during takeoff or climb",
    primary_goal: "Carry the traveler through the takeoff window minute by minute.",
    extra_instructions: "Anchor to the timeline: the sounds and sensations of takeoff are scripted and short. Walk through what happens in the next two to three minutes (engine spool, rotation, gear retraction, the first power reduction) and pair each with a breath.",
};

static LANDING_ANTICIPATION: ModeConfig = ModeConfig {
    name: "landing_anticipation",
    description: "Elevated anxiety during descent, approach, or landing",
    primary_goal: "Frame descent and landing as the most rehearsed, controlled part of the flight.",
    extra_instructions: "Explain the normal descent sensations (engine quieting, flap rumble, gear thump) before they happen. Emphasize that the crew flies this exact approach constantly and that the destination is minutes away.",
};

static GROUNDING: ModeConfig = ModeConfig {
    name: "grounding",
    description: "Sustained or escalating anxiety across several messages",
    primary_goal: "Interrupt the escalation loop with a structured grounding exercise.",
    extra_instructions: "Acknowledge that the anxiety has been building rather than treating this message in isolation. Guide one concrete sensory exercise step by step (such as 5-4-3-2-1), one instruction at a time, and invite the traveler to answer as they go.",
};

static CALM_REFRAME: ModeConfig = ModeConfig {
    name: "calm_reframe",
    description: "Moderate anxiety without an acute trigger",
    primary_goal: "Gently reframe the worry toward what is known and controlled.",
    extra_instructions: "Validate the feeling first, then offer one factual reframe drawn from the flight context. Keep it light; this is a nudge, not an intervention.",
};
