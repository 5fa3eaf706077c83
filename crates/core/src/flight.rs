//! Flight-context domain types and the telemetry source trait.
//!
//! A [`FlightContext`] is a read-only snapshot supplied per request: the
//! decision pipeline only reads it and never persists it. Where the
//! snapshot comes from (caller-supplied, telemetry proxy, static
//! default) is the concern of the [`FlightSource`] implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::FlightError;

/// Phase of flight at the time of the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlightPhase {
    Gate,
    Taxi,
    Takeoff,
    Climb,
    Cruise,
    Descent,
    Approach,
    Landing,
    Unknown,
}

impl FlightPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlightPhase::Gate => "at the gate",
            FlightPhase::Taxi => "taxiing",
            FlightPhase::Takeoff => "taking off",
            FlightPhase::Climb => "climbing",
            FlightPhase::Cruise => "cruising",
            FlightPhase::Descent => "descending",
            FlightPhase::Approach => "on approach",
            FlightPhase::Landing => "landing",
            FlightPhase::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for FlightPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Forecast or reported turbulence intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Turbulence {
    None,
    Light,
    Moderate,
    Severe,
    Unknown,
}

impl Turbulence {
    /// Moderate or severe turbulence is safety-relevant and overrides
    /// every other mode-selection rule.
    pub fn is_alert(&self) -> bool {
        matches!(self, Turbulence::Moderate | Turbulence::Severe)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Turbulence::None => "none",
            Turbulence::Light => "light",
            Turbulence::Moderate => "moderate",
            Turbulence::Severe => "severe",
            Turbulence::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Turbulence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Read-only snapshot of the current flight situation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightContext {
    /// Current phase of flight
    pub phase: FlightPhase,

    /// Turbulence forecast for the near term
    pub turbulence: Turbulence,

    /// Short route description (e.g. "SFO → JFK, 2h 40m remaining")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_summary: Option<String>,

    /// What the flight crew is currently doing, in plain language
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pilot_activities: Option<String>,

    /// Current altitude in feet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude_ft: Option<u32>,

    /// Current ground speed in knots
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ground_speed_kts: Option<u32>,
}

impl FlightContext {
    /// The fallback context when no telemetry is available: everything
    /// explicitly unknown, never fabricated.
    pub fn unknown() -> Self {
        Self {
            phase: FlightPhase::Unknown,
            turbulence: Turbulence::Unknown,
            route_summary: None,
            pilot_activities: None,
            altitude_ft: None,
            ground_speed_kts: None,
        }
    }
}

impl Default for FlightContext {
    fn default() -> Self {
        Self::unknown()
    }
}

/// Parameters for a telemetry lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightQuery {
    /// Airline flight number (e.g. "UA328")
    pub flight_number: String,

    /// Scheduled departure date, ISO-8601 (defaults to today upstream)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// The flight-telemetry collaborator.
///
/// Implementations: HTTP telemetry proxy, deterministic static source.
/// The pipeline calls `fetch()` without knowing which source is behind
/// it, and degrades to [`FlightContext::unknown`] when a lookup fails.
#[async_trait]
pub trait FlightSource: Send + Sync {
    /// A human-readable name for this source (e.g. "static", "http").
    fn name(&self) -> &str;

    /// Look up the current context for one flight.
    async fn fetch(&self, query: &FlightQuery)
    -> std::result::Result<FlightContext, FlightError>;

    /// Health check — can we reach the source?
    async fn health_check(&self) -> std::result::Result<bool, FlightError> {
        Ok(true)
    }
}
