//! Static telemetry source — deterministic mock flight data.
//!
//! In production the HTTP source proxies a real telemetry API. The
//! static source returns plausible context derived from the flight
//! number alone, so the whole pipeline can run end-to-end without
//! network access, and identical queries always produce identical
//! context.

use async_trait::async_trait;
use calmwing_core::error::FlightError;
use calmwing_core::flight::{FlightContext, FlightPhase, FlightQuery, FlightSource, Turbulence};

pub struct StaticFlightSource;

/// The default context substituted when a request carries no flight
/// snapshot: an uneventful mid-cruise.
pub fn default_context() -> FlightContext {
    FlightContext {
        phase: FlightPhase::Cruise,
        turbulence: Turbulence::None,
        route_summary: None,
        pilot_activities: Some("monitoring systems and talking with air traffic control".into()),
        altitude_ft: Some(35_000),
        ground_speed_kts: Some(460),
    }
}

#[async_trait]
impl FlightSource for StaticFlightSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch(&self, query: &FlightQuery) -> Result<FlightContext, FlightError> {
        if query.flight_number.trim().is_empty() {
            return Err(FlightError::NotFound("empty flight number".into()));
        }
        Ok(generate_mock_context(&query.flight_number))
    }
}

/// Generate deterministic mock context based on the flight number hash.
fn generate_mock_context(flight_number: &str) -> FlightContext {
    let hash: u32 = flight_number
        .bytes()
        .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32));

    let phases = [
        FlightPhase::Gate,
        FlightPhase::Taxi,
        FlightPhase::Takeoff,
        FlightPhase::Climb,
        FlightPhase::Cruise,
        FlightPhase::Cruise,
        FlightPhase::Descent,
        FlightPhase::Approach,
    ];
    let turbulence_levels = [
        Turbulence::None,
        Turbulence::None,
        Turbulence::None,
        Turbulence::Light,
        Turbulence::Light,
        Turbulence::Moderate,
    ];
    let activities = [
        "monitoring systems and talking with air traffic control",
        "running through the descent checklist",
        "adjusting course around weather ahead",
        "handing over radio frequencies at a sector boundary",
    ];

    let phase = phases[hash as usize % phases.len()];
    let turbulence = turbulence_levels[(hash as usize / 7) % turbulence_levels.len()];

    let (altitude_ft, ground_speed_kts) = match phase {
        FlightPhase::Gate | FlightPhase::Taxi => (None, Some(5 + hash % 20)),
        FlightPhase::Takeoff => (Some(500 + hash % 1_500), Some(150 + hash % 30)),
        FlightPhase::Climb => (Some(8_000 + hash % 20_000), Some(280 + hash % 60)),
        FlightPhase::Descent | FlightPhase::Approach => {
            (Some(3_000 + hash % 15_000), Some(220 + hash % 60))
        }
        _ => (Some(33_000 + (hash % 8) * 1_000), Some(430 + hash % 80)),
    };

    FlightContext {
        phase,
        turbulence,
        route_summary: Some(format!("flight {} is on its filed route", flight_number)),
        pilot_activities: Some(activities[(hash as usize / 3) % activities.len()].into()),
        altitude_ft,
        ground_speed_kts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(flight_number: &str) -> FlightQuery {
        FlightQuery {
            flight_number: flight_number.into(),
            date: None,
        }
    }

    #[tokio::test]
    async fn fetch_returns_context() {
        let source = StaticFlightSource;
        let ctx = source.fetch(&query("UA328")).await.unwrap();
        assert!(ctx.route_summary.unwrap().contains("UA328"));
        assert!(ctx.pilot_activities.is_some());
    }

    #[tokio::test]
    async fn deterministic_results() {
        let source = StaticFlightSource;
        let first = source.fetch(&query("BA117")).await.unwrap();
        let second = source.fetch(&query("BA117")).await.unwrap();
        assert_eq!(first.phase, second.phase);
        assert_eq!(first.turbulence, second.turbulence);
        assert_eq!(first.altitude_ft, second.altitude_ft);
    }

    #[tokio::test]
    async fn empty_flight_number_is_not_found() {
        let source = StaticFlightSource;
        let result = source.fetch(&query("  ")).await;
        assert!(matches!(result, Err(FlightError::NotFound(_))));
    }

    #[test]
    fn default_context_is_calm_cruise() {
        let ctx = default_context();
        assert_eq!(ctx.phase, FlightPhase::Cruise);
        assert!(!ctx.turbulence.is_alert());
    }
}
