//! HTTP telemetry proxy — fetches flight context from an upstream API.
//!
//! The upstream payload is mapped field by field into [`FlightContext`];
//! anything the upstream omits or that fails to parse becomes an
//! explicit unknown rather than a guess.

use async_trait::async_trait;
use calmwing_core::error::FlightError;
use calmwing_core::flight::{FlightContext, FlightPhase, FlightQuery, FlightSource, Turbulence};
use serde::Deserialize;
use tracing::{debug, warn};

const REQUEST_TIMEOUT_SECS: u64 = 15;

/// Telemetry proxy client.
pub struct HttpFlightSource {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl HttpFlightSource {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            client,
        }
    }
}

#[async_trait]
impl FlightSource for HttpFlightSource {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch(&self, query: &FlightQuery) -> Result<FlightContext, FlightError> {
        let url = format!("{}/v1/flights/{}", self.base_url, query.flight_number);

        debug!(flight = %query.flight_number, "fetching telemetry");

        let mut request = self.client.get(&url);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }
        if let Some(date) = &query.date {
            request = request.query(&[("date", date)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FlightError::Unavailable(e.to_string()))?;

        let status = response.status().as_u16();
        if status == 404 {
            return Err(FlightError::NotFound(query.flight_number.clone()));
        }
        if status != 200 {
            warn!(status, flight = %query.flight_number, "telemetry API error");
            return Err(FlightError::Unavailable(format!(
                "telemetry API returned status {}",
                status
            )));
        }

        let dto: TelemetryDto = response
            .json()
            .await
            .map_err(|e| FlightError::MalformedPayload(e.to_string()))?;

        Ok(dto.into_context())
    }

    async fn health_check(&self) -> Result<bool, FlightError> {
        let url = format!("{}/v1/health", self.base_url);
        match self.client.get(&url).send().await {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(e) => Err(FlightError::Unavailable(e.to_string())),
        }
    }
}

// ── Upstream payload mapping ──────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct TelemetryDto {
    #[serde(default)]
    phase: Option<String>,
    #[serde(default)]
    turbulence: Option<String>,
    #[serde(default)]
    route: Option<String>,
    #[serde(default)]
    pilot_activities: Option<String>,
    #[serde(default)]
    altitude_ft: Option<u32>,
    #[serde(default)]
    ground_speed_kts: Option<u32>,
}

impl TelemetryDto {
    fn into_context(self) -> FlightContext {
        FlightContext {
            phase: self.phase.as_deref().map_or(FlightPhase::Unknown, parse_phase),
            turbulence: self
                .turbulence
                .as_deref()
                .map_or(Turbulence::Unknown, parse_turbulence),
            route_summary: self.route,
            pilot_activities: self.pilot_activities,
            altitude_ft: self.altitude_ft,
            ground_speed_kts: self.ground_speed_kts,
        }
    }
}

fn parse_phase(raw: &str) -> FlightPhase {
    match raw.to_ascii_lowercase().as_str() {
        "gate" => FlightPhase::Gate,
        "taxi" => FlightPhase::Taxi,
        "takeoff" => FlightPhase::Takeoff,
        "climb" => FlightPhase::Climb,
        "cruise" => FlightPhase::Cruise,
        "descent" => FlightPhase::Descent,
        "approach" => FlightPhase::Approach,
        "landing" => FlightPhase::Landing,
        _ => FlightPhase::Unknown,
    }
}

fn parse_turbulence(raw: &str) -> Turbulence {
    match raw.to_ascii_lowercase().as_str() {
        "none" => Turbulence::None,
        "light" => Turbulence::Light,
        "moderate" => Turbulence::Moderate,
        "severe" => Turbulence::Severe,
        _ => Turbulence::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_payload_maps_cleanly() {
        let dto: TelemetryDto = serde_json::from_str(
            r#"{
                "phase": "CRUISE",
                "turbulence": "light",
                "route": "LHR → JFK",
                "pilot_activities": "monitoring",
                "altitude_ft": 37000,
                "ground_speed_kts": 470
            }"#,
        )
        .unwrap();

        let ctx = dto.into_context();
        assert_eq!(ctx.phase, FlightPhase::Cruise);
        assert_eq!(ctx.turbulence, Turbulence::Light);
        assert_eq!(ctx.altitude_ft, Some(37_000));
    }

    #[test]
    fn missing_fields_become_unknown() {
        let dto: TelemetryDto = serde_json::from_str(r#"{}"#).unwrap();
        let ctx = dto.into_context();
        assert_eq!(ctx.phase, FlightPhase::Unknown);
        assert_eq!(ctx.turbulence, Turbulence::Unknown);
        assert!(ctx.route_summary.is_none());
    }

    #[test]
    fn unrecognized_values_become_unknown() {
        assert_eq!(parse_phase("warp"), FlightPhase::Unknown);
        assert_eq!(parse_turbulence("extreme"), Turbulence::Unknown);
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let source = HttpFlightSource::new("http://localhost:9000/", None);
        assert_eq!(source.base_url, "http://localhost:9000");
    }
}
