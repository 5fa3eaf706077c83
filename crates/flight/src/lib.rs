//! Flight telemetry sources for Calmwing.
//!
//! All sources implement the `calmwing_core::FlightSource` trait.
//! [`build_flight_source`] selects the right one from configuration;
//! [`batch::evaluate_flights`] fans out over many flights at once.

pub mod batch;
pub mod http;
pub mod static_source;

use std::sync::Arc;

use calmwing_config::AppConfig;
use calmwing_core::error::Error;
use calmwing_core::flight::FlightSource;

pub use batch::{FlightOutcome, evaluate_flights};
pub use http::HttpFlightSource;
pub use static_source::{StaticFlightSource, default_context};

/// Build the configured telemetry source.
pub fn build_flight_source(config: &AppConfig) -> Result<Arc<dyn FlightSource>, Error> {
    match config.flight.source.as_str() {
        "static" => Ok(Arc::new(StaticFlightSource)),
        "http" => {
            let api_url = config
                .flight
                .api_url
                .clone()
                .ok_or_else(|| Error::config("flight source 'http' requires flight.api_url"))?;
            let source = HttpFlightSource::new(api_url, config.flight.api_key.clone());
            Ok(Arc::new(source))
        }
        other => Err(Error::config(format!("unknown flight source '{}'", other))),
    }
}
