//! HTTP API gateway for Calmwing.
//!
//! Exposes the decision pipeline over REST:
//!
//! - `POST /v1/support`           — one support interaction
//! - `POST /v1/flights/evaluate`  — batch flight evaluation
//! - `GET  /v1/state/{user_id}`   — traveler state snapshot
//! - `GET  /v1/status`            — runtime status
//!
//! Built on Axum. Input errors map to 400, internal defects to 500;
//! a failed generation call is NOT an HTTP error — it comes back as a
//! structured failure inside a 200 envelope.

pub mod api;

use std::sync::Arc;

use axum::Router;
use axum::http::Method;
use calmwing_config::AppConfig;
use calmwing_core::error::Error;
use calmwing_core::flight::FlightSource;
use calmwing_core::generator::Generator;
use calmwing_engine::{Orchestrator, StateStore};
use chrono::{DateTime, Utc};
use tower_http::cors::CorsLayer;
use tracing::{debug, info};

/// How often the idle-state sweeper runs.
const EVICTION_SWEEP_SECS: u64 = 900;

/// Shared application state for the gateway.
pub struct ApiState {
    pub orchestrator: Orchestrator,
    pub store: Arc<StateStore>,
    pub flight_source: Arc<dyn FlightSource>,
    pub generator_name: String,
    pub model: String,
    pub start_time: DateTime<Utc>,
}

pub type SharedApiState = Arc<ApiState>;

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    api::v1_router(state)
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Wire up collaborators from configuration and serve until shutdown.
pub async fn serve(config: AppConfig) -> Result<(), Error> {
    let generator = calmwing_providers::build_generator(&config)?;
    let flight_source = calmwing_flight::build_flight_source(&config)?;
    let store = Arc::new(StateStore::new());

    let orchestrator = Orchestrator::new(store.clone(), generator.clone())
        .with_fallback_flight(calmwing_flight::default_context());

    let state = Arc::new(ApiState {
        orchestrator,
        store: store.clone(),
        flight_source,
        generator_name: generator.name().to_string(),
        model: generator.model().to_string(),
        start_time: Utc::now(),
    });

    spawn_eviction_sweeper(store, config.state.idle_eviction_minutes);

    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::Internal(format!("failed to bind {}: {}", addr, e)))?;

    info!(addr = %addr, generator = %state.generator_name, "gateway listening");

    axum::serve(listener, build_router(state))
        .await
        .map_err(|e| Error::Internal(format!("server error: {}", e)))
}

/// Periodically drop traveler state that has gone idle.
fn spawn_eviction_sweeper(store: Arc<StateStore>, idle_minutes: u64) {
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(EVICTION_SWEEP_SECS));
        interval.tick().await; // first tick completes immediately
        loop {
            interval.tick().await;
            let evicted = store
                .evict_idle(chrono::Duration::minutes(idle_minutes as i64))
                .await;
            if evicted > 0 {
                debug!(evicted, "idle traveler state evicted");
            }
        }
    });
}

/// Build shared state from pre-built collaborators, for embedding the
/// router without loading configuration.
pub fn state_for(
    generator: Arc<dyn Generator>,
    flight_source: Arc<dyn FlightSource>,
) -> SharedApiState {
    let store = Arc::new(StateStore::new());
    let orchestrator = Orchestrator::new(store.clone(), generator.clone())
        .with_fallback_flight(calmwing_flight::default_context());

    Arc::new(ApiState {
        orchestrator,
        store,
        flight_source,
        generator_name: generator.name().to_string(),
        model: generator.model().to_string(),
        start_time: Utc::now(),
    })
}
